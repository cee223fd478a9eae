//! Headless demo runner (default binary).
//!
//! Plays a scripted session on a built-in pattern under the chosen rule
//! set and logs every engine event, acting as a reference consumer of
//! the event bus. With `--json` the events come out as line-delimited
//! JSON instead of tracing output.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use picross::core::{Nonogram, NonogramMeta};
use picross::engine::achievements::AchievementTracker;
use picross::engine::{GameSession, GameSettings};
use picross::events::{EventBus, GameEvent, GameListener};
use picross::types::{GameModeType, GameState};

#[derive(Debug, Clone)]
struct DemoConfig {
    mode: GameModeType,
    json: bool,
}

struct EventLog {
    json: bool,
}

impl GameListener for EventLog {
    fn on_event(&self, event: &GameEvent) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "event not serializable"),
            }
        } else {
            tracing::info!(?event, "engine event");
        }
    }
}

fn parse_args(args: &[String]) -> Result<DemoConfig> {
    let mut mode = GameModeType::Penalty;
    let mut json = false;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --mode"))?;
                mode = GameModeType::from_str(v)
                    .ok_or_else(|| anyhow!("unknown rule set: {}", v))?;
            }
            "--json" => {
                json = true;
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(DemoConfig { mode, json })
}

/// 5x5 heart, the built-in demo pattern.
fn sample_pattern() -> Result<Nonogram> {
    let rows = [
        [false, true, false, true, false],
        [true, true, true, true, true],
        [true, true, true, true, true],
        [false, true, true, true, false],
        [false, false, true, false, false],
    ];
    let rows: Vec<Vec<bool>> = rows.iter().map(|r| r.to_vec()).collect();
    Nonogram::new(NonogramMeta::named("heart"), &rows).map_err(|e| anyhow!(e))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;
    run(&config)
}

fn run(config: &DemoConfig) -> Result<()> {
    let bus = EventBus::new();
    bus.subscribe(Arc::new(EventLog { json: config.json }));
    let tracker = AchievementTracker::new(&bus);

    let pattern = Arc::new(sample_pattern()?);
    let settings = GameSettings {
        game_mode: config.mode,
        ..GameSettings::default()
    };
    let mut session = GameSession::new(bus.clone(), Arc::clone(&pattern), &settings)
        .map_err(|e| anyhow!(e))?;

    session.start();

    // a couple of bookkeeping marks, then take them back
    session.mark(0, 0)?;
    session.mark(0, 0)?;

    // one deliberate wrong move shows the rule set reacting
    if let Some((column, row)) = first_gap(&pattern) {
        session.occupy(column, row)?;
        if config.mode == GameModeType::PenAndPaper {
            // free play occupied it for real; take it back
            session.occupy(column, row)?;
        }
        if let Some(question) = session.pending_question().map(str::to_owned) {
            let answer = solve_question(&question)
                .ok_or_else(|| anyhow!("unsolvable quiz question: {}", question))?;
            session.answer_quiz(&answer);
        }
    }

    // occupy the whole picture
    for row in 0..pattern.height() {
        for column in 0..pattern.width() {
            if pattern.field_value(column, row)? && session.state() == GameState::Running {
                session.occupy(column, row)?;
            }
        }
    }
    session.update();

    tracing::info!(
        state = session.state().as_str(),
        score = session.score(),
        time = %session.game_time(),
        "session finished"
    );
    for (achievement, accomplished) in tracker.accomplishments() {
        if accomplished {
            tracing::info!(%achievement, "accomplished");
        }
    }

    session.quit();
    Ok(())
}

/// First cell outside the picture, if any.
fn first_gap(pattern: &Nonogram) -> Option<(usize, usize)> {
    (0..pattern.height())
        .flat_map(|row| (0..pattern.width()).map(move |column| (column, row)))
        .find(|&(column, row)| !pattern.field_value(column, row).unwrap_or(true))
}

/// Answers the engine's multiplication questions.
fn solve_question(question: &str) -> Option<String> {
    let factors: Vec<i64> = question
        .trim_end_matches('!')
        .split_whitespace()
        .filter_map(|word| word.parse().ok())
        .collect();
    match factors[..] {
        [a, b] => Some((a * b).to_string()),
        _ => None,
    }
}
