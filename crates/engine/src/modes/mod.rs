//! The rule-set family deciding win, loss and score.
//!
//! Every rule set implements [`GameMode`]; the session calls the hooks
//! synchronously while publishing the matching events on the shared bus.
//! Construction goes through [`create_game_mode`] with an immutable
//! settings snapshot, so option changes never leak into a running game.

use std::sync::Arc;

use picross_core::{BoardPolicy, Nonogram, PlayBoard};
use picross_events::EventBus;
use picross_types::{GameModeType, GameTime};

use crate::error::ConfigError;
use crate::settings::GameSettings;

mod count_up_time;
mod max_fail_count;
mod max_time;
mod pen_and_paper;
mod penalty;
mod quiz;

pub use count_up_time::CountUpTimeMode;
pub use max_fail_count::MaxFailCountMode;
pub use max_time::MaxTimeMode;
pub use pen_and_paper::PenAndPaperMode;
pub use penalty::PenaltyMode;
pub use quiz::QuizMode;

/// A rule set governing one play session.
///
/// Wrong moves are never fatal errors: the session reports them through
/// [`GameMode::on_wrong_move`] and each rule set picks its own
/// consequence (a counter, a time penalty, a quiz question, or nothing).
pub trait GameMode: Send {
    fn mode_type(&self) -> GameModeType;

    /// How the play board treats moves under this rule set.
    fn board_policy(&self) -> BoardPolicy;

    /// Called once when the session starts; time-aware rule sets start
    /// their clock here.
    fn on_start(&mut self) {}

    /// Reaction to a wrong occupy, after the wrong-move event went out.
    fn on_wrong_move(&mut self) {}

    /// Win check per this rule set's completion predicates.
    fn is_solved(&self, board: &PlayBoard) -> bool;

    /// Loss check; polled by the session after moves and on update.
    fn is_lost(&self) -> bool {
        false
    }

    /// Score under this rule set's scoring function.
    fn score(&self) -> u32;

    /// Current game clock for event payloads; zero when the rule set
    /// keeps no time.
    fn game_time(&self) -> GameTime {
        GameTime::default()
    }

    fn on_pause(&mut self) {}

    fn on_resume(&mut self) {}

    /// Called when the session reaches a terminal state.
    fn on_stop(&mut self) {}

    /// Releases owned resources (timers); the mode is done afterwards.
    fn on_quit(&mut self) {}

    /// Question waiting for an answer, if this rule set asks any.
    fn pending_question(&self) -> Option<&str> {
        None
    }

    /// Resolves a pending question. Returns whether the answer was
    /// accepted; rule sets without questions accept everything.
    fn check_answer(&mut self, answer: &str) -> bool {
        let _ = answer;
        true
    }
}

/// Builds the rule set selected by the settings snapshot.
pub fn create_game_mode(
    bus: &EventBus,
    pattern: &Arc<Nonogram>,
    settings: &GameSettings,
) -> Result<Box<dyn GameMode>, ConfigError> {
    settings.validate()?;
    let mode: Box<dyn GameMode> = match settings.game_mode {
        GameModeType::Penalty => Box::new(PenaltyMode::new(bus, settings)?),
        GameModeType::MaxFailCount => Box::new(MaxFailCountMode::new(bus, settings)?),
        GameModeType::MaxTime => Box::new(MaxTimeMode::new(bus, pattern, settings)?),
        GameModeType::CountUpTime => Box::new(CountUpTimeMode::new(bus, settings)),
        GameModeType::Quiz => Box::new(QuizMode::new(bus, settings)),
        GameModeType::PenAndPaper => Box::new(PenAndPaperMode::new()),
    };
    tracing::info!(mode = settings.game_mode.as_str(), "game mode instantiated");
    Ok(mode)
}

/// Board policy shared by the checked rule sets.
fn checked_policy(settings: &GameSettings) -> BoardPolicy {
    BoardPolicy {
        free_play: false,
        mark_invalid: settings.mark_invalid,
    }
}

/// Completion check shared by the checked rule sets: solving through
/// occupation always counts; solving through marks only when the settings
/// let marked fields count.
fn board_complete(board: &PlayBoard, count_marked: bool) -> bool {
    board.is_solved_by_occupation() || (count_marked && board.is_solved_by_marking())
}
