//! Time-limited rule set: solve before the count-down reaches zero.

use std::sync::Arc;

use picross_core::{BoardPolicy, Nonogram, PlayBoard};
use picross_events::EventBus;
use picross_types::{GameModeType, GameTime};

use crate::error::ConfigError;
use crate::settings::GameSettings;
use crate::timer::{GameTimer, TimerDirection};

use super::{board_complete, checked_policy, GameMode};

pub struct MaxTimeMode {
    bus: EventBus,
    timer: GameTimer,
    policy: BoardPolicy,
    count_marked: bool,
}

impl MaxTimeMode {
    /// A pattern carrying its own suggested duration overrides the
    /// settings budget.
    pub fn new(
        bus: &EventBus,
        pattern: &Arc<Nonogram>,
        settings: &GameSettings,
    ) -> Result<Self, ConfigError> {
        let budget = if pattern.meta().duration.is_zero() {
            settings.max_time
        } else {
            pattern.meta().duration
        };
        if budget.is_zero() {
            return Err(ConfigError::Validation(
                "maxTime rule set needs a positive time budget".into(),
            ));
        }
        Ok(Self {
            bus: bus.clone(),
            timer: GameTimer::new(bus.clone(), TimerDirection::CountDown, budget),
            policy: checked_policy(settings),
            count_marked: settings.count_marked,
        })
    }

    pub fn is_time_elapsed(&self) -> bool {
        self.timer.is_time_elapsed()
    }
}

impl GameMode for MaxTimeMode {
    fn mode_type(&self) -> GameModeType {
        GameModeType::MaxTime
    }

    fn board_policy(&self) -> BoardPolicy {
        self.policy
    }

    fn on_start(&mut self) {
        self.timer.start();
        self.bus.fire_set_time(self.timer.game_time());
    }

    fn is_solved(&self, board: &PlayBoard) -> bool {
        board_complete(board, self.count_marked)
    }

    fn is_lost(&self) -> bool {
        self.timer.is_time_elapsed()
    }

    /// Remaining seconds; zero once the budget ran out.
    fn score(&self) -> u32 {
        self.timer.remaining().as_secs() as u32
    }

    fn game_time(&self) -> GameTime {
        self.timer.game_time()
    }

    fn on_pause(&mut self) {
        self.timer.stop();
    }

    fn on_resume(&mut self) {
        self.timer.start();
    }

    fn on_stop(&mut self) {
        self.timer.stop();
    }

    fn on_quit(&mut self) {
        self.timer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picross_core::NonogramMeta;
    use std::time::Duration;

    fn pattern(duration: Duration) -> Arc<Nonogram> {
        Arc::new(
            Nonogram::new(
                NonogramMeta {
                    duration,
                    ..NonogramMeta::named("dot")
                },
                &[vec![true]],
            )
            .unwrap(),
        )
    }

    fn mode(budget: Duration) -> MaxTimeMode {
        let settings = GameSettings {
            game_mode: GameModeType::MaxTime,
            max_time: budget,
            ..GameSettings::default()
        };
        MaxTimeMode::new(&EventBus::new(), &pattern(Duration::ZERO), &settings).unwrap()
    }

    #[test]
    fn test_elapsed_boundary_at_sixty_seconds() {
        let mode = mode(Duration::from_secs(60));

        // simulate 59 seconds of play through the manual offset
        mode.timer.sub_time(0, 59);
        assert!(!mode.is_time_elapsed());
        assert!(!mode.is_lost());
        assert_eq!(mode.score(), 1);

        // one more second and the budget is gone
        mode.timer.sub_time(0, 1);
        assert!(mode.is_time_elapsed());
        assert!(mode.is_lost());
        assert_eq!(mode.score(), 0);
    }

    #[test]
    fn test_pattern_duration_overrides_settings_budget() {
        let settings = GameSettings {
            game_mode: GameModeType::MaxTime,
            max_time: Duration::from_secs(600),
            ..GameSettings::default()
        };
        let mode =
            MaxTimeMode::new(&EventBus::new(), &pattern(Duration::from_secs(90)), &settings)
                .unwrap();
        assert_eq!(mode.game_time(), GameTime::new(1, 30));
    }

    #[test]
    fn test_no_budget_anywhere_rejected() {
        let settings = GameSettings {
            game_mode: GameModeType::MaxTime,
            max_time: Duration::ZERO,
            ..GameSettings::default()
        };
        assert!(MaxTimeMode::new(&EventBus::new(), &pattern(Duration::ZERO), &settings).is_err());
    }
}
