//! Fail-limited rule set: a fixed number of wrong moves is allowed.

use picross_core::{BoardPolicy, PlayBoard};
use picross_events::EventBus;
use picross_types::GameModeType;

use crate::error::ConfigError;
use crate::settings::GameSettings;

use super::{board_complete, checked_policy, GameMode};

pub struct MaxFailCountMode {
    bus: EventBus,
    fails_left: u32,
    threshold: u32,
    policy: BoardPolicy,
    count_marked: bool,
}

impl MaxFailCountMode {
    pub fn new(bus: &EventBus, settings: &GameSettings) -> Result<Self, ConfigError> {
        if settings.max_fail_count == 0 {
            return Err(ConfigError::Validation(
                "maxFailCount rule set needs at least one allowed fail".into(),
            ));
        }
        Ok(Self {
            bus: bus.clone(),
            fails_left: settings.max_fail_count,
            threshold: settings.max_fail_count,
            policy: checked_policy(settings),
            count_marked: settings.count_marked,
        })
    }

    pub fn fails_left(&self) -> u32 {
        self.fails_left
    }
}

impl GameMode for MaxFailCountMode {
    fn mode_type(&self) -> GameModeType {
        GameModeType::MaxFailCount
    }

    fn board_policy(&self) -> BoardPolicy {
        self.policy
    }

    fn on_start(&mut self) {
        self.bus.fire_set_fail_count(self.fails_left);
    }

    fn on_wrong_move(&mut self) {
        self.fails_left = self.fails_left.saturating_sub(1);
        self.bus.fire_set_fail_count(self.fails_left);
    }

    fn is_solved(&self, board: &PlayBoard) -> bool {
        board_complete(board, self.count_marked)
    }

    fn is_lost(&self) -> bool {
        self.fails_left == 0
    }

    /// Inverse function of the fails used: full marks with no wrong move,
    /// zero when the limit is spent.
    fn score(&self) -> u32 {
        10_000 * self.fails_left / self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(max_fail_count: u32) -> MaxFailCountMode {
        let settings = GameSettings {
            game_mode: GameModeType::MaxFailCount,
            max_fail_count,
            ..GameSettings::default()
        };
        MaxFailCountMode::new(&EventBus::new(), &settings).unwrap()
    }

    #[test]
    fn test_exactly_threshold_wrong_moves_lose() {
        let mut mode = mode(3);
        mode.on_wrong_move();
        mode.on_wrong_move();
        assert!(!mode.is_lost());
        mode.on_wrong_move();
        assert!(mode.is_lost());
    }

    #[test]
    fn test_score_is_inverse_of_fails_used() {
        let mut mode = mode(4);
        assert_eq!(mode.score(), 10_000);
        mode.on_wrong_move();
        assert_eq!(mode.score(), 7_500);
        mode.on_wrong_move();
        mode.on_wrong_move();
        mode.on_wrong_move();
        assert_eq!(mode.score(), 0);
        // further wrong moves saturate
        mode.on_wrong_move();
        assert_eq!(mode.fails_left(), 0);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let settings = GameSettings {
            game_mode: GameModeType::MaxFailCount,
            max_fail_count: 0,
            ..GameSettings::default()
        };
        assert!(MaxFailCountMode::new(&EventBus::new(), &settings).is_err());
    }
}
