//! Per-session configuration snapshot.

use std::time::Duration;

use picross_types::{GameModeType, DEFAULT_MAX_FAIL_COUNT, DEFAULT_MAX_TIME};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options a session is started with.
///
/// The session clones this at start time, so changing options while a
/// game is running never affects the running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSettings {
    /// Which rule set to play.
    pub game_mode: GameModeType,
    /// Allowed wrong moves in [`GameModeType::MaxFailCount`].
    pub max_fail_count: u32,
    /// Time budget for time-limited rule sets. A pattern carrying its own
    /// duration overrides this for [`GameModeType::MaxTime`].
    pub max_time: Duration,
    /// Cross out a cell after it was wrongly occupied.
    pub mark_invalid: bool,
    /// Let marked fields count toward completion: a board whose non-picture
    /// cells are all crossed out stands as solved too.
    pub count_marked: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            game_mode: GameModeType::Penalty,
            max_fail_count: DEFAULT_MAX_FAIL_COUNT,
            max_time: DEFAULT_MAX_TIME,
            mark_invalid: true,
            count_marked: false,
        }
    }
}

impl GameSettings {
    /// Rejects combinations no rule set could start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.game_mode {
            GameModeType::MaxFailCount if self.max_fail_count == 0 => {
                Err(ConfigError::Validation(
                    "maxFailCount rule set needs at least one allowed fail".into(),
                ))
            }
            GameModeType::Penalty if self.max_time.is_zero() => Err(ConfigError::Validation(
                "penalty rule set needs a positive time budget".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GameSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_fail_limit_rejected() {
        let settings = GameSettings {
            game_mode: GameModeType::MaxFailCount,
            max_fail_count: 0,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_time_budget_rejected_for_penalty() {
        let settings = GameSettings {
            max_time: Duration::ZERO,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());

        // other rule sets do not care about the budget
        let settings = GameSettings {
            game_mode: GameModeType::PenAndPaper,
            max_time: Duration::ZERO,
            ..GameSettings::default()
        };
        assert_eq!(settings.validate(), Ok(()));
    }
}
