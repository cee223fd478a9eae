//! Shared types for the picross workspace.
//!
//! This crate defines the leaf data types used by every other layer: the
//! per-cell play token, the session state machine states, the selectable
//! rule sets, pattern metadata enums and the minute/second game clock
//! value passed around in events. All types are plain data, usable from
//! core logic, the event bus and presentation code alike.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of allowed wrong moves in fail-limited rule sets.
pub const DEFAULT_MAX_FAIL_COUNT: u32 = 5;

/// Default time budget for time-limited rule sets (30 minutes).
pub const DEFAULT_MAX_TIME: Duration = Duration::from_secs(30 * 60);

/// Interval between timer tick events.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Play state of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Cell has not been decided yet.
    Free,
    /// Cell was occupied by the player.
    Occupied,
    /// Cell was crossed out by the player.
    Marked,
}

impl Token {
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Free => "free",
            Token::Occupied => "occupied",
            Token::Marked => "marked",
        }
    }
}

/// States a play session moves through.
///
/// `Solved`, `GameOver` and `UserStopped` are terminal; `Paused` is only
/// reachable from `Running` and only leads back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Session constructed but not started.
    None,
    Running,
    Paused,
    Solved,
    GameOver,
    UserStopped,
}

impl GameState {
    /// True for states no session can leave again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameState::Solved | GameState::GameOver | GameState::UserStopped
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::None => "none",
            GameState::Running => "running",
            GameState::Paused => "paused",
            GameState::Solved => "solved",
            GameState::GameOver => "gameOver",
            GameState::UserStopped => "userStopped",
        }
    }
}

/// Selectable rule set for a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameModeType {
    /// Wrong moves shrink the score, the game is never lost.
    Penalty,
    /// A limited number of wrong moves is allowed.
    MaxFailCount,
    /// The pattern must be solved before a count-down reaches zero.
    MaxTime,
    /// Elapsed time is the score, lower is better.
    CountUpTime,
    /// A wrong move triggers a quiz question; a wrong answer loses.
    Quiz,
    /// Free annotation with no assistance, like solving on paper.
    PenAndPaper,
}

impl GameModeType {
    /// Parse a rule set name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "penalty" => Some(GameModeType::Penalty),
            "maxfailcount" | "maxfail" => Some(GameModeType::MaxFailCount),
            "maxtime" => Some(GameModeType::MaxTime),
            "countuptime" | "counttime" => Some(GameModeType::CountUpTime),
            "quiz" => Some(GameModeType::Quiz),
            "penandpaper" => Some(GameModeType::PenAndPaper),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameModeType::Penalty => "penalty",
            GameModeType::MaxFailCount => "maxFailCount",
            GameModeType::MaxTime => "maxTime",
            GameModeType::CountUpTime => "countUpTime",
            GameModeType::Quiz => "quiz",
            GameModeType::PenAndPaper => "penAndPaper",
        }
    }
}

/// Difficulty rating attached to a nonogram pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Undefined,
    Easiest,
    Easy,
    Normal,
    Hard,
    Hardest,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Undefined => "undefined",
            Difficulty::Easiest => "easiest",
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Hardest => "hardest",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Undefined
    }
}

/// Direction for moving the active-cell cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorDirection {
    Left,
    Right,
    Up,
    Down,
}

/// A game clock value in whole minutes and seconds.
///
/// Carried by timer and set-time events; no arithmetic happens here, the
/// value is derived from a [`Duration`] by whoever computes the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct GameTime {
    pub minutes: u32,
    pub seconds: u32,
}

impl GameTime {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self { minutes, seconds }
    }

    /// Truncates sub-second precision.
    pub fn from_duration(d: Duration) -> Self {
        let total = d.as_secs();
        Self {
            minutes: (total / 60) as u32,
            seconds: (total % 60) as u32,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}
