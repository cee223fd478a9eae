//! Session engine: rule sets, timing, achievements.
//!
//! This crate drives play sessions on top of `picross-core` and
//! `picross-events`. A [`GameSession`](session::GameSession) owns the play
//! board and a [`GameMode`](modes::GameMode) built from an immutable
//! [`GameSettings`](settings::GameSettings) snapshot; time-aware rule sets
//! own a [`GameTimer`](timer::GameTimer) that ticks through the shared
//! event bus. The [`AchievementTracker`](achievements::AchievementTracker)
//! derives accomplishments from the same event stream.

pub mod achievements;
mod error;
pub mod modes;
pub mod session;
pub mod settings;
pub mod timer;

pub use error::ConfigError;
pub use session::GameSession;
pub use settings::GameSettings;
