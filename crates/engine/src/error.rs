use thiserror::Error;

/// Errors raised when a session or rule set is configured.
///
/// Fatal to construction: no session or mode state exists after one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Validation(String),
}
