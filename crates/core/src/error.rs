use thiserror::Error;

/// Errors raised by the puzzle data model.
///
/// Move-level problems (occupying an already-decided cell, wrong guesses)
/// are not errors; they come back as outcome values from the board. An
/// `OutOfRange` coordinate is a caller bug and is always signalled, never
/// clamped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("cell ({column}, {row}) is outside the {width}x{height} grid")]
    OutOfRange {
        column: usize,
        row: usize,
        width: usize,
        height: usize,
    },

    #[error("pattern has no cells after normalizing rows")]
    EmptyPattern,
}

pub type Result<T> = std::result::Result<T, Error>;
