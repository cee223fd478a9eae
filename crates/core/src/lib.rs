//! Nonogram data model and play board.
//!
//! This crate holds the pure puzzle logic: the immutable [`Nonogram`]
//! pattern with its derived row/column clues and identity hash, and the
//! mutable [`PlayBoard`] a session annotates through the occupy/mark
//! protocol. No events or timing live here; those belong to the engine
//! and event crates.

mod board;
mod error;
mod nonogram;

pub use board::{BoardPolicy, MarkOutcome, OccupyOutcome, PlayBoard};
pub use error::{Error, Result};
pub use nonogram::{Nonogram, NonogramMeta};
