//! Nonogram pattern model.
//!
//! A [`Nonogram`] is immutable after construction: the boolean field, the
//! derived row/column clues and the identity hash are all fixed when the
//! pattern is built. A "changed" pattern is a new instance.
//!
//! Storage is a flat row-major `Vec<bool>` for cache locality; clue runs
//! are computed once with a single pass per line.

use std::time::Duration;

use picross_types::Difficulty;

use crate::error::{Error, Result};

/// Descriptive metadata attached to a pattern.
///
/// `duration` is a suggested play duration for time-limited rule sets
/// (zero means unset); `level` is the ordinal within a course (zero means
/// unset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonogramMeta {
    pub name: String,
    pub author: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub duration: Duration,
    pub level: u32,
}

impl NonogramMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An immutable nonogram pattern with derived clues and identity hash.
#[derive(Debug, Clone)]
pub struct Nonogram {
    meta: NonogramMeta,
    width: usize,
    height: usize,
    /// Flat field, row-major order (`row * width + column`).
    field: Vec<bool>,
    row_clues: Vec<Vec<u32>>,
    column_clues: Vec<Vec<u32>>,
    hash: String,
}

impl Nonogram {
    /// Builds a pattern from metadata and a row-major boolean matrix.
    ///
    /// Ragged input is normalized by truncating the width to the shortest
    /// row; a pattern that ends up with zero cells is rejected.
    pub fn new(meta: NonogramMeta, rows: &[Vec<bool>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).min().unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(Error::EmptyPattern);
        }

        let mut field = Vec::with_capacity(width * height);
        for row in rows {
            field.extend_from_slice(&row[..width]);
        }

        let row_clues = (0..height)
            .map(|y| run_lengths(field[y * width..(y + 1) * width].iter().copied()))
            .collect();
        let column_clues = (0..width)
            .map(|x| run_lengths((0..height).map(|y| field[y * width + x])))
            .collect();

        let hash = compute_hash(&meta, width, height, &field);

        tracing::debug!(
            name = %meta.name,
            width,
            height,
            "nonogram constructed"
        );

        Ok(Self {
            meta,
            width,
            height,
            field,
            row_clues,
            column_clues,
            hash,
        })
    }

    pub fn meta(&self) -> &NonogramMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pattern value at `(column, row)`.
    pub fn field_value(&self, column: usize, row: usize) -> Result<bool> {
        self.check_bounds(column, row)?;
        Ok(self.at(column, row))
    }

    /// Clue runs for one row, left to right. A row with no filled cells
    /// has the single clue `0`.
    pub fn row_clues(&self, row: usize) -> Result<&[u32]> {
        if row >= self.height {
            return Err(self.out_of_range(0, row));
        }
        Ok(&self.row_clues[row])
    }

    /// Clue runs for one column, top to bottom.
    pub fn column_clues(&self, column: usize) -> Result<&[u32]> {
        if column >= self.width {
            return Err(self.out_of_range(column, 0));
        }
        Ok(&self.column_clues[column])
    }

    /// Maximum number of clues any row can have, for caption layout.
    pub fn row_clue_span(&self) -> usize {
        (self.width + 1) / 2
    }

    /// Maximum number of clues any column can have.
    pub fn column_clue_span(&self) -> usize {
        (self.height + 1) / 2
    }

    /// Stable identity digest over metadata, dimensions and field bits.
    ///
    /// Two patterns built from identical inputs always share this value;
    /// flipping any single bit or metadata field changes it.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Number of cells that belong to the picture.
    pub fn true_cell_count(&self) -> usize {
        self.field.iter().filter(|&&v| v).count()
    }

    /// Unchecked accessor for callers that already validated bounds.
    pub(crate) fn at(&self, column: usize, row: usize) -> bool {
        self.field[row * self.width + column]
    }

    pub(crate) fn check_bounds(&self, column: usize, row: usize) -> Result<()> {
        if column >= self.width || row >= self.height {
            return Err(self.out_of_range(column, row));
        }
        Ok(())
    }

    fn out_of_range(&self, column: usize, row: usize) -> Error {
        Error::OutOfRange {
            column,
            row,
            width: self.width,
            height: self.height,
        }
    }
}

/// Single-pass run-length encoding of one line.
fn run_lengths(cells: impl Iterator<Item = bool>) -> Vec<u32> {
    let mut runs = Vec::new();
    let mut current = 0u32;

    for filled in cells {
        if filled {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    if runs.is_empty() {
        runs.push(0);
    }

    runs
}

/// Canonical, length-delimited digest input. Strings are length-prefixed
/// so adjacent fields cannot collide by concatenation.
fn compute_hash(meta: &NonogramMeta, width: usize, height: usize, field: &[bool]) -> String {
    let mut hasher = blake3::Hasher::new();

    for text in [&meta.name, &meta.author, &meta.description] {
        hasher.update(&(text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
    }
    hasher.update(&[meta.difficulty as u8]);
    hasher.update(&(meta.duration.as_millis() as u64).to_le_bytes());
    hasher.update(&u64::from(meta.level).to_le_bytes());
    hasher.update(&(width as u64).to_le_bytes());
    hasher.update(&(height as u64).to_le_bytes());

    let bits: Vec<u8> = field.iter().map(|&v| v as u8).collect();
    hasher.update(&bits);

    hasher.finalize().to_hex().to_string()
}
