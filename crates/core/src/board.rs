//! Mutable play board and the occupy/mark protocol.
//!
//! The board tracks one [`Token`] per cell plus the active-cell cursor and
//! a wrong-move counter. All mutation goes through [`PlayBoard::occupy`]
//! and [`PlayBoard::mark`]; what a wrong or repeated move means is decided
//! by the rule set, so the board reports outcomes instead of raising
//! errors for them.

use std::sync::Arc;

use picross_types::{CursorDirection, Token};

use crate::error::Result;
use crate::nonogram::Nonogram;

/// Per-session policy knobs handed down by the active rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardPolicy {
    /// Moves carry no correctness check and can be undone, as when
    /// solving on paper.
    pub free_play: bool,
    /// A wrong occupy additionally marks the cell.
    pub mark_invalid: bool,
}

/// What happened on an occupy call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupyOutcome {
    /// Cell is now occupied.
    Occupied,
    /// Free-play undo: the cell went back to free.
    Unoccupied,
    /// The move was wrong; the board did not occupy the cell. `marked`
    /// reports whether the mark-invalid policy crossed it out instead.
    Wrong { marked: bool },
    /// Cell was already decided; nothing changed.
    Rejected,
}

/// What happened on a mark call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    /// The cell was marked before and is free again.
    Unmarked,
    /// Cell is occupied; marking it is not allowed.
    Rejected,
}

/// The mutable per-session grid.
#[derive(Debug, Clone)]
pub struct PlayBoard {
    pattern: Arc<Nonogram>,
    policy: BoardPolicy,
    /// Flat token grid, row-major order, same dimensions as the pattern.
    tokens: Vec<Token>,
    active: (usize, usize),
    fail_count: u32,
}

impl PlayBoard {
    pub fn new(pattern: Arc<Nonogram>, policy: BoardPolicy) -> Self {
        let cells = pattern.width() * pattern.height();
        Self {
            pattern,
            policy,
            tokens: vec![Token::Free; cells],
            active: (0, 0),
            fail_count: 0,
        }
    }

    pub fn pattern(&self) -> &Arc<Nonogram> {
        &self.pattern
    }

    pub fn policy(&self) -> BoardPolicy {
        self.policy
    }

    pub fn width(&self) -> usize {
        self.pattern.width()
    }

    pub fn height(&self) -> usize {
        self.pattern.height()
    }

    pub fn token(&self, column: usize, row: usize) -> Result<Token> {
        self.pattern.check_bounds(column, row)?;
        Ok(self.tokens[row * self.width() + column])
    }

    /// Flat token grid, row-major, for presentation code.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Wrong occupy moves made so far.
    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }

    pub fn occupied_count(&self) -> usize {
        self.tokens.iter().filter(|t| **t == Token::Occupied).count()
    }

    pub fn marked_count(&self) -> usize {
        self.tokens.iter().filter(|t| **t == Token::Marked).count()
    }

    /// True iff the cell is free.
    pub fn can_occupy(&self, column: usize, row: usize) -> Result<bool> {
        Ok(self.token(column, row)? == Token::Free)
    }

    /// True iff the cell is not occupied.
    pub fn can_mark(&self, column: usize, row: usize) -> Result<bool> {
        Ok(self.token(column, row)? != Token::Occupied)
    }

    /// Tries to occupy a cell.
    ///
    /// Outside free play the move is checked against the pattern: a wrong
    /// guess leaves the cell unoccupied (marking it when the policy says
    /// so) and bumps the fail counter. In free play the call toggles
    /// between free and occupied with no checking at all.
    pub fn occupy(&mut self, column: usize, row: usize) -> Result<OccupyOutcome> {
        let token = self.token(column, row)?;
        let idx = row * self.width() + column;

        if self.policy.free_play {
            return Ok(match token {
                Token::Free => {
                    self.tokens[idx] = Token::Occupied;
                    OccupyOutcome::Occupied
                }
                Token::Occupied => {
                    self.tokens[idx] = Token::Free;
                    OccupyOutcome::Unoccupied
                }
                Token::Marked => OccupyOutcome::Rejected,
            });
        }

        if token != Token::Free {
            tracing::debug!(column, row, token = token.as_str(), "can not occupy field");
            return Ok(OccupyOutcome::Rejected);
        }

        if self.pattern.at(column, row) {
            self.tokens[idx] = Token::Occupied;
            Ok(OccupyOutcome::Occupied)
        } else {
            self.fail_count += 1;
            tracing::debug!(column, row, fails = self.fail_count, "wrong field occupied");
            let marked = self.policy.mark_invalid;
            if marked {
                self.tokens[idx] = Token::Marked;
            }
            Ok(OccupyOutcome::Wrong { marked })
        }
    }

    /// Toggles the mark on a cell. Marking never checks correctness but
    /// is rejected on occupied cells.
    pub fn mark(&mut self, column: usize, row: usize) -> Result<MarkOutcome> {
        let token = self.token(column, row)?;
        let idx = row * self.width() + column;

        Ok(match token {
            Token::Free => {
                self.tokens[idx] = Token::Marked;
                MarkOutcome::Marked
            }
            Token::Marked => {
                self.tokens[idx] = Token::Free;
                MarkOutcome::Unmarked
            }
            Token::Occupied => {
                tracing::debug!(column, row, "can not mark occupied field");
                MarkOutcome::Rejected
            }
        })
    }

    /// Current active-cell cursor, `(column, row)`.
    pub fn active(&self) -> (usize, usize) {
        self.active
    }

    pub fn set_active(&mut self, column: usize, row: usize) -> Result<()> {
        self.pattern.check_bounds(column, row)?;
        self.active = (column, row);
        Ok(())
    }

    /// Moves the cursor one cell, clamped at the grid edges. Returns
    /// whether the cursor changed.
    pub fn move_active(&mut self, direction: CursorDirection) -> bool {
        let (x, y) = self.active;
        let next = match direction {
            CursorDirection::Left => (x.saturating_sub(1), y),
            CursorDirection::Right => ((x + 1).min(self.width() - 1), y),
            CursorDirection::Up => (x, y.saturating_sub(1)),
            CursorDirection::Down => (x, (y + 1).min(self.height() - 1)),
        };
        let moved = next != self.active;
        self.active = next;
        moved
    }

    /// Win check through occupation: every pattern cell is occupied and
    /// no other cell is.
    pub fn is_solved_by_occupation(&self) -> bool {
        self.cells().all(|(pattern, token)| {
            if pattern {
                token == Token::Occupied
            } else {
                token != Token::Occupied
            }
        })
    }

    /// Win check through marking: no pattern cell is crossed out and no
    /// cell outside the pattern was left untouched.
    pub fn is_solved_by_marking(&self) -> bool {
        self.cells().all(|(pattern, token)| {
            if pattern {
                token != Token::Marked
            } else {
                token != Token::Free
            }
        })
    }

    /// Fills the board with the pattern solution.
    pub fn solve(&mut self) {
        let width = self.width();
        for row in 0..self.height() {
            for column in 0..width {
                self.tokens[row * width + column] = if self.pattern.at(column, row) {
                    Token::Occupied
                } else {
                    Token::Free
                };
            }
        }
    }

    fn cells(&self) -> impl Iterator<Item = (bool, Token)> + '_ {
        let width = self.width();
        self.tokens
            .iter()
            .enumerate()
            .map(move |(i, token)| (self.pattern.at(i % width, i / width), *token))
    }
}
