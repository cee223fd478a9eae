//! Free-exploration rule set: no assistance, no loss, no score. Moves
//! toggle freely like pencil strokes on paper; the game stands as solved
//! only when the annotated board matches the pattern cell by cell.

use picross_core::{BoardPolicy, PlayBoard};
use picross_types::GameModeType;

use super::GameMode;

pub struct PenAndPaperMode;

impl PenAndPaperMode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PenAndPaperMode {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMode for PenAndPaperMode {
    fn mode_type(&self) -> GameModeType {
        GameModeType::PenAndPaper
    }

    fn board_policy(&self) -> BoardPolicy {
        BoardPolicy {
            free_play: true,
            mark_invalid: false,
        }
    }

    /// Exact equality through occupation; stray marks on non-picture
    /// cells are the player's own bookkeeping and do not matter.
    fn is_solved(&self, board: &PlayBoard) -> bool {
        board.is_solved_by_occupation()
    }

    fn score(&self) -> u32 {
        0
    }
}
