use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Won once every cell that is not a mine has been opened.
pub fn check_opened(total_cells: CellCount, open_cells: CellCount, mines: CellCount) -> Outcome {
    if total_cells.saturating_sub(open_cells) <= mines {
        Outcome::Won
    } else {
        Outcome::InProgress
    }
}

/// Judges the flag placement once the flag count has reached the mine count.
///
/// Exactly `mines` flags all sitting on mines wins, anything else at or past the mine count loses.
pub fn check_flags(grid: &Grid, states: &Array2<CellState>, flags: CellCount) -> Outcome {
    let mines = grid.mine_count();
    if flags < mines {
        return Outcome::InProgress;
    }

    let correct = grid
        .mine_coords()
        .filter(|&coords| states[coords.to_nd_index()] == CellState::Flagged)
        .count() as CellCount;

    if flags == mines && correct == mines {
        Outcome::Won
    } else {
        Outcome::Lost
    }
}
