#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use difficulty::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use outcome::*;
pub use proximity::*;
pub use reveal::*;
pub use rng::*;
pub use session::*;
pub use types::*;

mod difficulty;
mod error;
mod generator;
mod grid;
mod outcome;
mod proximity;
mod reveal;
mod rng;
mod session;
mod types;

/// Board dimensions and mine count for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(rows, columns, mines).validate()
    }

    /// Checks for a non-empty board holding at least one mine and at least one safe cell.
    pub fn validate(self) -> Result<Self> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigIssue::EmptyBoard.into());
        }
        if self.mines == 0 {
            return Err(ConfigIssue::NoMines.into());
        }
        let cells = self.total_cells();
        if self.mines >= cells {
            return Err(ConfigIssue::TooManyMines {
                mines: self.mines,
                cells,
            }
            .into());
        }
        Ok(self)
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.columns)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}
