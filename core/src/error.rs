use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates ({row}, {column}) are outside the board")]
    OutOfBounds { row: Coord, column: Coord },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),
    #[error("Saved session does not match its board")]
    InconsistentSession,
}

/// Reason a board configuration was rejected before any grid was built.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("board needs at least one row and one column")]
    EmptyBoard,
    #[error("board needs at least one mine")]
    NoMines,
    #[error("{mines} mines do not leave a safe cell on a board of {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("board dimensions exceed the coordinate range")]
    BoardTooLarge,
}

pub type Result<T> = core::result::Result<T, GameError>;
