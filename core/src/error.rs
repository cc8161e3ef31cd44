use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(
        "Invalid board configuration {rows}x{columns} with {mines} mines, need at least one mine and one safe cell"
    )]
    InvalidConfiguration {
        rows: Coord,
        columns: Coord,
        mines: CellCount,
    },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not fit a {max}x{max} grid", max = Coord::MAX)]
    InvalidBoardShape,
    #[error("Saved board is inconsistent: {0}")]
    InconsistentSave(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
