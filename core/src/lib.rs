use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use types::*;
pub use view::*;

mod board;
mod cell;
mod error;
mod generator;
mod types;
mod view;

/// What a cascade does when it reaches a flagged cell.
///
/// A direct reveal is always blocked by a flag. A cascade started from a zero cell only
/// reaches cells that are provably safe, so by default it removes the flag and opens them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeFlags {
    /// Remove the flag and open the cell.
    #[default]
    Clear,
    /// Leave the cell covered and flagged.
    Preserve,
}

/// Board parameters supplied by the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
    #[serde(default)]
    pub cascade_flags: CascadeFlags,
}

impl BoardConfig {
    pub const fn new_unchecked(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
            cascade_flags: CascadeFlags::Clear,
        }
    }

    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(rows, columns, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_cascade_flags(self, cascade_flags: CascadeFlags) -> Self {
        Self {
            cascade_flags,
            ..self
        }
    }

    /// A board needs at least one mine and at least one safe cell, otherwise mine placement
    /// could never finish.
    pub fn validate(&self) -> Result<()> {
        if self.mines == 0 || self.mines >= self.total_cells() {
            Err(GameError::InvalidConfiguration {
                rows: self.rows,
                columns: self.columns,
                mines: self.mines,
            })
        } else {
            Ok(())
        }
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

impl Default for BoardConfig {
    /// 16x16 with 40 mines.
    fn default() -> Self {
        Self::new_unchecked(16, 16, 40)
    }
}

/// Static mine placement of a board, independent of any reveal or flag state.
///
/// Serialized as the bare mask; the mine count is always recounted from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<bool>", into = "Array2<bool>")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, columns) = mine_mask.dim();
        let (Ok(rows), Ok(columns)) = (Coord::try_from(rows), Coord::try_from(columns)) else {
            return Err(GameError::InvalidBoardShape);
        };
        log::trace!("mine layout {rows}x{columns}");

        Ok(Self::from_sized_mask(mine_mask))
    }

    /// Caller guarantees both dimensions fit a `Coord`.
    pub(crate) fn from_sized_mask(mine_mask: Array2<bool>) -> Self {
        // bounded by rows * columns, which fits a `CellCount`
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            let coords = in_bounds(coords, size).ok_or(GameError::InvalidCoords)?;
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, columns) = self.mine_mask.dim();
        (rows as Coord, columns as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size()).is_some_and(|coords| self[coords])
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, column), _)| (row as Coord, column as Coord))
    }
}

impl TryFrom<Array2<bool>> for MineLayout {
    type Error = GameError;

    fn try_from(mine_mask: Array2<bool>) -> Result<Self> {
        Self::from_mine_mask(mine_mask)
    }
}

impl From<MineLayout> for Array2<bool> {
    fn from(layout: MineLayout) -> Self {
        layout.mine_mask
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Outcome of a reveal request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Nothing changed: flagged, already open, out of bounds or the game is over.
    NoOp,
    /// Safe reveal, carries how many cells were uncovered including the cascade.
    Opened(CellCount),
    /// A mine was revealed.
    Lost,
    /// The last safe cell was uncovered.
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoOp)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoOp,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoOp)
    }
}
