use serde::{Deserialize, Serialize};

use crate::*;

/// What a player may see of a cell. Mines only show up once the game is lost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Covered,
    Flagged,
    Open(u8),
    Mine,
    /// The mine that ended the game.
    Exploded,
    /// A flag on a safe cell, shown after a loss.
    MisplacedFlag,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged | Self::MisplacedFlag)
    }
}

impl Board {
    pub fn view_at(&self, coords: Coord2) -> Option<CellView> {
        let cell = self.cell_at(coords)?;
        Some(self.view(coords, cell))
    }

    /// Player-facing view of every cell in row-major order.
    pub fn views(&self) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        self.cells()
            .map(|(coords, cell)| (coords, self.view(coords, cell)))
    }

    fn view(&self, coords: Coord2, cell: Cell) -> CellView {
        let lost = self.state() == BoardState::Lost;

        match (cell.is_covered(), cell.is_mine()) {
            (false, true) if self.triggered_mine() == Some(coords) => CellView::Exploded,
            (false, true) => CellView::Mine,
            (false, false) => CellView::Open(cell.adjacent_mine_count()),
            (true, false) if lost && cell.is_flagged() => CellView::MisplacedFlag,
            (true, _) if cell.is_flagged() => CellView::Flagged,
            (true, _) => CellView::Covered,
        }
    }
}
