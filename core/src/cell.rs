use serde::{Deserialize, Serialize};

/// One grid position. Owned by a [`crate::Board`]; callers only get copies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    covered: bool,
    flagged: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub(crate) const fn new(mine: bool, adjacent_mines: u8) -> Self {
        Self {
            mine,
            covered: true,
            flagged: false,
            adjacent_mines,
        }
    }

    pub const fn is_mine(self) -> bool {
        self.mine
    }

    pub const fn is_covered(self) -> bool {
        self.covered
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Mines among the up to 8 neighbors, fixed once mines are placed.
    pub const fn adjacent_mine_count(self) -> u8 {
        self.adjacent_mines
    }

    /// Uncovers the cell, returning whether it held a flag that had to be dropped.
    pub(crate) fn uncover(&mut self) -> bool {
        self.covered = false;
        core::mem::take(&mut self.flagged)
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        debug_assert!(self.covered || !flagged);
        self.flagged = flagged;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(false, 0)
    }
}
