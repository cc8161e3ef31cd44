use std::collections::VecDeque;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl BoardState {
    /// Indicates the game has ended and no moves are accepted anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A single game from the first reveal to a win or loss. Restarting means building a new board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SavedBoard", into = "SavedBoard")]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    flag_count: CellCount,
    covered_safe_count: CellCount,
    state: BoardState,
    cascade_flags: CascadeFlags,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Random board seeded from the thread-local generator.
    pub fn new(config: BoardConfig) -> Result<Self> {
        Self::with_generator(config, RandomMineGenerator::from_thread_rng())
    }

    /// Random board with reproducible mine placement.
    pub fn with_seed(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, RandomMineGenerator::new(seed))
    }

    pub fn with_generator<G: MineGenerator>(config: BoardConfig, generator: G) -> Result<Self> {
        config.validate()?;
        let layout = generator.generate(config)?;
        Self::from_layout(&layout, config.cascade_flags)
    }

    /// Builds a board on a fixed mine layout, which must leave at least one mine and one safe cell.
    pub fn from_layout(layout: &MineLayout, cascade_flags: CascadeFlags) -> Result<Self> {
        let (rows, columns) = layout.size();
        let cells = Array2::from_shape_fn(layout.size().to_nd_index(), |(row, column)| {
            let coords = (row as Coord, column as Coord);
            if layout[coords] {
                Cell::new(true, 0)
            } else {
                Cell::new(false, layout.adjacent_mine_count(coords))
            }
        });
        // recounted from the cells built
        let mine_count = cells.iter().filter(|cell| cell.is_mine()).count() as CellCount;
        let config = BoardConfig::new(rows, columns, mine_count)?;
        log::debug!(
            "new {}x{} board with {} mines, cascade flags: {:?}",
            rows,
            columns,
            mine_count,
            cascade_flags
        );

        Ok(Self {
            cells,
            mine_count,
            flag_count: 0,
            covered_safe_count: config.safe_cells(),
            state: BoardState::InProgress,
            cascade_flags,
            triggered_mine: None,
        })
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// `(rows, columns)`
    pub fn size(&self) -> Coord2 {
        let (rows, columns) = self.cells.dim();
        (rows as Coord, columns as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn columns(&self) -> Coord {
        self.size().1
    }

    pub fn config(&self) -> BoardConfig {
        let (rows, columns) = self.size();
        BoardConfig::new_unchecked(rows, columns, self.mine_count)
            .with_cascade_flags(self.cascade_flags)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// How many more flags may be placed.
    pub fn remaining_flag_budget(&self) -> CellCount {
        self.mine_count.saturating_sub(self.flag_count)
    }

    /// Safe cells that still have to be uncovered to win.
    pub fn covered_safe_count(&self) -> CellCount {
        self.covered_safe_count
    }

    pub fn cascade_flags(&self) -> CascadeFlags {
        self.cascade_flags
    }

    /// The mine whose reveal lost the game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        let coords = in_bounds(coords, self.size())?;
        Some(self.cells[coords.to_nd_index()])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, column), &cell)| ((row as Coord, column as Coord), cell))
    }

    pub fn mine_layout(&self) -> MineLayout {
        MineLayout::from_sized_mask(self.cells.map(|cell| cell.is_mine()))
    }

    /// Toggle the flag on a covered cell, limited to one flag per mine.
    pub fn flag(&mut self, coords: Coord2) -> FlagOutcome {
        let Some(coords) = self.accepts_moves_at(coords) else {
            return FlagOutcome::NoOp;
        };

        let cell = &mut self.cells[coords.to_nd_index()];
        if !cell.is_covered() {
            FlagOutcome::NoOp
        } else if cell.is_flagged() {
            cell.set_flagged(false);
            self.flag_count -= 1;
            FlagOutcome::Unflagged
        } else if self.flag_count < self.mine_count {
            cell.set_flagged(true);
            self.flag_count += 1;
            FlagOutcome::Flagged
        } else {
            log::trace!("flag budget exhausted, ignoring {:?}", coords);
            FlagOutcome::NoOp
        }
    }

    /// Uncover a covered, unflagged cell, opening the surrounding region when it has no
    /// adjacent mines.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(coords) = self.accepts_moves_at(coords) else {
            return RevealOutcome::NoOp;
        };

        let cell = self.cells[coords.to_nd_index()];
        if !cell.is_covered() || cell.is_flagged() {
            return RevealOutcome::NoOp;
        }

        if cell.is_mine() {
            self.explode(coords);
            return RevealOutcome::Lost;
        }

        let opened = self.open_region(coords);
        if self.covered_safe_count == 0 {
            self.state = BoardState::Won;
            log::debug!("won, last reveal at {:?} opened {} cells", coords, opened);
            RevealOutcome::Won
        } else {
            RevealOutcome::Opened(opened)
        }
    }

    fn accepts_moves_at(&self, coords: Coord2) -> Option<Coord2> {
        if self.state.is_finished() {
            return None;
        }
        in_bounds(coords, self.size())
    }

    /// Opens a safe cell and, if it has no adjacent mines, every cell reachable through other
    /// zero cells. Returns how many cells were uncovered.
    fn open_region(&mut self, coords: Coord2) -> CellCount {
        self.uncover_at(coords);
        let mut opened: CellCount = 1;
        log::trace!("open cell at {:?}", coords);

        if self.cells[coords.to_nd_index()].adjacent_mine_count() != 0 {
            return opened;
        }

        // every queued cell is already uncovered, so each one is expanded exactly once
        let mut to_visit = VecDeque::from([coords]);
        while let Some(center) = to_visit.pop_front() {
            for pos in self.cells.iter_neighbors(center) {
                let cell = self.cells[pos.to_nd_index()];
                if !cell.is_covered() {
                    continue;
                }
                if cell.is_flagged() && self.cascade_flags == CascadeFlags::Preserve {
                    log::trace!("cascade keeps flag at {:?}", pos);
                    continue;
                }
                debug_assert!(!cell.is_mine(), "zero cell next to a mine at {pos:?}");

                self.uncover_at(pos);
                opened += 1;
                log::trace!(
                    "cascade opened cell at {:?}, adjacent mines: {}",
                    pos,
                    cell.adjacent_mine_count()
                );

                if cell.adjacent_mine_count() == 0 {
                    to_visit.push_back(pos);
                }
            }
        }

        opened
    }

    fn uncover_at(&mut self, coords: Coord2) {
        let cell = &mut self.cells[coords.to_nd_index()];
        if !cell.is_covered() {
            return;
        }
        if cell.uncover() {
            self.flag_count -= 1;
        }
        if !cell.is_mine() {
            self.covered_safe_count -= 1;
        }
    }

    /// Ends the game and uncovers every mine, flagged or not.
    fn explode(&mut self, coords: Coord2) {
        self.state = BoardState::Lost;
        self.triggered_mine = Some(coords);

        let mut dropped_flags: CellCount = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine()) {
            if cell.uncover() {
                dropped_flags += 1;
            }
        }
        self.flag_count -= dropped_flags;

        log::debug!(
            "lost, mine hit at {:?}, {} safe cells were left",
            coords,
            self.covered_safe_count
        );
    }
}

/// Serialized form of a board. Counters are rebuilt from the cells on load.
#[derive(Serialize, Deserialize)]
struct SavedBoard {
    cells: Array2<Cell>,
    state: BoardState,
    #[serde(default)]
    cascade_flags: CascadeFlags,
    triggered_mine: Option<Coord2>,
}

impl From<Board> for SavedBoard {
    fn from(board: Board) -> Self {
        Self {
            cells: board.cells,
            state: board.state,
            cascade_flags: board.cascade_flags,
            triggered_mine: board.triggered_mine,
        }
    }
}

impl TryFrom<SavedBoard> for Board {
    type Error = GameError;

    fn try_from(saved: SavedBoard) -> Result<Self> {
        use GameError::InconsistentSave;

        let SavedBoard {
            cells,
            state,
            cascade_flags,
            triggered_mine,
        } = saved;

        let (rows, columns) = cells.dim();
        let (Ok(rows), Ok(columns)) = (Coord::try_from(rows), Coord::try_from(columns)) else {
            return Err(GameError::InvalidBoardShape);
        };
        let layout = MineLayout::from_sized_mask(cells.map(|cell| cell.is_mine()));
        let config = BoardConfig::new(rows, columns, layout.mine_count())?;

        let mut flag_count: CellCount = 0;
        let mut covered_safe_count: CellCount = 0;
        let mut open_mines: CellCount = 0;
        for ((row, column), cell) in cells.indexed_iter() {
            let coords = (row as Coord, column as Coord);
            let expected = if cell.is_mine() {
                0
            } else {
                layout.adjacent_mine_count(coords)
            };
            if cell.adjacent_mine_count() != expected {
                return Err(InconsistentSave("adjacent mine count does not match the mines"));
            }
            if cell.is_flagged() {
                if !cell.is_covered() {
                    return Err(InconsistentSave("flag on an uncovered cell"));
                }
                flag_count += 1;
            }
            match (cell.is_covered(), cell.is_mine()) {
                (true, false) => covered_safe_count += 1,
                (false, true) => open_mines += 1,
                _ => {}
            }
        }

        if flag_count > config.mines {
            return Err(InconsistentSave("more flags than mines"));
        }

        let triggered_is_mine = triggered_mine
            .and_then(|coords| in_bounds(coords, config.size()))
            .is_some_and(|coords| layout[coords]);
        match state {
            BoardState::InProgress if open_mines > 0 || covered_safe_count == 0 => {
                return Err(InconsistentSave("game in progress has no play left"));
            }
            BoardState::Won if covered_safe_count > 0 || open_mines > 0 => {
                return Err(InconsistentSave("won game still has covered safe cells"));
            }
            BoardState::Lost if !triggered_is_mine || open_mines != config.mines => {
                return Err(InconsistentSave("lost game does not show every mine"));
            }
            BoardState::InProgress | BoardState::Won if triggered_mine.is_some() => {
                return Err(InconsistentSave("triggered mine on a game that was not lost"));
            }
            _ => {}
        }

        Ok(Self {
            cells,
            mine_count: config.mines,
            flag_count,
            covered_safe_count,
            state,
            cascade_flags,
            triggered_mine,
        })
    }
}
