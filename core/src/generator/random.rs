use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling: draw a random cell, draw again when it already
/// holds a mine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds from the thread-local generator.
    pub fn from_thread_rng() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: BoardConfig) -> Result<MineLayout> {
        // must hold or the sampling loop below never terminates
        config.validate()?;

        let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed: CellCount = 0;
        let mut draws: u32 = 0;

        while mines_placed < config.mines {
            let coords: Coord2 = (
                rng.random_range(0..config.rows),
                rng.random_range(0..config.columns),
            );
            draws += 1;

            let cell = &mut mines[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                mines_placed += 1;
            }
        }

        log::debug!(
            "placed {} mines on {}x{} after {} draws, seed {}",
            mines_placed,
            config.rows,
            config.columns,
            draws,
            self.seed
        );
        MineLayout::from_mine_mask(mines)
    }
}
