use crate::*;
pub use random::*;

mod random;

/// Produces the mine layout for a new board.
pub trait MineGenerator {
    fn generate(self, config: BoardConfig) -> Result<MineLayout>;
}

/// Hands out a prepared layout, used to replay a known board.
impl MineGenerator for MineLayout {
    fn generate(self, config: BoardConfig) -> Result<MineLayout> {
        if self.size() != config.size() || self.mine_count() != config.mines {
            return Err(GameError::InvalidConfiguration {
                rows: config.rows,
                columns: config.columns,
                mines: config.mines,
            });
        }
        Ok(self)
    }
}
