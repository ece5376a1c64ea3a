use crate::*;
pub use row_capped::*;

mod row_capped;

pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> Result<Grid>;
}
