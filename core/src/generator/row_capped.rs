use ndarray::Array2;

use super::*;

/// A draw in `[0, 100)` has to exceed this to drop a mine on the current cell.
pub const PLACEMENT_THRESHOLD: u32 = 95;

/// Upper bound on full-board sweeps before the remaining mines are scattered uniformly.
pub const MAX_SWEEPS: u32 = 64;

/// Per-row cap on mines placed during one sweep, `round(columns / 7)`.
pub const fn row_cap(columns: Coord) -> CellCount {
    (columns as CellCount + 3) / 7
}

/// Sweeps the board row by row dropping mines with a small fixed chance, never more than [`row_cap`] per row and
/// sweep, until the requested count is reached.
///
/// Sweeps are bounded by [`MAX_SWEEPS`]. Boards narrow enough that the row cap is zero, or unlucky enough to run out
/// of sweeps, get their remaining mines scattered uniformly over the free cells, so the count is always exact.
#[derive(Debug)]
pub struct RowCappedGenerator<R> {
    rng: R,
}

impl<R: RandomSource> RowCappedGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One pass over the board. Returns how many mines are still missing.
    fn sweep(&mut self, mine_mask: &mut Array2<bool>, size: Coord2, mut remaining: CellCount) -> CellCount {
        let (rows, columns) = size;
        let cap = row_cap(columns);

        for row in 0..rows {
            let mut placed_in_row = 0;
            for column in 0..columns {
                let cell = &mut mine_mask[(row, column).to_nd_index()];
                if *cell {
                    continue;
                }

                if self.rng.below(100) > PLACEMENT_THRESHOLD && placed_in_row < cap {
                    *cell = true;
                    remaining -= 1;
                    placed_in_row += 1;

                    if remaining == 0 {
                        return 0;
                    }
                }
            }
        }

        remaining
    }

    /// Drops the remaining mines on uniformly chosen free cells.
    fn scatter(&mut self, mine_mask: &mut Array2<bool>, mut remaining: CellCount, mut free_cells: CellCount) {
        while remaining > 0 && free_cells > 0 {
            let mut place = self.rng.below(free_cells);
            for cell in mine_mask.iter_mut().filter(|cell| !**cell) {
                if place == 0 {
                    *cell = true;
                    break;
                }
                place -= 1;
            }
            remaining -= 1;
            free_cells -= 1;
        }
    }
}

impl<R: RandomSource> MineGenerator for RowCappedGenerator<R> {
    fn generate(mut self, config: GameConfig) -> Result<Grid> {
        let config = config.validate()?;
        let size = config.size();
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        let mut remaining = config.mines;
        let mut sweeps = 0;
        if row_cap(config.columns) > 0 {
            while remaining > 0 && sweeps < MAX_SWEEPS {
                remaining = self.sweep(&mut mine_mask, size, remaining);
                sweeps += 1;
            }
        }

        if remaining > 0 {
            log::warn!(
                "Row-capped placement left {} of {} mines after {} sweeps, scattering the rest",
                remaining,
                config.mines,
                sweeps
            );
            let free_cells = config.total_cells() - (config.mines - remaining);
            self.scatter(&mut mine_mask, remaining, free_cells);
        }

        let grid = Grid::from_mine_mask(mine_mask)?;
        log::debug!(
            "Generated {}x{} board with {} mines in {} sweeps",
            config.rows,
            config.columns,
            grid.mine_count(),
            sweeps
        );
        Ok(grid)
    }
}
