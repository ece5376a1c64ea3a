use serde::{Deserialize, Serialize};

use crate::*;

/// Base edge length of a cell in pixels, used to turn a viewport into difficulty ranks.
pub const CELL_SIZE: u32 = 50;

/// Rank added by [`Difficulty::next`].
pub const RANK_STEP: u32 = 25;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyMode {
    Easy,
    Normal,
    Hard,
    Custom,
    Random,
}

impl DifficultyMode {
    /// Range of mine counts for a board of `cells` cells, handed to [`RandomSource::between`].
    pub const fn density_range(self, cells: CellCount) -> (CellCount, CellCount) {
        match self {
            Self::Easy => (cells / 6, cells.div_ceil(5)),
            Self::Normal => (cells / 5, cells.div_ceil(4)),
            Self::Hard => (cells / 4, cells.div_ceil(3)),
            Self::Custom | Self::Random => (cells / 6, cells.div_ceil(4)),
        }
    }
}

/// Pixel area available to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub grid_gap: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            grid_gap: 0,
        }
    }

    pub const fn with_grid_gap(self, grid_gap: u32) -> Self {
        Self { grid_gap, ..self }
    }

    /// Square of how many base-size cells fit across the viewport.
    pub fn max_rank(&self) -> u32 {
        let width = u64::from(self.width);
        let rank = width * width / u64::from(CELL_SIZE * CELL_SIZE);
        u32::try_from(rank).unwrap_or(u32::MAX)
    }

    pub fn mid_rank(&self) -> u32 {
        self.max_rank() / 2
    }

    pub fn min_rank(&self) -> u32 {
        self.max_rank() / 3
    }
}

/// Game difficulty: a mode picking the mine density and a rank picking the board size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub mode: DifficultyMode,
    pub rank: u32,
}

impl Difficulty {
    pub const fn custom(rank: u32) -> Self {
        Self {
            mode: DifficultyMode::Custom,
            rank,
        }
    }

    /// Draws a rank for `mode`. Easy and custom stay in the fixed 50..100 band, the others scale with the viewport.
    pub fn roll<R: RandomSource>(mode: DifficultyMode, viewport: Viewport, mut rng: R) -> Self {
        use DifficultyMode::*;

        let rank = match mode {
            Easy | Custom => rng.between(50, 100),
            Normal => rng.between(viewport.min_rank(), viewport.mid_rank()),
            Hard => rng.between(viewport.mid_rank(), viewport.max_rank()),
            Random => rng.between(viewport.min_rank(), viewport.max_rank()),
        };
        Self { mode, rank }
    }

    /// Difficulty for the "next game" step: one rank step up, unless the viewport cannot fit a bigger board.
    pub fn next(self, viewport: Viewport) -> Self {
        if viewport.max_rank() < self.rank {
            log::warn!("Game difficulty reached its max value at rank {}", self.rank);
            return self;
        }
        Self {
            rank: self.rank.saturating_add(RANK_STEP),
            ..self
        }
    }

    /// Derives board dimensions from the rank and the viewport shape, then draws a mine count for the mode.
    pub fn board_config<R: RandomSource>(&self, viewport: Viewport, mut rng: R) -> Result<GameConfig> {
        let width = u64::from(viewport.width.max(1));
        let height = u64::from(viewport.height.max(1));

        let base = u64::from(ceil_sqrt(self.rank).max(1));
        let columns = if width >= height {
            base + width.div_ceil(height)
        } else {
            base
        };
        let columns = Coord::try_from(columns).map_err(|_| ConfigIssue::BoardTooLarge)?;

        // cells are `width / columns` pixels wide, compared cross-multiplied to keep the fraction
        let span = u64::from(columns);
        let gap = u64::from(viewport.grid_gap);
        let mut rows: u64 = 0;
        let mut gaps: u64 = 0;
        while rows <= u64::from(Coord::MAX) && gaps <= height && (rows + 1) * width <= (height - gaps) * span {
            rows += 1;
            gaps = (rows - 1) * gap;
        }
        let rows = Coord::try_from(rows.max(1)).map_err(|_| ConfigIssue::BoardTooLarge)?;
        let cells = mult(rows, columns);

        let (low, high) = self.mode.density_range(cells);
        let mines = rng.between(low, high).clamp(1, cells.saturating_sub(1).max(1));
        log::debug!(
            "{:?} rank {} scaled to {}x{} with {} mines",
            self.mode,
            self.rank,
            rows,
            columns,
            mines
        );

        GameConfig::new(rows, columns, mines)
    }
}

fn ceil_sqrt(value: u32) -> u32 {
    let root = value.isqrt();
    if root * root < value { root + 1 } else { root }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    const LANDSCAPE: Viewport = Viewport::new(1000, 800);

    #[test]
    fn ceil_sqrt_rounds_up() {
        assert_eq!(ceil_sqrt(0), 0);
        assert_eq!(ceil_sqrt(64), 8);
        assert_eq!(ceil_sqrt(65), 9);
        assert_eq!(ceil_sqrt(99), 10);
    }

    #[test]
    fn ranks_scale_with_viewport_width() {
        assert_eq!(LANDSCAPE.max_rank(), 400);
        assert_eq!(LANDSCAPE.mid_rank(), 200);
        assert_eq!(LANDSCAPE.min_rank(), 133);
    }

    #[test]
    fn rolled_ranks_stay_in_their_band() {
        let mut rng = SeededRandom::new(5);
        for _ in 0..200 {
            let easy = Difficulty::roll(DifficultyMode::Easy, LANDSCAPE, &mut rng);
            assert!(easy.rank > 50 && easy.rank < 100);

            let hard = Difficulty::roll(DifficultyMode::Hard, LANDSCAPE, &mut rng);
            assert!(hard.rank > 200 && hard.rank < 400);
            assert_eq!(hard.mode, DifficultyMode::Hard);
        }
    }

    #[test]
    fn landscape_board_gets_extra_columns() {
        let config = Difficulty::custom(64)
            .board_config(LANDSCAPE, ScriptedRandom::new(&[0]))
            .unwrap();

        assert_eq!((config.rows, config.columns), (8, 10));
        // custom density over 80 cells is strictly between 13 and 20
        assert_eq!(config.mines, 14);
    }

    #[test]
    fn portrait_board_uses_square_base() {
        let config = Difficulty::custom(64)
            .board_config(Viewport::new(400, 800), SeededRandom::new(3))
            .unwrap();

        assert_eq!((config.rows, config.columns), (16, 8));
    }

    #[test]
    fn fractional_cell_size_limits_rows() {
        // cells are 1000 / 11 = 90.9px tall, so a fourth row would need 363.6px
        let config = Difficulty::custom(64)
            .board_config(Viewport::new(1000, 361), SeededRandom::new(3))
            .unwrap();

        assert_eq!((config.rows, config.columns), (3, 11));
    }

    #[test]
    fn extreme_viewport_is_too_large() {
        let result = Difficulty::custom(64).board_config(Viewport::new(u32::MAX, 1), SeededRandom::new(3));
        assert_eq!(
            result,
            Err(GameError::InvalidConfiguration(ConfigIssue::BoardTooLarge))
        );
    }

    #[test]
    fn grid_gaps_take_rows_away() {
        let viewport = LANDSCAPE.with_grid_gap(10);
        let config = Difficulty::custom(64)
            .board_config(viewport, SeededRandom::new(3))
            .unwrap();

        assert_eq!(config.rows, 7);
    }

    #[test]
    fn every_mode_yields_a_playable_board() {
        use DifficultyMode::*;

        let viewports = [LANDSCAPE, Viewport::new(360, 640), Viewport::new(120, 60)];
        let mut rng = SeededRandom::new(11);
        for viewport in viewports {
            for mode in [Easy, Normal, Hard, Custom, Random] {
                let difficulty = Difficulty::roll(mode, viewport, &mut rng);
                let config = difficulty.board_config(viewport, &mut rng).unwrap();
                assert!(config.mines > 0, "{difficulty:?} {viewport:?}");
                assert!(config.mines < config.total_cells(), "{difficulty:?} {viewport:?}");
            }
        }
    }

    #[test]
    fn next_steps_rank_until_viewport_is_full() {
        let difficulty = Difficulty::custom(390);
        assert_eq!(difficulty.next(LANDSCAPE).rank, 415);

        let maxed = Difficulty::custom(401);
        assert_eq!(maxed.next(LANDSCAPE), maxed);
    }

    #[test]
    fn density_ranges_follow_mode() {
        assert_eq!(DifficultyMode::Easy.density_range(100), (16, 20));
        assert_eq!(DifficultyMode::Normal.density_range(100), (20, 25));
        assert_eq!(DifficultyMode::Hard.density_range(100), (25, 34));
        assert_eq!(DifficultyMode::Random.density_range(100), (16, 25));
    }
}
