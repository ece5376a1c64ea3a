use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a cell holds, independent of whether the player can see it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    /// Number of mines among the surrounding cells, `0..=8`.
    Proximity(u8),
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Zero-proximity cells are the ones a flood fill expands through.
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Proximity(0))
    }

    pub const fn proximity(self) -> Option<u8> {
        match self {
            Self::Mine => None,
            Self::Proximity(count) => Some(count),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Proximity(0)
    }
}

/// Player-visible state of a cell. `Opened` is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Opened,
}

impl CellState {
    pub const fn is_unopened(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// The rows×columns matrix of cell values for one game.
///
/// Only the values go over the wire. Size, mine count and proximity are rebuilt from the mines on deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub struct Grid {
    values: Array2<CellValue>,
    size: Coord2,
    mine_count: CellCount,
}

impl Grid {
    /// Builds a grid from a mine mask, computing every proximity value.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, columns) = mine_mask.dim();
        let size: Coord2 = (
            rows.try_into().map_err(|_| ConfigIssue::BoardTooLarge)?,
            columns.try_into().map_err(|_| ConfigIssue::BoardTooLarge)?,
        );
        if size.0 == 0 || size.1 == 0 {
            return Err(ConfigIssue::EmptyBoard.into());
        }

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        let values = annotate(&mine_mask, size);

        Ok(Self {
            values,
            size,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(ConfigIssue::EmptyBoard.into());
        }
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &(row, column) in mine_coords {
            if row >= size.0 || column >= size.1 {
                return Err(GameError::OutOfBounds { row, column });
            }
            mine_mask[(row, column).to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size.0, self.size.1, self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (row, column) = coords;
        if row < self.size.0 && column < self.size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds { row, column })
        }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn rows(&self) -> Coord {
        self.size.0
    }

    pub fn columns(&self) -> Coord {
        self.size.1
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    pub fn iter_neighbors(&self, coords: Coord2, adjacency: Adjacency) -> NeighborIter {
        NeighborIter::new(coords, self.size, adjacency)
    }

    /// All cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, CellValue)> + '_ {
        self.values
            .indexed_iter()
            .map(|((row, column), &value)| ((row as Coord, column as Coord), value))
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_cells()
            .filter(|(_, value)| value.is_mine())
            .map(|(coords, _)| coords)
    }
}

#[derive(Serialize, Deserialize)]
struct GridRepr {
    values: Array2<CellValue>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = GameError;

    fn try_from(repr: GridRepr) -> Result<Self> {
        Self::from_mine_mask(repr.values.mapv(CellValue::is_mine))
    }
}

impl From<Grid> for GridRepr {
    fn from(grid: Grid) -> Self {
        Self { values: grid.values }
    }
}

impl Index<Coord2> for Grid {
    type Output = CellValue;

    fn index(&self, (row, column): Coord2) -> &Self::Output {
        &self.values[(row as usize, column as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn from_mine_coords_counts_mines_and_proximity() {
        let grid = Grid::from_mine_coords((2, 3), &[(0, 0), (1, 2)]).unwrap();

        assert_eq!(grid.mine_count(), 2);
        assert_eq!(grid.safe_cell_count(), 4);
        assert_eq!(grid[(0, 1)], CellValue::Proximity(2));
        assert_eq!(grid[(1, 0)], CellValue::Proximity(1));
        assert!(grid.contains_mine((1, 2)));
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds_mine() {
        assert_eq!(
            Grid::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::OutOfBounds { row: 2, column: 0 })
        );
    }

    #[test]
    fn validate_coords_checks_both_axes() {
        let grid = Grid::from_mine_coords((2, 3), &[(0, 0)]).unwrap();

        assert_eq!(grid.validate_coords((1, 2)), Ok((1, 2)));
        assert_eq!(
            grid.validate_coords((1, 3)),
            Err(GameError::OutOfBounds { row: 1, column: 3 })
        );
        assert_eq!(
            grid.validate_coords((2, 0)),
            Err(GameError::OutOfBounds { row: 2, column: 0 })
        );
    }

    #[test]
    fn mine_coords_are_row_major() {
        let grid = Grid::from_mine_coords((3, 3), &[(2, 0), (0, 2), (1, 1)]).unwrap();
        let mines: Vec<_> = grid.mine_coords().collect();

        assert_eq!(mines, [(0, 2), (1, 1), (2, 0)]);
    }

    #[test]
    fn deserialized_grid_takes_size_from_its_values() {
        let grid = Grid::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut json = serde_json::to_value(&grid).unwrap();
        assert!(json.get("size").is_none());

        json["size"] = serde_json::json!([5, 5]);
        json["mine_count"] = serde_json::json!(3);
        let restored: Grid = serde_json::from_value(json).unwrap();

        assert_eq!(restored, grid);
        assert_eq!(restored.size(), (2, 2));
        assert_eq!(
            restored.validate_coords((3, 3)),
            Err(GameError::OutOfBounds { row: 3, column: 3 })
        );
    }

    #[test]
    fn deserialized_proximity_is_recomputed() {
        let grid = Grid::from_mine_coords((1, 3), &[(0, 0)]).unwrap();
        let mut json = serde_json::to_value(&grid).unwrap();
        json["values"]["data"][2] = serde_json::json!({ "Proximity": 7 });

        let restored: Grid = serde_json::from_value(json).unwrap();

        assert_eq!(restored[(0, 2)], CellValue::Proximity(0));
        assert_eq!(restored, grid);
    }

    #[test]
    fn empty_board_is_rejected() {
        assert_eq!(
            Grid::from_mine_coords((0, 4), &[]),
            Err(GameError::InvalidConfiguration(ConfigIssue::EmptyBoard))
        );
    }
}
