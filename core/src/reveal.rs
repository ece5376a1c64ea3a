use alloc::{vec, vec::Vec};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// A cell opened by a reveal, with the value the player now sees.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedCell {
    pub row: Coord,
    pub column: Coord,
    pub value: CellValue,
}

impl OpenedCell {
    pub fn new((row, column): Coord2, value: CellValue) -> Self {
        Self { row, column, value }
    }

    pub fn coords(&self) -> Coord2 {
        (self.row, self.column)
    }
}

/// Cells a reveal starting at `start` has to open, in discovery order.
///
/// Zero cells spread to their orthogonal neighbors; numbered cells are included as the border of the region but never
/// expanded. A non-empty start yields just the start. Visibility is not consulted: opening is idempotent, so the
/// caller skips cells that are already open.
pub fn flood_region(grid: &Grid, start: Coord2) -> Vec<Coord2> {
    let mut discovered = HashSet::new();
    discovered.insert(start);
    let mut to_visit = vec![start];
    let mut region = Vec::new();

    while let Some(coords) = to_visit.pop() {
        region.push(coords);

        if !grid[coords].is_empty() {
            continue;
        }

        for next in grid.iter_neighbors(coords, Adjacency::Orthogonal) {
            if discovered.insert(next) {
                to_visit.push(next);
            }
        }
    }

    log::trace!(
        "Flood fill from {:?} discovered {} cells",
        start,
        region.len()
    );
    region
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut cells: Vec<Coord2>) -> Vec<Coord2> {
        cells.sort_unstable();
        cells
    }

    #[test]
    fn numbered_start_opens_only_itself() {
        let grid = Grid::from_mine_coords((3, 3), &[(0, 0)]).unwrap();
        assert_eq!(flood_region(&grid, (1, 1)), [(1, 1)]);
    }

    #[test]
    fn region_stops_at_numbered_border() {
        // . . 1 *
        // . . 1 1
        // . . . .
        let grid = Grid::from_mine_coords((3, 4), &[(0, 3)]).unwrap();
        let region = sorted(flood_region(&grid, (2, 0)));

        let expected: Vec<Coord2> = grid
            .iter_cells()
            .filter(|(_, value)| !value.is_mine())
            .map(|(coords, _)| coords)
            .collect();
        assert_eq!(region, expected);
    }

    #[test]
    fn diagonal_zero_cells_are_not_connected() {
        // . 1 *
        // 1 2 1
        // * 1 .
        let grid = Grid::from_mine_coords((3, 3), &[(0, 2), (2, 0)]).unwrap();
        assert_eq!(grid[(0, 0)], CellValue::Proximity(0));
        assert_eq!(grid[(2, 2)], CellValue::Proximity(0));

        let region = sorted(flood_region(&grid, (0, 0)));
        assert_eq!(region, [(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn every_cell_is_discovered_once() {
        let grid = Grid::from_mine_coords((20, 20), &[(10, 10)]).unwrap();
        let region = flood_region(&grid, (0, 0));

        let mut unique = region.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), region.len());
        assert_eq!(region.len(), 399);
    }

    #[test]
    fn large_open_board_needs_no_depth_cap() {
        let grid = Grid::from_mine_coords((300, 300), &[(299, 299)]).unwrap();
        assert_eq!(flood_region(&grid, (0, 0)).len(), 300 * 300 - 1);
    }
}
