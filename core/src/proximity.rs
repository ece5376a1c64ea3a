use ndarray::Array2;

use crate::*;

/// Number of mines among the up-to-eight cells surrounding `coords`.
pub fn adjacent_mine_count(mine_mask: &Array2<bool>, coords: Coord2, size: Coord2) -> u8 {
    let mut count = 0;
    for pos in NeighborIter::new(coords, size, Adjacency::Surrounding) {
        if mine_mask[pos.to_nd_index()] {
            count += 1;
        }
    }
    count
}

/// Turns a mine mask into the full value matrix: mines stay mines, every other cell gets its proximity count.
///
/// `size` must match the mask's dimensions.
pub fn annotate(mine_mask: &Array2<bool>, size: Coord2) -> Array2<CellValue> {
    let (rows, columns) = size;
    let mut values = Array2::default(size.to_nd_index());
    for row in 0..rows {
        for column in 0..columns {
            let coords = (row, column);
            values[coords.to_nd_index()] = if mine_mask[coords.to_nd_index()] {
                CellValue::Mine
            } else {
                CellValue::Proximity(adjacent_mine_count(mine_mask, coords, size))
            };
        }
    }
    values
}
