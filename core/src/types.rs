/// Single coordinate axis used for row/column indices and board dimensions.
pub type Coord = u16;

/// Count type used for mine counts, flag counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Which cells count as neighbors of a given cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Adjacency {
    /// All eight surrounding cells, diagonals included. Used for proximity counts.
    Surrounding,
    /// Up, right, down and left only. Used for zero-region connectivity.
    Orthogonal,
}

impl Adjacency {
    const fn displacements(self) -> &'static [(isize, isize)] {
        match self {
            Self::Surrounding => &SURROUNDING,
            Self::Orthogonal => &ORTHOGONAL,
        }
    }
}

const SURROUNDING: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, column) = coords;
    let (d_row, d_column) = delta;
    let (rows, columns) = bounds;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= rows {
        return None;
    }

    let next_column = column.checked_add_signed(d_column.try_into().ok()?)?;
    if next_column >= columns {
        return None;
    }

    Some((next_row, next_column))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(isize, isize)],
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2, adjacency: Adjacency) -> Self {
        Self {
            center,
            bounds,
            displacements: adjacency.displacements(),
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *self.displacements.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
