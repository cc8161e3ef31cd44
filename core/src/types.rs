use ndarray::Array2;

/// Single coordinate axis, used for row/column indices and board dimensions.
pub type Coord = u8;

/// Count type used for mine, flag and cell counts.
pub type CellCount = u16;

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

/// Returns `coords` when it lies inside a grid of the given `(rows, columns)`.
pub const fn in_bounds(coords: Coord2, size: Coord2) -> Option<Coord2> {
    if coords.0 < size.0 && coords.1 < size.1 {
        Some(coords)
    } else {
        None
    }
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        let (rows, columns) = self.dim();
        // grids are only ever built from `Coord` sized dimensions
        let size = (rows as Coord, columns as Coord);
        NeighborIter::new(coords, size)
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, column) = coords;
    let (d_row, d_column) = delta;

    let next = (
        row.checked_add_signed(d_row)?,
        column.checked_add_signed(d_column)?,
    );
    in_bounds(next, bounds)
}

/// Iterates the up to 8 cells at Chebyshev distance 1, clipped at the board edges.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
