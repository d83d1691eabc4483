//! Shapes module - piece matrices and 90° rotation
//!
//! Every piece kind owns a square occupancy matrix (2x2, 3x3 or 4x4) in its own
//! coordinate frame. Rotation works on the matrix itself, so four successive
//! turns in the same direction always reproduce the original.

use crate::types::{PieceKind, MAX_SHAPE_SIZE};

/// Offset of a single occupied cell relative to the bounding-box origin
pub type CellOffset = (i8, i8);

/// Square occupancy matrix of a piece in its current orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    rows: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from a square 0/1 matrix
    pub fn from_matrix<const N: usize>(matrix: [[u8; N]; N]) -> Self {
        assert!(N > 0 && N <= MAX_SHAPE_SIZE, "shape size out of range");
        let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in matrix.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                rows[y][x] = v != 0;
            }
        }
        Self {
            size: N as u8,
            rows,
        }
    }

    /// Side length of the bounding box
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Width used by the kick search (the matrix is square)
    pub fn width(&self) -> u8 {
        self.size
    }

    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.size as usize && y < self.size as usize && self.rows[y][x]
    }

    /// Occupied cells as (dx, dy), row by row
    pub fn cells(&self) -> impl Iterator<Item = CellOffset> + '_ {
        let n = self.size as usize;
        (0..n).flat_map(move |y| {
            (0..n)
                .filter(move |&x| self.rows[y][x])
                .map(move |x| (x as i8, y as i8))
        })
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// Rotate 90°.
    ///
    /// The matrix is transposed, then each row is reversed for a clockwise turn,
    /// or the row order is reversed for a counter-clockwise turn.
    pub fn rotated(&self, clockwise: bool) -> Shape {
        let n = self.size as usize;
        let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for y in 0..n {
            for x in 0..n {
                // transposed[y][x] == self.rows[x][y]
                let v = self.rows[x][y];
                if clockwise {
                    rows[y][n - 1 - x] = v;
                } else {
                    rows[n - 1 - y][x] = v;
                }
            }
        }
        Shape {
            size: self.size,
            rows,
        }
    }

    /// Occupancy as nested rows (for encoding)
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        let n = self.size as usize;
        (0..n)
            .map(|y| (0..n).map(|x| self.rows[y][x] as u8).collect())
            .collect()
    }
}

/// Default (spawn) orientation of a piece kind
pub fn spawn_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => Shape::from_matrix([
            [0, 1, 0, 0],
            [0, 1, 0, 0],
            [0, 1, 0, 0],
            [0, 1, 0, 0],
        ]),
        PieceKind::J => Shape::from_matrix([[0, 1, 0], [0, 1, 0], [1, 1, 0]]),
        PieceKind::L => Shape::from_matrix([[0, 1, 0], [0, 1, 0], [0, 1, 1]]),
        PieceKind::O => Shape::from_matrix([[1, 1], [1, 1]]),
        PieceKind::S => Shape::from_matrix([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
        PieceKind::T => Shape::from_matrix([[0, 0, 0], [1, 1, 1], [0, 1, 0]]),
        PieceKind::Z => Shape::from_matrix([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
        PieceKind::I3 => Shape::from_matrix([[0, 0, 0], [1, 1, 1], [0, 0, 0]]),
        PieceKind::L3 => Shape::from_matrix([[1, 1], [1, 0]]),
    }
}
