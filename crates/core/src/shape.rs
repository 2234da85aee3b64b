//! Shape module - piece matrices and the rotation transform
//!
//! A shape is a small rectangular boolean matrix (at most 4x4) marking the
//! occupied cells of a piece. Shapes are `Copy`, so every transform yields a
//! fresh matrix that never aliases its input.

use crate::types::PieceKind;

/// Largest side of any piece matrix
pub const MAX_SIDE: usize = 4;

/// Rectangular boolean matrix of occupied cells
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SIDE]; MAX_SIDE],
}

impl Shape {
    /// Build a shape from text rows, `*` marking an occupied cell.
    ///
    /// Rows must be non-empty, equally wide, and at most 4x4.
    pub const fn from_rows(rows: &[&str]) -> Self {
        let mut bits = [[false; MAX_SIDE]; MAX_SIDE];
        let height = rows.len();
        assert!(height > 0 && height <= MAX_SIDE);
        let width = rows[0].len();
        assert!(width > 0 && width <= MAX_SIDE);

        let mut r = 0;
        while r < height {
            let row = rows[r].as_bytes();
            assert!(row.len() == width);
            let mut c = 0;
            while c < width {
                bits[r][c] = row[c] == b'*';
                c += 1;
            }
            r += 1;
        }

        Self {
            rows: height as u8,
            cols: width as u8,
            bits,
        }
    }

    /// Spawn orientation of a piece kind
    pub const fn canonical(kind: PieceKind) -> Self {
        match kind {
            PieceKind::S => Self::from_rows(&["*.", "**", ".*"]),
            PieceKind::Z => Self::from_rows(&[".*", "**", "*."]),
            PieceKind::J => Self::from_rows(&[".*", ".*", "**"]),
            PieceKind::L => Self::from_rows(&["*.", "*.", "**"]),
            PieceKind::O => Self::from_rows(&["**", "**"]),
            PieceKind::I => Self::from_rows(&["*", "*", "*", "*"]),
            PieceKind::T => Self::from_rows(&["***", ".*."]),
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Whether the cell at (row, col) is occupied; false outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows as usize && col < self.cols as usize && self.bits[row][col]
    }

    /// Occupied cells as `(row, col)` offsets, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.rows as usize).flat_map(move |r| {
            (0..self.cols as usize)
                .filter(move |&c| self.bits[r][c])
                .map(move |c| (r as i8, c as i8))
        })
    }

    /// A square shape looks the same in every orientation.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols && self.cells().count() == (self.rows as usize).pow(2)
    }

    /// Quarter turn clockwise.
    pub fn rotated_cw(&self) -> Self {
        let mut out = Self {
            rows: self.cols,
            cols: self.rows,
            bits: [[false; MAX_SIDE]; MAX_SIDE],
        };
        let h = self.rows as usize;
        for (r, c) in self.cells() {
            let (r, c) = (r as usize, c as usize);
            out.bits[c][h - 1 - r] = true;
        }
        out
    }

    /// Rotate by a multiple of 90 degrees; positive is clockwise.
    ///
    /// Angles are normalized, so `-90`, `270` and `630` are the same turn.
    pub fn rotated(&self, degrees: i16) -> Self {
        debug_assert!(degrees % 90 == 0, "rotation must be a multiple of 90°");
        let quarters = (degrees / 90).rem_euclid(4);
        let mut out = *self;
        for _ in 0..quarters {
            out = out.rotated_cw();
        }
        out
    }
}

/// Rotate `shape` by `degrees` (±90/180/270), returning a new matrix.
pub fn rotate(shape: &Shape, degrees: i16) -> Shape {
    shape.rotated(degrees)
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for r in 0..self.rows as usize {
            let row: String = (0..self.cols as usize)
                .map(|c| if self.bits[r][c] { '*' } else { '.' })
                .collect();
            list.entry(&row);
        }
        list.finish()
    }
}
