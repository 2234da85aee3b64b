//! Piece module - a single preview/falling piece and its rotation rules
//!
//! Rotation keeps the bounding box's geometric center in place (rounded toward
//! the top-left), then applies a corrective nudge from a 4-entry cycle indexed
//! by the rotation state. The cycle exactly cancels the rounding drift over a
//! full turn, so four quarter turns bring the piece back to where it started.
//! If that placement collides, the fixed kick list is tried in order.

use crate::shape::Shape;
use crate::types::{PieceKind, RenderHandle, Spin, BOARD_WIDTH};

/// `(row, col)` offset
pub type Offset = (i8, i8);

/// Nudges after a clockwise turn for the 3-long pieces (S, Z, J, L, T)
pub const TRIO_OFFSETS: [Offset; 4] = [(1, 1), (0, 0), (1, 1), (0, 0)];

/// Nudges after a clockwise turn for the I piece
pub const BAR_OFFSETS: [Offset; 4] = [(0, 1), (1, 0), (0, 1), (1, 0)];

/// Alternate placements tried, in order, when a rotated piece collides
pub const WALL_KICKS: [Offset; 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (0, -2),
    (0, 2),
    (-2, 0),
    (-1, -1),
    (-1, 1),
];

/// Spawn anchor: top row, horizontally centered.
pub fn spawn_position(shape: &Shape) -> (i8, i8) {
    (0, ((BOARD_WIDTH - shape.cols()) / 2) as i8)
}

/// Corrective-offset cycle for a piece kind (`None` for the square).
pub fn offset_cycle(kind: PieceKind) -> Option<&'static [Offset; 4]> {
    match kind {
        PieceKind::O => None,
        PieceKind::I => Some(&BAR_OFFSETS),
        PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L | PieceKind::T => {
            Some(&TRIO_OFFSETS)
        }
    }
}

/// A piece: shape, anchor (top-left of the matrix) and timing state.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub row: i8,
    pub col: i8,
    /// Rotation state in `0..4`
    pub rotation: u8,
    /// When the piece last moved down a row (or spawned)
    pub last_descended_at: u64,
    /// When the piece last rotated successfully
    pub last_rotated_at: Option<u64>,
    /// Render handles, one per occupied cell in row-major order
    pub handles: Vec<RenderHandle>,
}

impl Piece {
    /// A preview piece in spawn orientation at the spawn anchor.
    pub fn new(kind: PieceKind) -> Self {
        let shape = Shape::canonical(kind);
        let (row, col) = spawn_position(&shape);
        Self {
            kind,
            shape,
            row,
            col,
            rotation: 0,
            last_descended_at: 0,
            last_rotated_at: None,
            handles: Vec::new(),
        }
    }

    /// Occupied board cells at the current anchor, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .map(move |(r, c)| (self.row + r, self.col + c))
    }

    /// Column span `[left, right)` covered by the matrix.
    pub fn column_span(&self) -> (i8, i8) {
        (self.col, self.col + self.shape.cols() as i8)
    }

    /// Compute the default (un-kicked) result of a rotation.
    ///
    /// Returns `None` for the square, which never rotates.
    pub fn rotation_target(&self, spin: Spin) -> Option<RotationTarget> {
        let cycle = offset_cycle(self.kind)?;
        let shape = self.shape.rotated(spin.degrees());

        let (row, col) = recenter(
            (self.row, self.col),
            (self.shape.rows(), self.shape.cols()),
            (shape.rows(), shape.cols()),
        );

        let (rotation, (dr, dc)) = match spin {
            Spin::Cw => (((self.rotation + 1) % 4), cycle[self.rotation as usize]),
            Spin::Ccw => {
                // Undoes the clockwise step out of the state we return to.
                let back = (self.rotation + 3) % 4;
                let (r, c) = cycle[back as usize];
                (back, (1 - r, 1 - c))
            }
        };

        Some(RotationTarget {
            shape,
            row: row + dr,
            col: col + dc,
            rotation,
        })
    }
}

/// Where a rotation wants to put the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationTarget {
    pub shape: Shape,
    pub row: i8,
    pub col: i8,
    pub rotation: u8,
}

impl RotationTarget {
    /// Same target moved by a kick offset.
    pub fn kicked(self, (dr, dc): Offset) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
            ..self
        }
    }
}

/// New anchor keeping the bounding box center fixed, rounding toward -inf.
fn recenter(anchor: (i8, i8), from: (u8, u8), to: (u8, u8)) -> (i8, i8) {
    let axis = |pos: i8, old: u8, new: u8| -> i8 {
        let doubled_center = 2 * pos as i16 + old as i16 - 1;
        (doubled_center - (new as i16 - 1)).div_euclid(2) as i8
    };
    (axis(anchor.0, from.0, to.0), axis(anchor.1, from.1, to.1))
}

/// Pure grace-window test: has less than `grace_ms` passed since `since`?
pub fn within_grace(now: u64, since: u64, grace_ms: u64) -> bool {
    now.saturating_sub(since) < grace_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotate_in_place(piece: &mut Piece, spin: Spin) {
        let target = piece.rotation_target(spin).unwrap();
        piece.shape = target.shape;
        piece.row = target.row;
        piece.col = target.col;
        piece.rotation = target.rotation;
    }

    #[test]
    fn spawn_is_centered() {
        assert_eq!(Piece::new(PieceKind::O).col, 4);
        assert_eq!(Piece::new(PieceKind::T).col, 3);
        assert_eq!(Piece::new(PieceKind::I).col, 4);
        assert_eq!(Piece::new(PieceKind::S).row, 0);
    }

    #[test]
    fn square_has_no_rotation() {
        assert!(Piece::new(PieceKind::O).rotation_target(Spin::Cw).is_none());
    }

    #[test]
    fn four_turns_return_home() {
        for kind in PieceKind::ALL.into_iter().filter(|k| *k != PieceKind::O) {
            for spin in [Spin::Cw, Spin::Ccw] {
                let mut piece = Piece::new(kind);
                piece.row = 10;
                let start = piece.clone();
                for _ in 0..4 {
                    rotate_in_place(&mut piece, spin);
                }
                assert_eq!(piece, start, "{kind:?} {spin:?}");
            }
        }
    }

    #[test]
    fn ccw_undoes_cw() {
        for kind in PieceKind::ALL.into_iter().filter(|k| *k != PieceKind::O) {
            let mut piece = Piece::new(kind);
            piece.row = 8;
            for _ in 0..3 {
                let before = piece.clone();
                rotate_in_place(&mut piece, Spin::Cw);
                let mut back = piece.clone();
                rotate_in_place(&mut back, Spin::Ccw);
                assert_eq!(back, before, "{kind:?}");
            }
        }
    }

    #[test]
    fn t_turn_keeps_center_row() {
        // "***" over ".*." at (10, 3) becomes a 3-tall shape hanging from row 10.
        let mut piece = Piece::new(PieceKind::T);
        piece.row = 10;
        let target = piece.rotation_target(Spin::Cw).unwrap();
        assert_eq!((target.row, target.col, target.rotation), (10, 4, 1));
    }

    #[test]
    fn grace_window() {
        assert!(within_grace(1_200, 1_000, 500));
        assert!(!within_grace(1_500, 1_000, 500));
        assert!(!within_grace(900, 1_000, 0));
    }
}
