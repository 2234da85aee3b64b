//! Piece tests - shapes, rotation placement and the randomizer

use fallblock::core::{
    rotate, spawn_position, within_grace, Piece, Randomizer, RandomizerPolicy, Shape, WALL_KICKS,
};
use fallblock::types::{PieceKind, Spin};

#[test]
fn test_canonical_spawn_orientations() {
    assert_eq!(
        Shape::canonical(PieceKind::S),
        Shape::from_rows(&["*.", "**", ".*"])
    );
    assert_eq!(
        Shape::canonical(PieceKind::Z),
        Shape::from_rows(&[".*", "**", "*."])
    );
    assert_eq!(
        Shape::canonical(PieceKind::L),
        Shape::from_rows(&["*.", "*.", "**"])
    );
    assert_eq!(
        Shape::canonical(PieceKind::T),
        Shape::from_rows(&["***", ".*."])
    );
}

#[test]
fn test_rotate_returns_new_matrix() {
    let l = Shape::canonical(PieceKind::L);
    let turned = rotate(&l, 90);
    assert_eq!(turned, Shape::from_rows(&["***", "*.."]));
    // Input untouched.
    assert_eq!(l, Shape::canonical(PieceKind::L));
    assert_eq!(rotate(&turned, -90), l);
}

#[test]
fn test_spawn_positions() {
    for kind in PieceKind::ALL {
        let shape = Shape::canonical(kind);
        let (row, col) = spawn_position(&shape);
        assert_eq!(row, 0);
        assert_eq!(col, ((10 - shape.cols()) / 2) as i8, "{kind:?}");
    }
}

#[test]
fn test_rotation_cycle_returns_to_anchor() {
    for kind in PieceKind::ALL {
        let mut piece = Piece::new(kind);
        piece.row = 12;
        let start = (piece.row, piece.col, piece.shape);
        for _ in 0..4 {
            if let Some(target) = piece.rotation_target(Spin::Ccw) {
                piece.shape = target.shape;
                piece.row = target.row;
                piece.col = target.col;
                piece.rotation = target.rotation;
            }
        }
        assert_eq!((piece.row, piece.col, piece.shape), start, "{kind:?}");
        assert_eq!(piece.rotation, 0);
    }
}

#[test]
fn test_kicks_in_fixed_order() {
    assert_eq!(
        WALL_KICKS,
        [
            (0, -1),
            (0, 1),
            (-1, 0),
            (0, -2),
            (0, 2),
            (-2, 0),
            (-1, -1),
            (-1, 1)
        ]
    );
    let target = Piece::new(PieceKind::T).rotation_target(Spin::Cw).unwrap();
    let kicked = target.kicked(WALL_KICKS[2]);
    assert_eq!((kicked.row, kicked.col), (target.row - 1, target.col));
    assert_eq!(kicked.shape, target.shape);
}

#[test]
fn test_grace_is_half_open() {
    assert!(within_grace(499, 0, 500));
    assert!(!within_grace(500, 0, 500));
    // A clock that has not moved yet is still inside the window.
    assert!(within_grace(0, 10, 500));
}

#[test]
fn test_bag_is_permutation_per_seven_draws() {
    let mut randomizer = Randomizer::new(RandomizerPolicy::Bag, 2024);
    for _ in 0..20 {
        let mut bag: Vec<_> = (0..7).map(|_| randomizer.draw()).collect();
        bag.sort();
        assert_eq!(bag, PieceKind::ALL.to_vec());
    }
}

#[test]
fn test_seed_reproduces_sequence() {
    let mut a = Randomizer::new(RandomizerPolicy::Bag, 77);
    let mut b = Randomizer::new(RandomizerPolicy::Bag, 77);
    let xs: Vec<_> = (0..30).map(|_| a.draw()).collect();
    let ys: Vec<_> = (0..30).map(|_| b.draw()).collect();
    assert_eq!(xs, ys);
}
