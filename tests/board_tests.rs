//! Board tests - collision, settling and row compaction through the facade

use fallblock::core::{Board, Piece, PlaceError, Shape};
use fallblock::types::{Cell, PieceKind, RenderHandle, BOARD_HEIGHT, BOARD_WIDTH};

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert!(board.is_empty());
    assert!(board.full_rows().is_empty());
    for row in 0..BOARD_HEIGHT as i8 {
        for col in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(row, col), Some(Cell::Empty));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_HEIGHT as i8, 0), None);
    assert_eq!(board.get(0, BOARD_WIDTH as i8), None);
}

#[test]
fn test_board_set_out_of_bounds() {
    let mut board = Board::new();
    assert!(!board.set(-1, 0, Cell::Active));
    assert!(!board.set(0, 10, Cell::Active));
    assert!(board.set(23, 9, Cell::Active));
    assert_eq!(board.get(23, 9), Some(Cell::Active));
}

#[test]
fn test_can_place_respects_walls_floor_and_settled() {
    let board = Board::from_rows(&["....#....."]);
    let o = Shape::canonical(PieceKind::O);

    assert!(board.can_place(&o, 0, 0));
    assert!(board.can_place(&o, 0, 8));
    assert!(!board.can_place(&o, 0, 9));
    assert!(!board.can_place(&o, 0, -1));
    assert!(!board.can_place(&o, -1, 4));
    assert!(!board.can_place(&o, 23, 0));
    assert!(board.can_place(&o, 22, 2));
    assert!(!board.can_place(&o, 22, 3));
    assert!(!board.can_place(&o, 22, 4));
}

#[test]
fn test_active_cells_do_not_block() {
    let mut board = Board::new();
    let t = Shape::canonical(PieceKind::T);
    board.place(&t, 5, 3).unwrap();
    assert!(board.can_place(&t, 6, 3));
    board.place(&t, 6, 3).unwrap();
    assert_eq!(board.get(5, 3), Some(Cell::Empty));
    assert_eq!(board.get(7, 4), Some(Cell::Active));
}

#[test]
fn test_unchecked_place_reports_first_conflict() {
    let mut board = Board::from_rows(&["#........."]);
    let i = Shape::canonical(PieceKind::I);
    assert_eq!(
        board.place(&i, 20, 0),
        Err(PlaceError::Blocked { row: 23, col: 0 })
    );
    assert_eq!(
        board.place(&i, 21, 5),
        Err(PlaceError::OutOfBounds { row: 24, col: 5 })
    );
    assert!(board.cells().iter().all(|c| *c != Cell::Active));
}

#[test]
fn test_settle_keeps_render_handles() {
    let mut board = Board::new();
    let mut piece = Piece::new(PieceKind::O);
    piece.row = 22;
    piece.handles = vec![RenderHandle(10), RenderHandle(11), RenderHandle(12), RenderHandle(13)];
    board.place(&piece.shape, piece.row, piece.col).unwrap();
    board.settle(&piece);

    assert_eq!(board.get(22, 4), Some(Cell::Settled(RenderHandle(10))));
    assert_eq!(board.get(22, 5), Some(Cell::Settled(RenderHandle(11))));
    assert_eq!(board.get(23, 4), Some(Cell::Settled(RenderHandle(12))));
    assert_eq!(board.get(23, 5), Some(Cell::Settled(RenderHandle(13))));
    assert_eq!(board.settled().count(), 4);
}

#[test]
fn test_settle_without_handles_is_unbound() {
    let mut board = Board::new();
    let mut piece = Piece::new(PieceKind::I);
    piece.row = 20;
    board.place(&piece.shape, piece.row, piece.col).unwrap();
    board.settle(&piece);
    assert!(board
        .settled()
        .all(|(_, _, handle)| handle == RenderHandle::UNBOUND));
}

#[test]
fn test_single_full_row_clears_to_empty() {
    let mut board = Board::from_rows(&["##########"]);
    assert!(board.is_row_full(23));
    let rows = board.full_rows();
    assert_eq!(rows.as_slice(), &[23]);
    board.clear_rows(&rows);
    assert!(board.is_empty());
}

#[test]
fn test_non_contiguous_rows_compact() {
    let mut board = Board::from_rows(&[
        "#.........",
        "##########",
        ".#........",
        "##########",
        "..#.......",
    ]);
    let rows = board.full_rows();
    assert_eq!(rows.as_slice(), &[20, 22]);
    board.clear_rows(&rows);

    let expected = Board::from_rows(&["#.........", ".#........", "..#......."]);
    assert_eq!(board, expected);
}

#[test]
fn test_clear_rows_ignores_order_and_duplicates() {
    let mut a = Board::from_rows(&["##########", "#.........", "##########"]);
    let mut b = a.clone();
    a.clear_rows(&[21, 23]);
    b.clear_rows(&[23, 21, 23]);
    assert_eq!(a, b);
    assert_eq!(a.settled().count(), 1);
    assert_eq!(a.get(23, 0).map(|c| c.is_settled()), Some(true));
}

#[test]
fn test_top_rows_occupied() {
    let mut board = Board::new();
    assert!(!board.top_rows_occupied(4));
    board.set(4, 0, Cell::Settled(RenderHandle(0)));
    assert!(!board.top_rows_occupied(4));
    board.set(3, 9, Cell::Settled(RenderHandle(0)));
    assert!(board.top_rows_occupied(4));
    assert!(!board.top_rows_occupied(3));
}

#[test]
fn test_u8_grid() {
    let board = Board::from_rows(&["@.........", "#........."]);
    let mut grid = [[9u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
    board.write_u8_grid(&mut grid);
    assert_eq!(grid[22][0], 1);
    assert_eq!(grid[23][0], 2);
    assert_eq!(grid[0][0], 0);
}
