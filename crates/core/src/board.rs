//! Board module - manages the game grid
//!
//! The board is a 10x24 grid (top 4 rows are the spawn/loss buffer) where each
//! cell is empty, part of the falling piece, or settled terrain.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (row, col) where row ranges 0..23 (top to bottom), col 0..9.

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::piece::Piece;
use crate::shape::Shape;
use crate::types::{Cell, RenderHandle, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

/// Row indices, at most one per board row
pub type Rows = ArrayVec<usize, { BOARD_HEIGHT as usize }>;

/// A placement attempted without a successful `can_place` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: i8, col: i8 },
    #[error("cell ({row}, {col}) is already settled")]
    Blocked { row: i8, col: i8 },
}

/// The game board - 10 columns x 24 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= BOARD_HEIGHT as i8 || col < 0 || col >= BOARD_WIDTH as i8 {
            return None;
        }
        Some((row as usize) * (BOARD_WIDTH as usize) + (col as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at (row, col); `None` if out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col); returns false if out of bounds
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// First cell of `shape` at `(row, col)` that could not be occupied.
    fn first_conflict(&self, shape: &Shape, row: i8, col: i8) -> Option<PlaceError> {
        shape.cells().find_map(|(dr, dc)| {
            let (r, c) = (row + dr, col + dc);
            match self.get(r, c) {
                None => Some(PlaceError::OutOfBounds { row: r, col: c }),
                Some(Cell::Settled(_)) => Some(PlaceError::Blocked { row: r, col: c }),
                Some(_) => None,
            }
        })
    }

    /// Whether every occupied cell of `shape` anchored at `(row, col)` is
    /// in bounds and not settled. Active cells count as free.
    pub fn can_place(&self, shape: &Shape, row: i8, col: i8) -> bool {
        self.first_conflict(shape, row, col).is_none()
    }

    /// Move the active cells to `shape` anchored at `(row, col)`.
    ///
    /// Callers check with [`Board::can_place`] first; an unchecked placement
    /// that would collide is rejected and leaves the board untouched.
    pub fn place(&mut self, shape: &Shape, row: i8, col: i8) -> Result<(), PlaceError> {
        if let Some(err) = self.first_conflict(shape, row, col) {
            return Err(err);
        }

        self.clear_active();
        for (dr, dc) in shape.cells() {
            self.set(row + dr, col + dc, Cell::Active);
        }
        Ok(())
    }

    /// Reset every active cell to empty
    pub fn clear_active(&mut self) {
        for cell in &mut self.cells {
            if *cell == Cell::Active {
                *cell = Cell::Empty;
            }
        }
    }

    /// Lock the active cells into settled terrain, tagging each with the
    /// piece's render handle for that cell.
    pub fn settle(&mut self, piece: &Piece) {
        for (i, (row, col)) in piece.cells().enumerate() {
            let handle = piece
                .handles
                .get(i)
                .copied()
                .unwrap_or(RenderHandle::UNBOUND);
            if self.get(row, col) == Some(Cell::Active) {
                self.set(row, col, Cell::Settled(handle));
            }
        }

        // Anything still active was not part of the piece's footprint.
        debug_assert!(!self.cells.contains(&Cell::Active));
        for cell in &mut self.cells {
            if *cell == Cell::Active {
                *cell = Cell::Settled(RenderHandle::UNBOUND);
            }
        }
    }

    /// Check if a row has no empty cell
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= BOARD_HEIGHT as usize {
            return false;
        }
        self.row(row).iter().all(|cell| !cell.is_empty())
    }

    /// Cells of one row
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * BOARD_WIDTH as usize;
        &self.cells[start..start + BOARD_WIDTH as usize]
    }

    /// Indices of full rows, ascending
    pub fn full_rows(&self) -> Rows {
        (0..BOARD_HEIGHT as usize)
            .filter(|&row| self.is_row_full(row))
            .collect()
    }

    /// Remove the given rows, compacting the rest downward and filling the top
    /// with empty rows. Row order and duplicates in `rows` do not matter.
    /// Uses a two-pointer pass with zero allocation.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        let mut doomed = [false; BOARD_HEIGHT as usize];
        for &row in rows {
            if row < BOARD_HEIGHT as usize {
                doomed[row] = true;
            }
        }

        let width = BOARD_WIDTH as usize;
        let mut write_row = BOARD_HEIGHT as usize;

        // Scan from bottom to top
        for read_row in (0..BOARD_HEIGHT as usize).rev() {
            if doomed[read_row] {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                // copy_within handles the overlapping ranges
                let src = read_row * width;
                self.cells.copy_within(src..src + width, write_row * width);
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_row * width] {
            *cell = Cell::Empty;
        }
    }

    /// Whether any of the first `n` rows holds a non-empty cell
    pub fn top_rows_occupied(&self, n: u8) -> bool {
        let n = n.min(BOARD_HEIGHT) as usize;
        self.cells[..n * BOARD_WIDTH as usize]
            .iter()
            .any(|cell| !cell.is_empty())
    }

    /// Whether the whole board is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Settled handles with their (row, col)
    pub fn settled(&self) -> impl Iterator<Item = (i8, i8, RenderHandle)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| match cell {
            Cell::Settled(handle) => Some((
                (idx / BOARD_WIDTH as usize) as i8,
                (idx % BOARD_WIDTH as usize) as i8,
                *handle,
            )),
            _ => None,
        })
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write a compact grid: 0 empty, 1 active, 2 settled.
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        for (row, line) in out.iter_mut().enumerate() {
            for (col, v) in line.iter_mut().enumerate() {
                *v = match self.cells[row * BOARD_WIDTH as usize + col] {
                    Cell::Empty => 0,
                    Cell::Active => 1,
                    Cell::Settled(_) => 2,
                };
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Build a board from text rows (`.` empty, `@` active, `#` settled),
    /// aligned to the bottom of the board. Settled cells get handle 0.
    pub fn from_rows(rows: &[&str]) -> Self {
        assert!(rows.len() <= BOARD_HEIGHT as usize);
        let mut board = Self::new();
        let top = BOARD_HEIGHT as usize - rows.len();
        for (i, text) in rows.iter().enumerate() {
            assert_eq!(text.len(), BOARD_WIDTH as usize, "row {i} has wrong width");
            for (col, ch) in text.chars().enumerate() {
                let cell = match ch {
                    '@' => Cell::Active,
                    '#' => Cell::Settled(RenderHandle(0)),
                    _ => Cell::Empty,
                };
                board.set((top + i) as i8, col as i8, cell);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// One text line per row: `.` empty, `@` active, `#` settled.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_HEIGHT as usize {
            for cell in self.row(row) {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Active => '@',
                    Cell::Settled(_) => '#',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(0, 9), Some(9));
        assert_eq!(Board::index(1, 0), Some(10));
        assert_eq!(Board::index(23, 9), Some(239));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(0, 10), None);
        assert_eq!(Board::index(24, 0), None);
    }

    #[test]
    fn test_place_moves_active_cells() {
        let mut board = Board::new();
        let o = Shape::canonical(PieceKind::O);

        board.place(&o, 0, 4).unwrap();
        board.place(&o, 1, 4).unwrap();

        let active = board.cells().iter().filter(|c| **c == Cell::Active).count();
        assert_eq!(active, 4);
        assert_eq!(board.get(0, 4), Some(Cell::Empty));
        assert_eq!(board.get(2, 5), Some(Cell::Active));
    }

    #[test]
    fn test_unchecked_place_is_rejected() {
        let mut board = Board::from_rows(&["####......"]);
        let o = Shape::canonical(PieceKind::O);
        board.place(&o, 0, 0).unwrap();
        let before = board.clone();

        assert_eq!(
            board.place(&o, 22, 2),
            Err(PlaceError::Blocked { row: 23, col: 2 })
        );
        assert_eq!(
            board.place(&o, 0, 9),
            Err(PlaceError::OutOfBounds { row: 0, col: 10 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_display_dump() {
        let board = Board::from_rows(&["@@........", "#########."]);
        let dump = board.to_string();
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 24);
        assert_eq!(lines[22], "@@........");
        assert_eq!(lines[23], "#########.");
    }
}
