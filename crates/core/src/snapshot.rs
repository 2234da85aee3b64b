//! Plain, serializable views of the session for hosts and debugging.

use serde::Serialize;

use crate::piece::Piece;
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub row: i8,
    pub col: i8,
    pub rotation: u8,
    /// Occupied board cells, row-major
    pub cells: [(i8, i8); 4],
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        let mut cells = [(0, 0); 4];
        for (slot, cell) in cells.iter_mut().zip(value.cells()) {
            *slot = cell;
        }
        Self {
            kind: value.kind,
            row: value.row,
            col: value.col,
            rotation: value.rotation,
            cells,
        }
    }
}

/// Everything a display needs after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameSnapshot {
    /// 0 empty, 1 active, 2 settled
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub preview: Option<PieceKind>,
    pub score: u32,
    pub high_score: u32,
    pub lines: u32,
    pub level: u32,
    pub high_level: u32,
    pub level_up_counter: u32,
    pub tickrate_ms: u64,
    pub paused: bool,
    pub lost: bool,
    pub piece_active: bool,
    pub spin_grace: bool,
    pub hover_grace: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            preview: None,
            score: 0,
            high_score: 0,
            lines: 0,
            level: 0,
            high_level: 0,
            level_up_counter: 0,
            tickrate_ms: 0,
            paused: false,
            lost: false,
            piece_active: false,
            spin_grace: false,
            hover_grace: false,
        }
    }
}
