//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine and its
//! hosts. All types are plain data with no behavior beyond parsing/formatting,
//! so they can be used from the core, the terminal front-end, and tests alike.
//!
//! # Board Dimensions
//!
//! The modeled playfield is 10 columns by 24 rows. The top [`BUFFER_ROWS`]
//! rows are an over-the-top buffer: pieces spawn there, and a piece that settles
//! with any cell inside it ends the game.
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 24 rows (indexed 0-23), rows 4-23 visible
//! - **Spawn row**: 0
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_BASE_MS` | 1000 | Gravity period at level 0 |
//! | `TICK_STEP_MS` | 50 | Period decrease per level |
//! | `TICK_FLOOR_MS` | 100 | Fastest possible period |
//! | `GRACE_MS` | 500 | Default hover/spin grace window |
//! | `CLEAR_STEP_MS` | 50 | Delay between clear-animation columns |
//!
//! # Examples
//!
//! ```
//! use fallblock_types::{Direction, GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_letter('t').unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.letter(), 'T');
//!
//! let action = GameAction::from_str("snapDown").unwrap();
//! assert_eq!(action, GameAction::Snap(Direction::Down));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 24);
//! ```

use serde::Serialize;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells, buffer rows included (24 rows)
pub const BOARD_HEIGHT: u8 = 24;

/// Rows above the visible playfield (spawn area and loss zone)
pub const BUFFER_ROWS: u8 = 4;

/// Rows checked for the loss condition after every settle
pub const LOSS_ROWS: u8 = BUFFER_ROWS;

/// Visible playfield height
pub const VISIBLE_ROWS: u8 = BOARD_HEIGHT - BUFFER_ROWS;

/// Gravity period at level 0
pub const TICK_BASE_MS: u64 = 1000;

/// Gravity period decrease per level
pub const TICK_STEP_MS: u64 = 50;

/// Gravity period floor
pub const TICK_FLOOR_MS: u64 = 100;

/// Default length of the hover and spin grace windows
pub const GRACE_MS: u64 = 500;

/// Delay between two columns of the line-clear animation
pub const CLEAR_STEP_MS: u64 = 50;

/// Total duration of one line-clear animation
pub const CLEAR_ANIMATION_MS: u64 = CLEAR_STEP_MS * BOARD_WIDTH as u64;

/// Lines needed for one level-up
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table, indexed by `lines - 1`
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];

/// Bonus (times level + 1) for leaving the board completely empty
pub const PERFECT_CLEAR_BASE: u32 = 1200;

/// Sound effect played on a line clear without level-up
pub const EFFECT_CLEAR: &str = "clear";

/// Sound effect played when a line clear raises the level
pub const EFFECT_LEVEL_UP: &str = "levelup";

/// Sound effect played on loss
pub const EFFECT_LOSE: &str = "lose";

/// Background music track
pub const MUSIC_TRACK: &str = "music";

/// The seven piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PieceKind {
    S,
    Z,
    J,
    L,
    O,
    I,
    T,
}

impl PieceKind {
    /// All kinds, in canonical order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::I,
        PieceKind::T,
    ];

    /// Parse from a piece letter (case-insensitive)
    ///
    /// ```
    /// use fallblock_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_letter('i'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_letter('O'), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_letter('x'), None);
    /// ```
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'I' => Some(PieceKind::I),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::I => 'I',
            PieceKind::T => 'T',
        }
    }
}

/// Direction of a shift or snap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(row, col)` step for one cell of movement.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Rotation direction
///
/// - **Cw**: +90°
/// - **Ccw**: -90°
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Cw,
    Ccw,
}

impl Spin {
    pub fn degrees(self) -> i16 {
        match self {
            Spin::Cw => 90,
            Spin::Ccw => -90,
        }
    }
}

/// Discrete input events delivered to the controller
///
/// Hosts map their own devices to these; no game logic lives in key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the active piece one cell
    Shift(Direction),
    /// Rotate the active piece 90°
    Rotate(Spin),
    /// Move the active piece as far as possible; downward snaps settle it
    Snap(Direction),
    /// Toggle pause
    Pause,
    /// Reset the session and start over
    NewGame,
    /// Flip the post-rotation gravity grace
    ToggleSpinGrace,
    /// Flip the resting-piece settle grace
    ToggleHoverGrace,
}

impl GameAction {
    /// Parse action from its camelCase name
    ///
    /// ```
    /// use fallblock_types::{Direction, GameAction, Spin};
    ///
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::Shift(Direction::Left)));
    /// assert_eq!(GameAction::from_str("rotateCcw"), Some(GameAction::Rotate(Spin::Ccw)));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "down" => Some(GameAction::Shift(Direction::Down)),
            "left" => Some(GameAction::Shift(Direction::Left)),
            "right" => Some(GameAction::Shift(Direction::Right)),
            "rotatecw" => Some(GameAction::Rotate(Spin::Cw)),
            "rotateccw" => Some(GameAction::Rotate(Spin::Ccw)),
            "snapdown" => Some(GameAction::Snap(Direction::Down)),
            "snapleft" => Some(GameAction::Snap(Direction::Left)),
            "snapright" => Some(GameAction::Snap(Direction::Right)),
            "pause" => Some(GameAction::Pause),
            "newgame" => Some(GameAction::NewGame),
            "togglespingrace" => Some(GameAction::ToggleSpinGrace),
            "togglehovergrace" => Some(GameAction::ToggleHoverGrace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Shift(Direction::Down) => "down",
            GameAction::Shift(Direction::Left) => "left",
            GameAction::Shift(Direction::Right) => "right",
            GameAction::Rotate(Spin::Cw) => "rotateCw",
            GameAction::Rotate(Spin::Ccw) => "rotateCcw",
            GameAction::Snap(Direction::Down) => "snapDown",
            GameAction::Snap(Direction::Left) => "snapLeft",
            GameAction::Snap(Direction::Right) => "snapRight",
            GameAction::Pause => "pause",
            GameAction::NewGame => "newGame",
            GameAction::ToggleSpinGrace => "toggleSpinGrace",
            GameAction::ToggleHoverGrace => "toggleHoverGrace",
        }
    }
}

/// Opaque identifier of something the renderer drew.
///
/// The core stores these and hands them back; it never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RenderHandle(pub u32);

impl RenderHandle {
    /// Placeholder for a cell the renderer returned no handle for.
    pub const UNBOUND: RenderHandle = RenderHandle(u32::MAX);
}

/// A single board cell, addressed as (row, col), that a renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub row: i8,
    pub col: i8,
}

/// A cell on the game board
///
/// Used internally by the board as a flat array of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Occupied by the falling piece
    Active,
    /// Occupied by a locked piece, remembering the handle it was drawn with
    Settled(RenderHandle),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Cell::Settled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_configuration() {
        assert_eq!(VISIBLE_ROWS, 20);
        assert_eq!(LOSS_ROWS, 4);
        assert_eq!(CLEAR_ANIMATION_MS, 500);
        assert_eq!(LINE_SCORES, [40, 100, 300, 1200]);
        assert!(TICK_FLOOR_MS < TICK_BASE_MS);
    }

    #[test]
    fn piece_letters_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_letter(kind.letter()), Some(kind));
        }
    }

    #[test]
    fn action_names_roundtrip() {
        let actions = [
            GameAction::Shift(Direction::Left),
            GameAction::Rotate(Spin::Cw),
            GameAction::Snap(Direction::Down),
            GameAction::Pause,
            GameAction::NewGame,
            GameAction::ToggleHoverGrace,
        ];
        for action in actions {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }

    #[test]
    fn direction_deltas() {
        assert_eq!(Direction::Down.delta(), (1, 0));
        assert_eq!(Direction::Left.delta(), (0, -1));
        assert_eq!(Direction::Right.delta(), (0, 1));
        assert_eq!(Spin::Ccw.degrees(), -90);
    }
}
