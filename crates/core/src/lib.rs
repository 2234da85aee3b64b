//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the game rules, the session controller, and the
//! collaborator seams the controller drives. It performs no I/O itself:
//! drawing, sound and timing go through the [`Renderer`], [`Audio`],
//! [`Scheduler`] and [`Clock`] traits, so the same engine runs in a terminal,
//! headless in tests, or behind any other front-end.
//!
//! # Module Structure
//!
//! - [`board`]: 10x24 grid with collision queries, settling and row compaction
//! - [`shape`]: piece matrices and the 90° rotation transform
//! - [`piece`]: piece anchors, rotation centering cycles and the kick list
//! - [`rng`]: 7-bag and uniform piece randomizers
//! - [`scoring`]: line-clear points, perfect-clear bonus, level and tick schedule
//! - [`game`]: the controller state machine
//! - [`collab`]: renderer / audio / scheduler interfaces and headless backends
//! - [`timer`]: a deterministic in-memory scheduler
//! - [`clock`]: wall and hand-driven clocks for grace windows
//!
//! # Game Rules
//!
//! - **Board**: 10 columns by 24 rows; the top 4 rows are the spawn buffer
//! - **Loss**: any settled cell inside the buffer ends the game
//! - **Rotation**: center-preserving with a corrective cycle, then 8 kicks
//! - **Scoring**: 40/100/300/1200 times (level + 1), 1200 times (level + 1)
//!   for clearing the whole board
//! - **Levels**: one per 10 lines; gravity speeds up by 50ms per level, never
//!   below 100ms
//!
//! # Example
//!
//! ```
//! use fallblock_core::{
//!     Game, GameConfig, HeadlessRenderer, ManualClock, NullAudio, TimerQueue,
//! };
//! use fallblock_core::types::{Direction, GameAction};
//!
//! let clock = ManualClock::new(0);
//! let mut game = Game::new(
//!     GameConfig::default(),
//!     12345,
//!     HeadlessRenderer::new(),
//!     TimerQueue::new(),
//!     Box::new(NullAudio),
//!     Box::new(clock.clone()),
//! );
//! game.new_game();
//! assert!(game.piece_active());
//!
//! game.apply_action(GameAction::Snap(Direction::Down));
//! assert!(!game.piece_active());
//!
//! // The next piece arrives one tick later.
//! clock.set(1_000);
//! game.pump(1_000);
//! assert!(game.piece_active());
//! ```

pub mod board;
pub mod clock;
pub mod collab;
pub mod config;
pub mod game;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shape;
pub mod snapshot;
pub mod timer;

pub use fallblock_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, PlaceError, Rows};
pub use clock::{Clock, ManualClock, SystemClock};
pub use collab::{Audio, HeadlessRenderer, NullAudio, Renderer, Scheduler, Sprite, Task, TaskHandle};
pub use config::GameConfig;
pub use game::{Game, Phase, SettleEvent, ShiftOutcome};
pub use piece::{spawn_position, within_grace, Piece, RotationTarget, WALL_KICKS};
pub use rng::{Randomizer, RandomizerPolicy, SimpleRng};
pub use scoring::{line_clear_score, perfect_clear_bonus, tickrate_for_level, LevelProgress};
pub use shape::{rotate, Shape};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use timer::TimerQueue;
