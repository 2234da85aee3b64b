//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework beyond `crossterm` key
//! events. It maps them into [`crate::types::GameAction`]; all game logic
//! stays in the core.

pub mod map;

pub use fallblock_types as types;

pub use map::{handle_key_event, should_quit};
