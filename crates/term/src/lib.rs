//! Terminal front-end for the engine.
//!
//! A small, game-oriented rendering layer: the engine draws blocks onto a
//! [`Canvas`], the [`GameView`] paints canvas and session state into a
//! [`FrameBuffer`], and the [`Screen`] flushes changed glyphs to the terminal.
//!
//! Cells are drawn 2 characters wide to compensate for the glyph aspect ratio.

pub mod audio;
pub mod canvas;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use fallblock_core as core;
pub use fallblock_types as types;

pub use audio::LogAudio;
pub use canvas::{Block, Canvas};
pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, Screen};
