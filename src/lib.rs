//! Falling-block puzzle engine (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so hosts and integration
//! tests can write `fallblock::{core,input,term,types}`.

pub use fallblock_core as core;
pub use fallblock_input as input;
pub use fallblock_term as term;
pub use fallblock_types as types;
