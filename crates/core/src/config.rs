//! Session configuration.

use crate::rng::RandomizerPolicy;
use crate::types::GRACE_MS;

/// Runtime switches of a game session
///
/// Board size, tick schedule and scoring are fixed constants; only these
/// behaviors are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Dump the board through `tracing` after every mutating operation
    pub debug: bool,
    pub randomizer: RandomizerPolicy,
    /// Suspend gravity for a while after a successful rotation
    pub spin_grace: bool,
    /// Let a resting piece linger before it is forced to settle
    pub hover_grace: bool,
    /// Length of both grace windows
    pub grace_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            debug: false,
            randomizer: RandomizerPolicy::Bag,
            spin_grace: false,
            hover_grace: true,
            grace_ms: GRACE_MS,
        }
    }
}
