//! Scoring module - line-clear points, perfect-clear bonus and tick schedule
//!
//! Classic Nintendo scoring: a lookup by simultaneous lines cleared, scaled by
//! (level + 1). Leaving the board empty after a clear adds a flat bonus, also
//! scaled by (level + 1).

use crate::types::{
    LINES_PER_LEVEL, LINE_SCORES, PERFECT_CLEAR_BASE, TICK_BASE_MS, TICK_FLOOR_MS, TICK_STEP_MS,
};

/// Points for clearing `lines` (1-4) rows at once; 0 otherwise.
pub fn line_clear_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines - 1].saturating_mul(level + 1)
}

/// Bonus for a clear that empties the board.
pub fn perfect_clear_bonus(level: u32) -> u32 {
    PERFECT_CLEAR_BASE.saturating_mul(level + 1)
}

/// Gravity period for a level: linear decrease down to the floor.
pub fn tickrate_for_level(level: u32) -> u64 {
    TICK_BASE_MS
        .saturating_sub(TICK_STEP_MS.saturating_mul(level as u64))
        .max(TICK_FLOOR_MS)
}

/// Level progress accumulator
///
/// Lines feed a counter; every time it reaches [`LINES_PER_LEVEL`] the level
/// goes up by one and the counter drops by the threshold, so no level is ever
/// skipped however many lines arrive at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelProgress {
    pub level: u32,
    pub counter: u32,
}

impl LevelProgress {
    /// Add cleared lines; returns how many levels were gained.
    pub fn add_lines(&mut self, lines: u32) -> u32 {
        self.counter += lines;
        let mut gained = 0;
        while self.counter >= LINES_PER_LEVEL {
            self.counter -= LINES_PER_LEVEL;
            self.level += 1;
            gained += 1;
        }
        gained
    }
}
