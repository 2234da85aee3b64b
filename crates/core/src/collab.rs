//! Collaborator interfaces - everything the engine asks of its host.
//!
//! The controller draws, plays sounds and schedules callbacks only through
//! these traits. Hosts provide the implementations; headless ones live here
//! for tests and for running without a display or sound card.

use std::collections::BTreeMap;

use crate::types::{CellRect, PieceKind, RenderHandle};

/// Draws pieces and keeps their visuals addressable by opaque handles.
pub trait Renderer {
    /// Draw one block per cell; returns one handle per cell, in order.
    fn draw_piece(&mut self, kind: PieceKind, cells: &[CellRect]) -> Vec<RenderHandle>;
    /// Move drawn blocks by whole cells.
    fn move_handles(&mut self, handles: &[RenderHandle], d_row: i8, d_col: i8);
    fn delete_handle(&mut self, handle: RenderHandle);
    /// Column guides framing the active piece, `[left, right)`.
    fn set_guide_positions(&mut self, left_col: i8, right_col: i8);
}

/// Sound output. Every call is best effort; a missing backend is silence.
pub trait Audio {
    fn play(&mut self, effect: &str);
    fn play_loop(&mut self, track: &str);
    fn stop(&mut self, track: &str);
    fn fade_out(&mut self, track: &str, ms: u64);
}

/// Identity of one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub u64);

/// What a scheduled callback should do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Gravity tick
    Tick,
    /// Bring the preview piece onto the board
    Spawn,
    /// One column of the line-clear animation
    ClearStep(u8),
}

/// Delayed callbacks. The host hands fired tasks back to
/// [`Game::dispatch`](crate::game::Game::dispatch) with their handle.
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u64, task: Task) -> TaskHandle;
    /// Cancelling an unknown or already fired handle is a no-op.
    fn cancel(&mut self, handle: TaskHandle);
}

/// Silent audio backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play(&mut self, _effect: &str) {}
    fn play_loop(&mut self, _track: &str) {}
    fn stop(&mut self, _track: &str) {}
    fn fade_out(&mut self, _track: &str, _ms: u64) {}
}

/// A block the headless renderer is keeping track of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub kind: PieceKind,
    pub row: i8,
    pub col: i8,
}

/// Renderer that only bookkeeps sprites; nothing is displayed.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    next_id: u32,
    sprites: BTreeMap<RenderHandle, Sprite>,
    guides: Option<(i8, i8)>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprite(&self, handle: RenderHandle) -> Option<Sprite> {
        self.sprites.get(&handle).copied()
    }

    pub fn sprites(&self) -> impl Iterator<Item = (RenderHandle, Sprite)> + '_ {
        self.sprites.iter().map(|(h, s)| (*h, *s))
    }

    pub fn live_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn guides(&self) -> Option<(i8, i8)> {
        self.guides
    }
}

impl Renderer for HeadlessRenderer {
    fn draw_piece(&mut self, kind: PieceKind, cells: &[CellRect]) -> Vec<RenderHandle> {
        cells
            .iter()
            .map(|cell| {
                let handle = RenderHandle(self.next_id);
                self.next_id += 1;
                self.sprites.insert(
                    handle,
                    Sprite {
                        kind,
                        row: cell.row,
                        col: cell.col,
                    },
                );
                handle
            })
            .collect()
    }

    fn move_handles(&mut self, handles: &[RenderHandle], d_row: i8, d_col: i8) {
        for handle in handles {
            if let Some(sprite) = self.sprites.get_mut(handle) {
                sprite.row += d_row;
                sprite.col += d_col;
            }
        }
    }

    fn delete_handle(&mut self, handle: RenderHandle) {
        self.sprites.remove(&handle);
    }

    fn set_guide_positions(&mut self, left_col: i8, right_col: i8) {
        self.guides = Some((left_col, right_col));
    }
}
