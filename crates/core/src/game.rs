//! Game module - the controller / session state machine
//!
//! Ties the board, pieces, randomizer and scoring together and drives them
//! from discrete events: input actions and scheduled tasks. Lifecycle:
//! spawn → active → settle → clear → respawn, until a settle leaves cells in
//! the buffer rows (loss).
//!
//! All mutation happens synchronously inside [`Game::apply_action`] and
//! [`Game::dispatch`]; anything that has to happen later is a task handed to
//! the [`Scheduler`]. The controller owns every outstanding task handle and
//! ignores tasks it no longer owns, so a cancelled or superseded timer can never
//! touch a reset session.

use tracing::{debug, error, info, trace};

use crate::board::{Board, Rows};
use crate::clock::Clock;
use crate::collab::{Audio, Renderer, Scheduler, Task, TaskHandle};
use crate::config::GameConfig;
use crate::piece::{within_grace, Piece, WALL_KICKS};
use crate::rng::Randomizer;
use crate::scoring::{line_clear_score, perfect_clear_bonus, tickrate_for_level, LevelProgress};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::timer::TimerQueue;
use crate::types::*;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, no game started yet
    Ready,
    Playing,
    /// Terminal until the next new game
    Lost,
}

/// Result of a single-cell move attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOutcome {
    Moved,
    /// Sideways move into a wall or settled cell
    Blocked,
    /// Downward move blocked, but the hover grace kept the piece active
    Hovering,
    /// Downward move blocked and the piece was settled
    Settled,
    /// No active piece, paused, or not playing
    Inactive,
}

/// What happened when a piece settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettleEvent {
    pub rows_cleared: u32,
    pub score_awarded: u32,
    pub perfect_clear: bool,
    pub leveled_up: bool,
    pub lost: bool,
}

/// In-flight line-clear visuals.
#[derive(Debug, Clone, Default)]
struct ClearAnimation {
    /// Handles to delete, one list per board column
    columns: Vec<Vec<RenderHandle>>,
    /// Handles above the cleared rows and how far they fall
    drops: Vec<(RenderHandle, i8)>,
}

#[derive(Debug, Clone, Default)]
struct Timers {
    tick: Option<TaskHandle>,
    spawn: Option<TaskHandle>,
    clear: Vec<TaskHandle>,
}

/// The controller: owns the session and its collaborators.
pub struct Game<R: Renderer, S: Scheduler> {
    config: GameConfig,
    board: Board,
    active: Option<Piece>,
    preview: Piece,
    randomizer: Randomizer,
    score: u32,
    high_score: u32,
    lines: u32,
    progress: LevelProgress,
    high_level: u32,
    tickrate_ms: u64,
    paused: bool,
    phase: Phase,
    timers: Timers,
    clear_anim: Option<ClearAnimation>,
    last_event: Option<SettleEvent>,
    renderer: R,
    scheduler: S,
    audio: Box<dyn Audio>,
    clock: Box<dyn Clock>,
}

impl<R: Renderer, S: Scheduler> Game<R, S> {
    /// Create an idle session; call [`Game::new_game`] to start playing.
    pub fn new(
        config: GameConfig,
        seed: u32,
        renderer: R,
        scheduler: S,
        audio: Box<dyn Audio>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut randomizer = Randomizer::new(config.randomizer, seed);
        let preview = Piece::new(randomizer.draw());
        Self {
            config,
            board: Board::new(),
            active: None,
            preview,
            randomizer,
            score: 0,
            high_score: 0,
            lines: 0,
            progress: LevelProgress::default(),
            high_level: 0,
            tickrate_ms: tickrate_for_level(0),
            paused: false,
            phase: Phase::Ready,
            timers: Timers::default(),
            clear_anim: None,
            last_event: None,
            renderer,
            scheduler,
            audio,
            clock,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn preview(&self) -> PieceKind {
        self.preview.kind
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn high_level(&self) -> u32 {
        self.high_level
    }

    /// Lines cleared since the last level-up
    pub fn level_up_counter(&self) -> u32 {
        self.progress.counter
    }

    pub fn tickrate_ms(&self) -> u64 {
        self.tickrate_ms
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_lost(&self) -> bool {
        self.phase == Phase::Lost
    }

    pub fn piece_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Take and clear the last settle event.
    pub fn take_last_event(&mut self) -> Option<SettleEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = self.active.as_ref().map(ActiveSnapshot::from);
        out.preview = Some(self.preview.kind);
        out.score = self.score;
        out.high_score = self.high_score;
        out.lines = self.lines;
        out.level = self.progress.level;
        out.high_level = self.high_level;
        out.level_up_counter = self.progress.counter;
        out.tickrate_ms = self.tickrate_ms;
        out.paused = self.paused;
        out.lost = self.is_lost();
        out.piece_active = self.active.is_some();
        out.spin_grace = self.config.spin_grace;
        out.hover_grace = self.config.hover_grace;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Gameplay accepts moves and ticks.
    fn live(&self) -> bool {
        self.phase == Phase::Playing && !self.paused
    }

    fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    fn dump_board(&self, op: &str) {
        if self.config.debug {
            debug!(target: "fallblock::board", op, "\n{}", self.board);
        }
    }

    /// Apply an input event
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::NewGame => {
                self.new_game();
                true
            }
            GameAction::Pause => self.toggle_pause(),
            GameAction::ToggleSpinGrace => {
                self.config.spin_grace = !self.config.spin_grace;
                debug!(spin_grace = self.config.spin_grace, "toggled spin grace");
                true
            }
            GameAction::ToggleHoverGrace => {
                self.config.hover_grace = !self.config.hover_grace;
                debug!(hover_grace = self.config.hover_grace, "toggled hover grace");
                true
            }
            GameAction::Shift(direction) => {
                !matches!(self.shift(direction), ShiftOutcome::Inactive)
            }
            GameAction::Rotate(spin) => self.rotate(spin),
            GameAction::Snap(direction) => self.snap(direction),
        }
    }

    /// Reset the session and start playing. High score and high level survive.
    pub fn new_game(&mut self) {
        self.cancel_timers();
        self.finish_clear_animation();
        self.discard_active();
        let settled: Vec<_> = self.board.settled().map(|(_, _, h)| h).collect();
        for handle in settled {
            self.renderer.delete_handle(handle);
        }

        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.progress = LevelProgress::default();
        self.tickrate_ms = tickrate_for_level(0);
        self.paused = false;
        self.phase = Phase::Playing;
        self.last_event = None;
        info!(
            high_score = self.high_score,
            high_level = self.high_level,
            "new game"
        );

        self.audio.play_loop(MUSIC_TRACK);
        self.spawn_next();
        if self.phase == Phase::Playing {
            self.schedule_tick();
        }
    }

    /// Pause or resume. Only meaningful while a game is running.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.paused = !self.paused;
        if self.paused {
            if let Some(handle) = self.timers.tick.take() {
                self.scheduler.cancel(handle);
            }
            if let Some(handle) = self.timers.spawn.take() {
                self.scheduler.cancel(handle);
            }
            self.audio.stop(MUSIC_TRACK);
        } else {
            self.schedule_tick();
            if self.active.is_none() {
                self.schedule_spawn(self.spawn_delay());
            }
            self.audio.play_loop(MUSIC_TRACK);
        }
        debug!(paused = self.paused, "pause toggled");
        true
    }

    /// Move the active piece one cell.
    ///
    /// A blocked downward move settles the piece unless the hover grace is
    /// on and the piece descended less than the grace window ago. Failed
    /// attempts never renew that window.
    pub fn shift(&mut self, direction: Direction) -> ShiftOutcome {
        if !self.live() {
            return ShiftOutcome::Inactive;
        }
        let now = self.now();
        let Some(piece) = self.active.as_ref() else {
            return ShiftOutcome::Inactive;
        };

        let (dr, dc) = direction.delta();
        if self.board.can_place(&piece.shape, piece.row + dr, piece.col + dc) {
            self.move_active(dr, dc, now);
            return ShiftOutcome::Moved;
        }

        if direction != Direction::Down {
            return ShiftOutcome::Blocked;
        }

        if self.config.hover_grace
            && within_grace(now, piece.last_descended_at, self.config.grace_ms)
        {
            return ShiftOutcome::Hovering;
        }

        self.settle_active();
        ShiftOutcome::Settled
    }

    /// Rotate the active piece 90°, trying the wall kicks in order when the
    /// default placement collides. Returns false when nothing moved.
    pub fn rotate(&mut self, spin: Spin) -> bool {
        if !self.live() {
            return false;
        }
        let now = self.now();
        let Some(piece) = self.active.as_ref() else {
            return false;
        };
        let Some(target) = piece.rotation_target(spin) else {
            return false;
        };

        let board = &self.board;
        let Some(target) = std::iter::once((0, 0))
            .chain(WALL_KICKS)
            .map(|kick| target.kicked(kick))
            .find(|t| board.can_place(&t.shape, t.row, t.col))
        else {
            trace!(?spin, "rotation blocked");
            return false;
        };

        if let Err(err) = self.board.place(&target.shape, target.row, target.col) {
            error!(%err, "rotation placement rejected");
            return false;
        }

        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        for handle in piece.handles.drain(..) {
            self.renderer.delete_handle(handle);
        }
        if target.row != piece.row {
            piece.last_descended_at = now;
        }
        piece.shape = target.shape;
        piece.row = target.row;
        piece.col = target.col;
        piece.rotation = target.rotation;
        piece.last_rotated_at = Some(now);

        let rects = cell_rects(piece);
        piece.handles = self.renderer.draw_piece(piece.kind, &rects);
        let (left, right) = piece.column_span();
        self.renderer.set_guide_positions(left, right);

        self.dump_board("rotate");
        true
    }

    /// Move as far as possible in one direction in a single step. Snapping
    /// down settles the piece regardless of any grace window.
    pub fn snap(&mut self, direction: Direction) -> bool {
        if !self.live() {
            return false;
        }
        let now = self.now();
        let Some(piece) = self.active.as_ref() else {
            return false;
        };

        let (dr, dc) = direction.delta();
        let mut steps: i8 = 0;
        while self.board.can_place(
            &piece.shape,
            piece.row + dr * (steps + 1),
            piece.col + dc * (steps + 1),
        ) {
            steps += 1;
        }

        if steps > 0 {
            self.move_active(dr * steps, dc * steps, now);
        }
        if direction == Direction::Down {
            self.settle_active();
        }
        true
    }

    /// Run a task the scheduler fired. Tasks whose handle the controller no
    /// longer owns are stale and ignored; returns whether it ran.
    pub fn dispatch(&mut self, handle: TaskHandle, task: Task) -> bool {
        match task {
            Task::Tick if self.timers.tick == Some(handle) => {
                self.timers.tick = None;
                self.on_tick();
                true
            }
            Task::Spawn if self.timers.spawn == Some(handle) => {
                self.timers.spawn = None;
                if self.live() && self.active.is_none() {
                    self.spawn_next();
                }
                true
            }
            Task::ClearStep(column) => {
                let Some(pos) = self.timers.clear.iter().position(|h| *h == handle) else {
                    trace!(?handle, "stale clear step");
                    return false;
                };
                self.timers.clear.remove(pos);
                self.clear_step(column as usize);
                true
            }
            _ => {
                trace!(?handle, ?task, "stale task");
                false
            }
        }
    }

    fn on_tick(&mut self) {
        if !self.live() {
            return;
        }
        if let Some(piece) = self.active.as_ref() {
            let spinning = self.config.spin_grace
                && piece
                    .last_rotated_at
                    .is_some_and(|at| within_grace(self.now(), at, self.config.grace_ms));
            if !spinning {
                self.shift(Direction::Down);
            }
        }
        if self.live() {
            self.schedule_tick();
        }
    }

    fn schedule_tick(&mut self) {
        if let Some(old) = self.timers.tick.take() {
            self.scheduler.cancel(old);
        }
        self.timers.tick = Some(self.scheduler.schedule(self.tickrate_ms, Task::Tick));
    }

    fn schedule_spawn(&mut self, delay_ms: u64) {
        if let Some(old) = self.timers.spawn.take() {
            self.scheduler.cancel(old);
        }
        self.timers.spawn = Some(self.scheduler.schedule(delay_ms, Task::Spawn));
    }

    fn cancel_timers(&mut self) {
        let timers = std::mem::take(&mut self.timers);
        for handle in timers
            .tick
            .into_iter()
            .chain(timers.spawn)
            .chain(timers.clear)
        {
            self.scheduler.cancel(handle);
        }
    }

    /// Promote the preview piece and draw a new preview.
    fn spawn_next(&mut self) -> bool {
        let next = Piece::new(self.randomizer.draw());
        let piece = std::mem::replace(&mut self.preview, next);
        self.activate(piece)
    }

    /// Put a piece on the board as the active piece; a blocked spawn loses.
    fn activate(&mut self, mut piece: Piece) -> bool {
        if let Err(err) = self.board.place(&piece.shape, piece.row, piece.col) {
            info!(kind = ?piece.kind, %err, "spawn blocked");
            self.lose();
            return false;
        }

        piece.last_descended_at = self.now();
        piece.last_rotated_at = None;
        let rects = cell_rects(&piece);
        piece.handles = self.renderer.draw_piece(piece.kind, &rects);
        let (left, right) = piece.column_span();
        self.renderer.set_guide_positions(left, right);

        debug!(kind = ?piece.kind, row = piece.row, col = piece.col, "spawned");
        self.active = Some(piece);
        self.dump_board("spawn");
        true
    }

    /// Remove the active piece from board and renderer without settling it.
    fn discard_active(&mut self) {
        if let Some(piece) = self.active.take() {
            for handle in piece.handles {
                self.renderer.delete_handle(handle);
            }
        }
        self.board.clear_active();
    }

    /// Commit a move already checked with `can_place`.
    fn move_active(&mut self, dr: i8, dc: i8, now: u64) {
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        let (row, col) = (piece.row + dr, piece.col + dc);
        if let Err(err) = self.board.place(&piece.shape, row, col) {
            error!(%err, "move placement rejected");
            return;
        }
        piece.row = row;
        piece.col = col;
        if dr != 0 {
            piece.last_descended_at = now;
        }
        self.renderer.move_handles(&piece.handles, dr, dc);
        let (left, right) = piece.column_span();
        self.renderer.set_guide_positions(left, right);
        self.dump_board("move");
    }

    /// Lock the active piece, clear lines, score, then lose or respawn.
    fn settle_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board.settle(&piece);
        debug!(kind = ?piece.kind, row = piece.row, col = piece.col, "settled");

        // Loss is judged on the board as the piece landed.
        let lost = self.board.top_rows_occupied(LOSS_ROWS);
        let full = self.board.full_rows();
        let mut event = SettleEvent {
            rows_cleared: full.len() as u32,
            lost,
            ..SettleEvent::default()
        };

        if !full.is_empty() {
            let count = full.len() as u32;
            self.lines += count;
            if self.progress.add_lines(count) > 0 {
                event.leveled_up = true;
                self.tickrate_ms = tickrate_for_level(self.progress.level);
                self.high_level = self.high_level.max(self.progress.level);
                info!(level = self.progress.level, tickrate_ms = self.tickrate_ms, "level up");
                self.audio.play(EFFECT_LEVEL_UP);
            } else {
                self.audio.play(EFFECT_CLEAR);
            }

            self.start_clear_animation(&full);
            self.board.clear_rows(&full);

            let level = self.progress.level;
            let mut award = line_clear_score(full.len(), level);
            if self.board.is_empty() {
                event.perfect_clear = true;
                award = award.saturating_add(perfect_clear_bonus(level));
            }
            self.score = self.score.saturating_add(award);
            self.high_score = self.high_score.max(self.score);
            event.score_awarded = award;
            debug!(rows = ?full.as_slice(), award, score = self.score, "lines cleared");
        }
        self.dump_board("settle");
        self.last_event = Some(event);

        if lost {
            self.lose();
            return;
        }

        self.schedule_spawn(self.spawn_delay());
    }

    /// One tickrate, stretched so the spawn lands after the last pending
    /// clear step.
    fn spawn_delay(&self) -> u64 {
        let animation_left = self.timers.clear.len() as u64 * CLEAR_STEP_MS;
        self.tickrate_ms.max(animation_left)
    }

    /// Terminal transition: stop scheduling, play the loss effect and wipe the
    /// board through the clear animation.
    fn lose(&mut self) {
        self.phase = Phase::Lost;
        if let Some(handle) = self.timers.tick.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.timers.spawn.take() {
            self.scheduler.cancel(handle);
        }
        self.discard_active();

        info!(score = self.score, level = self.progress.level, "game lost");
        self.audio.stop(MUSIC_TRACK);
        self.audio.play(EFFECT_LOSE);

        let every_row: Rows = (0..BOARD_HEIGHT as usize).collect();
        self.start_clear_animation(&every_row);
        self.board.clear();
        self.dump_board("lose");
    }

    /// Schedule the column-by-column removal of the settled cells in `rows`.
    /// Must run before the board rows are compacted.
    fn start_clear_animation(&mut self, rows: &[usize]) {
        self.finish_clear_animation();

        let mut anim = ClearAnimation {
            columns: vec![Vec::new(); BOARD_WIDTH as usize],
            drops: Vec::new(),
        };
        for (row, col, handle) in self.board.settled() {
            if handle == RenderHandle::UNBOUND {
                continue;
            }
            let row = row as usize;
            if rows.contains(&row) {
                anim.columns[col as usize].push(handle);
            } else {
                let below = rows.iter().filter(|r| **r > row).count() as i8;
                if below > 0 {
                    anim.drops.push((handle, below));
                }
            }
        }

        for column in 0..BOARD_WIDTH {
            let delay = CLEAR_STEP_MS * (column as u64 + 1);
            let handle = self.scheduler.schedule(delay, Task::ClearStep(column));
            self.timers.clear.push(handle);
        }
        self.clear_anim = Some(anim);
    }

    fn clear_step(&mut self, column: usize) {
        let Some(anim) = self.clear_anim.as_mut() else {
            return;
        };
        if let Some(handles) = anim.columns.get_mut(column) {
            for handle in handles.drain(..) {
                self.renderer.delete_handle(handle);
            }
        }
        if self.timers.clear.is_empty() {
            self.finish_clear_animation();
        }
    }

    /// Complete any in-flight clear animation immediately.
    fn finish_clear_animation(&mut self) {
        for handle in self.timers.clear.drain(..) {
            self.scheduler.cancel(handle);
        }
        let Some(anim) = self.clear_anim.take() else {
            return;
        };
        for handle in anim.columns.into_iter().flatten() {
            self.renderer.delete_handle(handle);
        }
        for (handle, rows) in anim.drops {
            self.renderer.move_handles(&[handle], rows, 0);
        }
    }
}

impl<R: Renderer> Game<R, TimerQueue> {
    /// Run every task due at or before `now_ms`, in due order.
    pub fn pump(&mut self, now_ms: u64) -> usize {
        let mut ran = 0;
        while let Some((handle, task)) = self.scheduler.pop_due(now_ms) {
            if self.dispatch(handle, task) {
                ran += 1;
            }
        }
        ran
    }
}

fn cell_rects(piece: &Piece) -> Vec<CellRect> {
    piece.cells().map(|(row, col)| CellRect { row, col }).collect()
}
