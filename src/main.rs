//! Terminal falling-block runner (default binary).
//!
//! Uses crossterm for input and the framebuffer-based view for output. The
//! engine's scheduled tasks live in a [`TimerQueue`] that the loop pumps with
//! wall-clock time; the loop sleeps in `event::poll` until the next task is
//! due or a key arrives.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fallblock::core::{Clock, Game, GameConfig, RandomizerPolicy, SystemClock, TimerQueue};
use fallblock::input::{handle_key_event, should_quit};
use fallblock::term::{Canvas, FrameBuffer, GameView, LogAudio, Screen, Viewport};
use fallblock::types::GRACE_MS;

/// Longest the loop waits without redrawing.
const IDLE_FRAME_MS: u64 = 250;

#[derive(Debug, Parser)]
#[command(name = "fallblock", version, about = "Falling-block puzzle in the terminal")]
struct Args {
    /// Dump the board to the log after every change
    #[arg(long)]
    debug: bool,

    /// Draw every piece independently instead of from a shuffled 7-bag
    #[arg(long)]
    random_uniform_draw: bool,

    /// Hold gravity for a moment after each rotation
    #[arg(long)]
    enable_spin_grace: bool,

    /// Settle a resting piece on the first blocked drop
    #[arg(long)]
    disable_hover_grace: bool,

    /// Randomizer seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u32>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> GameConfig {
        GameConfig {
            debug: self.debug,
            randomizer: if self.random_uniform_draw {
                RandomizerPolicy::Uniform
            } else {
                RandomizerPolicy::Bag
            },
            spin_grace: self.enable_spin_grace,
            hover_grace: !self.disable_hover_grace,
            grace_ms: GRACE_MS,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&args, &mut screen);

    // Always try to restore terminal state.
    let _ = screen.leave();
    result
}

fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn default_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(args: &Args, screen: &mut Screen) -> Result<()> {
    let seed = args.seed.unwrap_or_else(default_seed);
    let clock = SystemClock::new();
    let mut game = Game::new(
        args.config(),
        seed,
        Canvas::new(),
        TimerQueue::new(),
        Box::new(LogAudio),
        Box::new(clock.clone()),
    );
    info!(seed, config = ?game.config(), "starting");
    game.new_game();

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        let now = clock.now_ms();
        game.pump(now);

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&game.snapshot(), game.renderer(), Viewport::new(w, h), &mut fb);
        screen.present(&mut fb)?;

        // Input until the next scheduled task.
        let wait = game
            .scheduler()
            .next_due()
            .map_or(IDLE_FRAME_MS, |due| due.saturating_sub(clock.now_ms()))
            .min(IDLE_FRAME_MS);

        if !event::poll(Duration::from_millis(wait))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if should_quit(key) {
                    break;
                }
                // Catch timers up before acting so the input lands in order.
                game.pump(clock.now_ms());
                if let Some(action) = handle_key_event(key) {
                    debug!(action = action.as_str(), "input");
                    game.apply_action(action);
                }
            }
            Event::Resize(..) => screen.invalidate(),
            _ => {}
        }
    }

    if args.debug {
        let snapshot = serde_json::to_string(&game.snapshot())?;
        info!(%snapshot, "session ended");
    }
    Ok(())
}
