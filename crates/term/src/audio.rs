//! Audio backend for the terminal host: there is no sound device, so effect
//! and track names go to the log instead.

use tracing::debug;

use crate::core::Audio;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl Audio for LogAudio {
    fn play(&mut self, effect: &str) {
        debug!(target: "fallblock::audio", effect, "play");
    }

    fn play_loop(&mut self, track: &str) {
        debug!(target: "fallblock::audio", track, "loop");
    }

    fn stop(&mut self, track: &str) {
        debug!(target: "fallblock::audio", track, "stop");
    }

    fn fade_out(&mut self, track: &str, ms: u64) {
        debug!(target: "fallblock::audio", track, ms, "fade out");
    }
}
