//! Audio subsystem: tone synthesis and scheduled playback.
//!
//! The rest of the crate talks to audio through a single primitive: "play a
//! tone of this frequency/duration/timbre/volume at this audio-clock
//! timestamp". Everything else (device handling, buffers, delays) stays in
//! this module.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   TonePlayer    │ ← trait used by the engine
//! └───────┬─────────┘
//!         │
//!         ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ RodioTonePlayer │────▶│ default device   │
//! ├─────────────────┤     └──────────────────┘
//! │ NullTonePlayer  │  (no device: silent, clock still runs)
//! └─────────────────┘
//! ```

mod clock;
mod error;
mod output;
mod tone;

pub use clock::AudioClock;
pub use error::AudioError;
pub use output::{create_player, NullTonePlayer, RodioTonePlayer};
pub use tone::{render, Timbre, ToneSpec, SYNTH_SAMPLE_RATE};

/// Scheduled, fire-and-forget tone playback.
///
/// `now()` exposes the audio clock that timestamps must be expressed in.
/// Implementations never block and never report playback failures to the
/// caller; audio errors degrade to silence.
pub trait TonePlayer: Send + Sync {
    /// Current audio-clock time in seconds.
    fn now(&self) -> f64;

    /// Plays one tone, immediately or at a future audio-clock timestamp.
    ///
    /// Timestamps in the past are treated as "now".
    fn play_at(&self, spec: ToneSpec, when: Option<f64>);
}

// ============================================================================
// MockTonePlayer
// ============================================================================

/// Test double that records every scheduled tone.
#[derive(Debug, Default)]
pub struct MockTonePlayer {
    calls: std::sync::Mutex<Vec<(ToneSpec, Option<f64>)>>,
    now: std::sync::Mutex<f64>,
}

impl MockTonePlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the mock audio clock forward.
    pub fn advance(&self, seconds: f64) {
        *self.now.lock().unwrap() += seconds;
    }

    /// Pins the mock audio clock to an absolute value.
    pub fn set_now(&self, seconds: f64) {
        *self.now.lock().unwrap() = seconds;
    }

    /// Number of tones played so far.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded `(spec, timestamp)` pairs, in submission order.
    #[must_use]
    pub fn recorded(&self) -> Vec<(ToneSpec, Option<f64>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the recorded calls.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl TonePlayer for MockTonePlayer {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap()
    }

    fn play_at(&self, spec: ToneSpec, when: Option<f64>) {
        self.calls.lock().unwrap().push((spec, when));
    }
}
