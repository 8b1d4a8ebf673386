//! Lookahead beat scheduler.
//!
//! The scheduler is polled far more often than beats occur and, on each
//! pass, emits every beat whose timestamp falls inside a short horizon.
//! Timestamps come from the audio clock, never from the poll's own firing
//! time, so poll jitter cannot drift the beat grid. The cursor is the only
//! state: where the next beat lands and where in the bar it falls.

use std::time::Duration;

use crate::types::MetronomeConfig;

/// Poll cadence in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 25;

/// Scheduling horizon in milliseconds.
pub const LOOKAHEAD_MS: u64 = 120;

// A beat can only be missed if a whole horizon fits between two polls.
const _: () = assert!(POLL_INTERVAL_MS < LOOKAHEAD_MS);

/// Poll cadence as a `Duration`.
pub const POLL_INTERVAL: Duration = Duration::from_millis(POLL_INTERVAL_MS);

/// Scheduling horizon in seconds.
pub const LOOKAHEAD_SECONDS: f64 = LOOKAHEAD_MS as f64 / 1000.0;

/// Gap between "now" and the first beat of a freshly started cursor.
pub const START_MARGIN_SECONDS: f64 = 0.05;

// ============================================================================
// BeatEvent
// ============================================================================

/// One beat due for playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    /// Audio-clock timestamp the click must sound at.
    pub timestamp: f64,
    /// Position within the bar, starting at 0.
    pub beat_in_bar: u32,
    /// True on the first beat of each bar.
    pub accent: bool,
}

// ============================================================================
// BeatScheduler
// ============================================================================

/// Cursor into the beat grid.
#[derive(Debug, Clone, Copy)]
struct ScheduleCursor {
    next_beat: f64,
    beat_in_bar: u32,
}

/// Converts poll firings into sample-accurate beat timestamps.
///
/// The cursor exists only while the metronome should sound; it is created
/// by [`BeatScheduler::begin`] and dropped by [`BeatScheduler::halt`],
/// never surviving a pause or configuration restart.
#[derive(Debug, Default)]
pub struct BeatScheduler {
    cursor: Option<ScheduleCursor>,
}

impl BeatScheduler {
    /// Creates a stopped scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a cursor is active.
    pub fn is_running(&self) -> bool {
        self.cursor.is_some()
    }

    /// Starts a fresh cursor.
    ///
    /// The first beat lands at `now + START_MARGIN_SECONDS`, or at the
    /// reserved chime-handshake timestamp when one is given and later than
    /// that. The bar restarts at its downbeat.
    pub fn begin(&mut self, now: f64, reserved: Option<f64>) {
        let earliest = now + START_MARGIN_SECONDS;
        let next_beat = reserved.map_or(earliest, |r| r.max(earliest));
        self.cursor = Some(ScheduleCursor {
            next_beat,
            beat_in_bar: 0,
        });
    }

    /// Drops the cursor. Safe to call redundantly.
    pub fn halt(&mut self) {
        self.cursor = None;
    }

    /// Emits every beat falling inside the horizon `[now, now + lookahead)`
    /// and advances the cursor past them.
    ///
    /// Beats are emitted exactly once; a beat already handed out on a
    /// previous poll is never rescheduled.
    pub fn collect_due(&mut self, now: f64, config: &MetronomeConfig) -> Vec<BeatEvent> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Vec::new();
        };

        let period = config.beat_period();
        let beats_per_bar = config.beats_per_bar.max(1);
        let horizon = now + LOOKAHEAD_SECONDS;
        let mut due = Vec::new();

        while cursor.next_beat < horizon {
            due.push(BeatEvent {
                timestamp: cursor.next_beat,
                beat_in_bar: cursor.beat_in_bar,
                accent: cursor.beat_in_bar == 0,
            });
            cursor.beat_in_bar = (cursor.beat_in_bar + 1) % beats_per_bar;
            cursor.next_beat += period;
        }

        due
    }
}

// ============================================================================
// Tests
// ============================================================================
