//! Rodio-backed tone output.
//!
//! Tones are rendered to sample buffers and appended to detached sinks, so
//! every call is fire-and-forget. A future audio-clock timestamp becomes a
//! leading delay on the source; the audio subsystem serializes whatever the
//! chime and the metronome enqueue.

use std::sync::Arc;
use std::time::Duration;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::clock::AudioClock;
use super::error::AudioError;
use super::tone::{self, ToneSpec, SYNTH_SAMPLE_RATE};
use super::TonePlayer;

// ============================================================================
// RodioTonePlayer
// ============================================================================

/// Tone player backed by the default rodio output device.
///
/// The player holds only the (shareable) stream handle; the `OutputStream`
/// itself is returned to the caller as a keep-alive guard, since playback
/// stops the moment it is dropped.
pub struct RodioTonePlayer {
    handle: OutputStreamHandle,
    clock: AudioClock,
}

impl RodioTonePlayer {
    /// Opens the default output device.
    ///
    /// Returns the stream guard (keep it alive for the lifetime of the
    /// program) together with the player.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::DeviceUnavailable` if no output device exists.
    pub fn open() -> Result<(OutputStream, Self), AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;

        debug!("audio output stream initialized");

        Ok((
            stream,
            Self {
                handle,
                clock: AudioClock::start(),
            },
        ))
    }

    fn submit(&self, spec: ToneSpec, lead: Duration) -> Result<(), AudioError> {
        let samples = tone::render(&spec, SYNTH_SAMPLE_RATE);
        let source = SamplesBuffer::new(1, SYNTH_SAMPLE_RATE, samples).delay(lead);

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        sink.append(source);
        sink.detach();

        Ok(())
    }
}

impl TonePlayer for RodioTonePlayer {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn play_at(&self, spec: ToneSpec, when: Option<f64>) {
        let lead = match when {
            Some(timestamp) => {
                let ahead = timestamp - self.clock.now();
                if ahead > 0.0 {
                    Duration::from_secs_f64(ahead)
                } else {
                    Duration::ZERO
                }
            }
            None => Duration::ZERO,
        };

        // Failures degrade to silence; the timer itself is unaffected.
        if let Err(e) = self.submit(spec, lead) {
            warn!("tone playback failed: {}", e);
        }
    }
}

impl std::fmt::Debug for RodioTonePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioTonePlayer").finish_non_exhaustive()
    }
}

// ============================================================================
// NullTonePlayer
// ============================================================================

/// Silent player used when no audio device is available.
///
/// The audio clock still runs so that scheduling logic behaves identically
/// with and without sound.
#[derive(Debug, Default)]
pub struct NullTonePlayer {
    clock: AudioClock,
}

impl NullTonePlayer {
    /// Creates a silent player with a fresh clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TonePlayer for NullTonePlayer {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn play_at(&self, _spec: ToneSpec, _when: Option<f64>) {}
}

// ============================================================================
// Construction helper
// ============================================================================

/// Opens the default audio output, degrading to the silent player.
///
/// Returns the stream guard (None when silent) and the shared player. A
/// missing device is logged once and otherwise ignored: the timer keeps
/// full functionality minus sound.
pub fn create_player() -> (Option<OutputStream>, Arc<dyn TonePlayer>) {
    match RodioTonePlayer::open() {
        Ok((stream, player)) => (Some(stream), Arc::new(player)),
        Err(e) => {
            warn!("audio unavailable, running silent: {}", e);
            (None, Arc::new(NullTonePlayer::new()))
        }
    }
}
