//! Tone synthesis.
//!
//! Renders one decaying tone into a sample buffer: an oscillator shaped by
//! an exponential decay envelope. This is the whole voice of the app; both
//! the metronome clicks and the phase chimes are instances of `ToneSpec`.

/// Sample rate used for synthesized tone buffers.
pub const SYNTH_SAMPLE_RATE: u32 = 44_100;

// Envelope decay constant: reaches -80 dB at the end of the tone.
const DECAY: f32 = 9.21;

// ============================================================================
// Timbre
// ============================================================================

/// Oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timbre {
    /// Pure sine, used for metronome clicks.
    Sine,
    /// Triangle, used for the phase chimes.
    Triangle,
}

// ============================================================================
// ToneSpec
// ============================================================================

/// One tone to be rendered: frequency, length, waveform and loudness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Oscillator frequency in Hz.
    pub frequency_hz: f32,
    /// Tone length in seconds.
    pub duration_seconds: f32,
    /// Oscillator waveform.
    pub timbre: Timbre,
    /// Loudness in percent of full scale, clamped to [0, 100].
    pub volume_percent: u32,
}

impl ToneSpec {
    /// Peak amplitude derived from the volume percentage.
    pub fn amplitude(&self) -> f32 {
        self.volume_percent.min(100) as f32 / 100.0
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders the tone to mono `f32` samples at the given rate.
pub fn render(spec: &ToneSpec, sample_rate: u32) -> Vec<f32> {
    let num_samples = (spec.duration_seconds * sample_rate as f32) as usize;
    let amplitude = spec.amplitude();
    let mut samples = Vec::with_capacity(num_samples);

    for i in 0..num_samples {
        let t = i as f32 / num_samples.max(1) as f32;
        let envelope = (-t * DECAY).exp();

        // Phase in whole cycles; the waveform functions take cycle fractions.
        let phase = spec.frequency_hz * i as f32 / sample_rate as f32;
        let wave = match spec.timbre {
            Timbre::Sine => (phase * std::f32::consts::TAU).sin(),
            Timbre::Triangle => triangle(phase),
        };

        samples.push(wave * envelope * amplitude);
    }

    samples
}

/// Triangle wave over cycle fraction `p`, rising from zero at `p == 0`.
fn triangle(p: f32) -> f32 {
    let x = p.fract();
    if x < 0.25 {
        4.0 * x
    } else if x < 0.75 {
        2.0 - 4.0 * x
    } else {
        4.0 * x - 4.0
    }
}

// ============================================================================
// Tests
// ============================================================================
