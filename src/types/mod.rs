//! Core data types for the practice-loop timer.
//!
//! This module defines the data structures used for:
//! - Timer and phase state
//! - Metronome configuration with clamping
//! - Display snapshots sent to the UI layer

use serde::{Deserialize, Serialize};

/// Maximum configurable phase length in seconds (59:59 on the clock).
pub const MAX_PHASE_SECONDS: u32 = 3599;

/// Lowest accepted metronome tempo.
pub const TEMPO_MIN_BPM: u32 = 30;

/// Highest accepted metronome tempo.
pub const TEMPO_MAX_BPM: u32 = 300;

// ============================================================================
// Phase
// ============================================================================

/// One of the two alternating timer phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The practice (active) phase.
    Practice,
    /// The rest phase between practice blocks.
    Rest,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Practice => "practice",
            Phase::Rest => "rest",
        }
    }

    /// Returns the display label shown in the phase badge.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Practice => "Practice",
            Phase::Rest => "Rest",
        }
    }

    /// Returns the phase that normally follows this one.
    pub fn other(&self) -> Phase {
        match self {
            Phase::Practice => Phase::Rest,
            Phase::Rest => Phase::Practice,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Practice
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Lifecycle state of the timer.
///
/// `Running` and `Paused` are mutually exclusive; `Stopped` implies no
/// tick or scheduler activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Timer is stopped and reset.
    Stopped,
    /// Timer is counting down.
    Running,
    /// Timer is paused with phase and remaining time preserved.
    Paused,
}

impl TimerState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Stopped => "stopped",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        }
    }

    /// Returns true if the timer is actively counting down.
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        matches!(self, TimerState::Paused)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        TimerState::Stopped
    }
}

// ============================================================================
// RunStatus
// ============================================================================

/// Status label reported to the display after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Timer is running.
    Running,
    /// Timer is paused.
    Paused,
    /// Timer is stopped with at least one duration configured.
    Stopped,
    /// Both phase durations are zero; the timer cannot start.
    Unconfigured,
}

impl RunStatus {
    /// Returns the label shown in the status line.
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Running => "Running",
            RunStatus::Paused => "Paused",
            RunStatus::Stopped => "Stopped",
            RunStatus::Unconfigured => "Set a duration",
        }
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Read-only view of the timer handed to the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Remaining whole seconds in the current phase.
    pub remaining_seconds: u32,
    /// Current phase.
    pub phase: Phase,
    /// Number of practice cycles started so far (starts at 1).
    pub cycle_count: u32,
    /// Status label for the display.
    pub status: RunStatus,
}

impl TimerSnapshot {
    /// Formats the remaining time as a zero-padded `MM:SS` clock.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_seconds)
    }
}

// ============================================================================
// MetronomeConfig
// ============================================================================

/// Metronome configuration snapshot read by the beat scheduler.
///
/// The scheduler reads one stable copy per scheduling pass; setters clamp
/// rather than reject out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetronomeConfig {
    /// Whether the metronome is audible at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Silence the metronome during rest phases.
    #[serde(default = "default_true")]
    pub auto_mute_on_rest: bool,
    /// Tempo in beats per minute, clamped to [30, 300].
    pub tempo_bpm: u32,
    /// Beats per bar; the first beat of each bar is accented.
    pub beats_per_bar: u32,
}

fn default_true() -> bool {
    true
}

impl Default for MetronomeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_mute_on_rest: true,
            tempo_bpm: 90,
            beats_per_bar: 4,
        }
    }
}

impl MetronomeConfig {
    /// Returns a copy with tempo and bar length clamped to valid bounds.
    pub fn clamped(mut self) -> Self {
        self.tempo_bpm = self.tempo_bpm.clamp(TEMPO_MIN_BPM, TEMPO_MAX_BPM);
        self.beats_per_bar = self.beats_per_bar.max(1);
        self
    }

    /// Seconds between consecutive beats at the configured tempo.
    pub fn beat_period(&self) -> f64 {
        60.0 / f64::from(self.tempo_bpm)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Clamps a phase duration to the configurable range `[0, 3599]` seconds.
pub fn clamp_phase_seconds(seconds: u32) -> u32 {
    seconds.min(MAX_PHASE_SECONDS)
}

/// Clamps a volume percentage to `[0, 100]`.
pub fn clamp_volume(percent: u32) -> u32 {
    percent.min(100)
}

/// Formats whole seconds as a zero-padded `MM:SS` clock string.
pub fn format_clock(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod phase_tests {
        use super::*;

        #[test]
        fn test_default_is_practice() {
            assert_eq!(Phase::default(), Phase::Practice);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(Phase::Practice.as_str(), "practice");
            assert_eq!(Phase::Rest.as_str(), "rest");
        }

        #[test]
        fn test_label() {
            assert_eq!(Phase::Practice.label(), "Practice");
            assert_eq!(Phase::Rest.label(), "Rest");
        }

        #[test]
        fn test_other() {
            assert_eq!(Phase::Practice.other(), Phase::Rest);
            assert_eq!(Phase::Rest.other(), Phase::Practice);
        }

        #[test]
        fn test_serialize_deserialize() {
            let json = serde_json::to_string(&Phase::Rest).unwrap();
            assert_eq!(json, "\"rest\"");

            let phase: Phase = serde_json::from_str(&json).unwrap();
            assert_eq!(phase, Phase::Rest);
        }
    }

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_default_is_stopped() {
            assert_eq!(TimerState::default(), TimerState::Stopped);
        }

        #[test]
        fn test_predicates() {
            assert!(TimerState::Running.is_running());
            assert!(!TimerState::Running.is_paused());
            assert!(TimerState::Paused.is_paused());
            assert!(!TimerState::Paused.is_running());
            assert!(!TimerState::Stopped.is_running());
            assert!(!TimerState::Stopped.is_paused());
        }

        #[test]
        fn test_as_str() {
            assert_eq!(TimerState::Stopped.as_str(), "stopped");
            assert_eq!(TimerState::Running.as_str(), "running");
            assert_eq!(TimerState::Paused.as_str(), "paused");
        }
    }

    mod run_status_tests {
        use super::*;

        #[test]
        fn test_labels() {
            assert_eq!(RunStatus::Running.label(), "Running");
            assert_eq!(RunStatus::Paused.label(), "Paused");
            assert_eq!(RunStatus::Stopped.label(), "Stopped");
            assert_eq!(RunStatus::Unconfigured.label(), "Set a duration");
        }
    }

    mod metronome_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = MetronomeConfig::default();
            assert!(config.enabled);
            assert!(config.auto_mute_on_rest);
            assert_eq!(config.tempo_bpm, 90);
            assert_eq!(config.beats_per_bar, 4);
        }

        #[test]
        fn test_clamped_tempo_low() {
            let config = MetronomeConfig {
                tempo_bpm: 5,
                ..Default::default()
            }
            .clamped();
            assert_eq!(config.tempo_bpm, TEMPO_MIN_BPM);
        }

        #[test]
        fn test_clamped_tempo_high() {
            let config = MetronomeConfig {
                tempo_bpm: 900,
                ..Default::default()
            }
            .clamped();
            assert_eq!(config.tempo_bpm, TEMPO_MAX_BPM);
        }

        #[test]
        fn test_clamped_bar_length() {
            let config = MetronomeConfig {
                beats_per_bar: 0,
                ..Default::default()
            }
            .clamped();
            assert_eq!(config.beats_per_bar, 1);
        }

        #[test]
        fn test_beat_period() {
            let config = MetronomeConfig {
                tempo_bpm: 120,
                ..Default::default()
            };
            assert!((config.beat_period() - 0.5).abs() < 1e-9);

            let config = MetronomeConfig {
                tempo_bpm: 60,
                ..Default::default()
            };
            assert!((config.beat_period() - 1.0).abs() < 1e-9);
        }

        #[test]
        fn test_serialize_roundtrip() {
            let config = MetronomeConfig {
                enabled: false,
                auto_mute_on_rest: false,
                tempo_bpm: 132,
                beats_per_bar: 3,
            };
            let json = serde_json::to_string(&config).unwrap();
            let back: MetronomeConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(config, back);
        }
    }

    mod helper_tests {
        use super::*;

        #[test]
        fn test_clamp_phase_seconds() {
            assert_eq!(clamp_phase_seconds(0), 0);
            assert_eq!(clamp_phase_seconds(300), 300);
            assert_eq!(clamp_phase_seconds(3599), 3599);
            assert_eq!(clamp_phase_seconds(3600), 3599);
            assert_eq!(clamp_phase_seconds(u32::MAX), 3599);
        }

        #[test]
        fn test_clamp_volume() {
            assert_eq!(clamp_volume(0), 0);
            assert_eq!(clamp_volume(80), 80);
            assert_eq!(clamp_volume(100), 100);
            assert_eq!(clamp_volume(250), 100);
        }

        #[test]
        fn test_format_clock() {
            assert_eq!(format_clock(0), "00:00");
            assert_eq!(format_clock(59), "00:59");
            assert_eq!(format_clock(60), "01:00");
            assert_eq!(format_clock(305), "05:05");
            assert_eq!(format_clock(3599), "59:59");
        }

        #[test]
        fn test_snapshot_clock() {
            let snapshot = TimerSnapshot {
                remaining_seconds: 90,
                phase: Phase::Practice,
                cycle_count: 1,
                status: RunStatus::Running,
            };
            assert_eq!(snapshot.clock(), "01:30");
        }
    }
}
