//! Live configuration for the timer and metronome.
//!
//! The engine never caches configuration: phase durations are re-read at
//! every transition and the metronome settings at every scheduler pass, so
//! edits made while the timer runs take effect at the next natural
//! boundary. All numeric setters clamp to valid bounds instead of failing.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::types::{
    clamp_phase_seconds, clamp_volume, MetronomeConfig, Phase,
};

// ============================================================================
// DurationSource
// ============================================================================

/// Read-only view over the configured phase durations.
///
/// Implementations must be cheap and idempotent; the engine calls this on
/// every tick expiry and scheduling decision.
pub trait DurationSource: Send + Sync {
    /// Returns the configured duration of `phase` in whole seconds,
    /// clamped to `[0, 3599]`.
    fn duration(&self, phase: Phase) -> u32;

    /// Returns true if at least one phase has a non-zero duration.
    fn any_configured(&self) -> bool {
        self.duration(Phase::Practice) > 0 || self.duration(Phase::Rest) > 0
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Complete user-facing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Practice phase length in seconds.
    pub practice_seconds: u32,
    /// Rest phase length in seconds.
    pub rest_seconds: u32,
    /// Metronome settings.
    pub metronome: MetronomeConfig,
    /// Master volume in percent, applied to every tone.
    pub volume_percent: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            practice_seconds: 5 * 60,
            rest_seconds: 60,
            metronome: MetronomeConfig::default(),
            volume_percent: 80,
        }
    }
}

impl Settings {
    /// Returns a copy with every field clamped to its valid range.
    pub fn clamped(mut self) -> Self {
        self.practice_seconds = clamp_phase_seconds(self.practice_seconds);
        self.rest_seconds = clamp_phase_seconds(self.rest_seconds);
        self.metronome = self.metronome.clamped();
        self.volume_percent = clamp_volume(self.volume_percent);
        self
    }

    /// Returns the duration of `phase` in seconds.
    pub fn duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Practice => self.practice_seconds,
            Phase::Rest => self.rest_seconds,
        }
    }
}

// ============================================================================
// SharedSettings
// ============================================================================

/// Cloneable handle to settings shared between the CLI and the engine.
///
/// Reads return clamped copies; the engine treats each read as a stable
/// snapshot for the duration of one tick or scheduling pass.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    /// Creates a handle around the given settings (clamped on entry).
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings.clamped())),
        }
    }

    /// Returns a snapshot of the full settings.
    pub fn snapshot(&self) -> Settings {
        self.read().clone()
    }

    /// Returns the current metronome configuration.
    pub fn metronome(&self) -> MetronomeConfig {
        self.read().metronome
    }

    /// Returns the master volume in percent.
    pub fn volume_percent(&self) -> u32 {
        self.read().volume_percent
    }

    /// Sets a phase duration. Returns true if the stored value changed.
    pub fn set_duration(&self, phase: Phase, seconds: u32) -> bool {
        let seconds = clamp_phase_seconds(seconds);
        let mut settings = self.write();
        let slot = match phase {
            Phase::Practice => &mut settings.practice_seconds,
            Phase::Rest => &mut settings.rest_seconds,
        };
        let changed = *slot != seconds;
        *slot = seconds;
        changed
    }

    /// Sets the metronome tempo. Returns true if the clamped value changed,
    /// in which case the caller must force a scheduler restart.
    pub fn set_tempo(&self, tempo_bpm: u32) -> bool {
        let mut settings = self.write();
        let next = MetronomeConfig {
            tempo_bpm,
            ..settings.metronome
        }
        .clamped();
        let changed = settings.metronome.tempo_bpm != next.tempo_bpm;
        settings.metronome = next;
        changed
    }

    /// Sets the beats-per-bar signature. Returns true if it changed.
    pub fn set_beats_per_bar(&self, beats_per_bar: u32) -> bool {
        let mut settings = self.write();
        let next = MetronomeConfig {
            beats_per_bar,
            ..settings.metronome
        }
        .clamped();
        let changed = settings.metronome.beats_per_bar != next.beats_per_bar;
        settings.metronome = next;
        changed
    }

    /// Enables or disables the metronome. Returns true if it changed.
    pub fn set_metronome_enabled(&self, enabled: bool) -> bool {
        let mut settings = self.write();
        let changed = settings.metronome.enabled != enabled;
        settings.metronome.enabled = enabled;
        changed
    }

    /// Toggles auto-mute during rest phases. Returns true if it changed.
    pub fn set_auto_mute_on_rest(&self, auto_mute: bool) -> bool {
        let mut settings = self.write();
        let changed = settings.metronome.auto_mute_on_rest != auto_mute;
        settings.metronome.auto_mute_on_rest = auto_mute;
        changed
    }

    /// Sets the master volume (clamped to 0-100).
    pub fn set_volume_percent(&self, percent: u32) {
        self.write().volume_percent = clamp_volume(percent);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Settings> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Settings> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DurationSource for SharedSettings {
    fn duration(&self, phase: Phase) -> u32 {
        self.read().duration(phase)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.practice_seconds, 300);
        assert_eq!(settings.rest_seconds, 60);
        assert_eq!(settings.volume_percent, 80);
        assert!(settings.metronome.enabled);
    }

    #[test]
    fn test_settings_clamped() {
        let settings = Settings {
            practice_seconds: 10_000,
            rest_seconds: 4_000,
            metronome: MetronomeConfig {
                tempo_bpm: 1,
                beats_per_bar: 0,
                ..Default::default()
            },
            volume_percent: 500,
        }
        .clamped();

        assert_eq!(settings.practice_seconds, 3599);
        assert_eq!(settings.rest_seconds, 3599);
        assert_eq!(settings.metronome.tempo_bpm, 30);
        assert_eq!(settings.metronome.beats_per_bar, 1);
        assert_eq!(settings.volume_percent, 100);
    }

    #[test]
    fn test_duration_by_phase() {
        let settings = Settings {
            practice_seconds: 120,
            rest_seconds: 30,
            ..Default::default()
        };
        assert_eq!(settings.duration(Phase::Practice), 120);
        assert_eq!(settings.duration(Phase::Rest), 30);
    }

    #[test]
    fn test_shared_duration_source() {
        let shared = SharedSettings::new(Settings {
            practice_seconds: 90,
            rest_seconds: 0,
            ..Default::default()
        });

        assert_eq!(shared.duration(Phase::Practice), 90);
        assert_eq!(shared.duration(Phase::Rest), 0);
        assert!(shared.any_configured());
    }

    #[test]
    fn test_any_configured_both_zero() {
        let shared = SharedSettings::new(Settings {
            practice_seconds: 0,
            rest_seconds: 0,
            ..Default::default()
        });
        assert!(!shared.any_configured());
    }

    #[test]
    fn test_set_duration_clamps_and_reports_change() {
        let shared = SharedSettings::new(Settings::default());

        assert!(shared.set_duration(Phase::Rest, 45));
        assert_eq!(shared.duration(Phase::Rest), 45);

        // Same value again: no change.
        assert!(!shared.set_duration(Phase::Rest, 45));

        // Over the bound: stored clamped.
        assert!(shared.set_duration(Phase::Rest, 10_000));
        assert_eq!(shared.duration(Phase::Rest), 3599);
    }

    #[test]
    fn test_set_tempo_reports_effective_change() {
        let shared = SharedSettings::new(Settings::default());

        assert!(shared.set_tempo(120));
        assert_eq!(shared.metronome().tempo_bpm, 120);

        // Clamps to the same bound twice: second call is not a change.
        assert!(shared.set_tempo(1_000));
        assert_eq!(shared.metronome().tempo_bpm, 300);
        assert!(!shared.set_tempo(2_000));
    }

    #[test]
    fn test_set_flags() {
        let shared = SharedSettings::new(Settings::default());

        assert!(shared.set_metronome_enabled(false));
        assert!(!shared.metronome().enabled);
        assert!(!shared.set_metronome_enabled(false));

        assert!(shared.set_auto_mute_on_rest(false));
        assert!(!shared.metronome().auto_mute_on_rest);
    }

    #[test]
    fn test_set_volume_clamps() {
        let shared = SharedSettings::new(Settings::default());
        shared.set_volume_percent(200);
        assert_eq!(shared.volume_percent(), 100);
        shared.set_volume_percent(15);
        assert_eq!(shared.volume_percent(), 15);
    }

    #[test]
    fn test_clone_shares_storage() {
        let shared = SharedSettings::new(Settings::default());
        let clone = shared.clone();

        shared.set_duration(Phase::Practice, 42);
        assert_eq!(clone.duration(Phase::Practice), 42);
    }
}
