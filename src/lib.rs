//! takt - practice-loop interval timer with a built-in metronome
//!
//! This library provides the core functionality for the takt CLI:
//! - A phase/cycle state machine alternating practice and rest
//! - A one-second tick driver for the countdown
//! - A lookahead beat scheduler keeping the metronome free of jitter
//! - Two-note phase chimes synchronized with the metronome
//! - Tone synthesis and scheduled playback over the default audio device
//!
//! The countdown and the metronome live in different time domains: the
//! ticker counts wall-clock seconds, while every audible event is stamped
//! on a high-resolution audio clock. The engine owns both drivers and
//! keeps them honest across pause/resume and configuration changes.

pub mod audio;
pub mod cli;
pub mod config;
pub mod engine;
pub mod types;

// Re-export commonly used types for convenience
pub use audio::{
    create_player, AudioError, MockTonePlayer, NullTonePlayer,
    RodioTonePlayer, Timbre, TonePlayer, ToneSpec,
};
pub use config::{DurationSource, Settings, SharedSettings};
pub use engine::{
    EngineEvent, LoopState, PhaseDurations, StartOutcome, TimerEngine,
};
pub use types::{
    format_clock, MetronomeConfig, Phase, RunStatus, TimerSnapshot,
    TimerState,
};
