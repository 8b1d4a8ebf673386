//! Timer engine.
//!
//! This module contains the heart of the application:
//! - `state`: pure phase/cycle state machine and countdown semantics
//! - `scheduler`: lookahead beat scheduler for the metronome
//! - `chime`: two-note phase chimes and the scheduler handshake
//! - `core`: the `TimerEngine` context object and its driver tasks

pub mod chime;
pub mod core;
pub mod scheduler;
pub mod state;

pub use self::core::{EngineEvent, TimerEngine};
pub use scheduler::{
    BeatEvent, BeatScheduler, LOOKAHEAD_SECONDS, POLL_INTERVAL,
    START_MARGIN_SECONDS,
};
pub use state::{LoopState, PhaseDurations, StartOutcome, TickResult};
