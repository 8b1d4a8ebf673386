//! Phase/cycle state machine.
//!
//! Pure countdown and transition logic with no timers, audio or I/O. The
//! driver in [`super::core`] owns one `LoopState`, feeds it ticks and maps
//! its outcomes (chime requests, forced stops) onto side effects.

use serde::{Deserialize, Serialize};

use crate::types::{Phase, RunStatus, TimerSnapshot, TimerState};

// ============================================================================
// PhaseDurations
// ============================================================================

/// One read of the configured phase durations, in whole seconds.
///
/// Captured from the duration source at each decision point so a single
/// transition sees one consistent pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    /// Practice phase length.
    pub practice: u32,
    /// Rest phase length.
    pub rest: u32,
}

impl PhaseDurations {
    /// Returns the duration of `phase`.
    pub fn get(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Practice => self.practice,
            Phase::Rest => self.rest,
        }
    }

    /// Returns true if at least one phase can run.
    pub fn any(&self) -> bool {
        self.practice > 0 || self.rest > 0
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Fresh start; the given phase's chime should play.
    Started { chime: Phase },
    /// Resumed from pause. If the paused phase had been edited down to
    /// zero, the machine advanced first and the new phase's chime should
    /// play.
    Resumed { advanced: Option<Phase> },
    /// Already running; nothing changed.
    AlreadyRunning,
    /// Both durations are zero; state is unchanged.
    Unconfigured,
}

/// Result of one tick firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Counted down one second, same phase.
    Counted,
    /// The phase expired and the machine advanced; play this chime.
    Advanced { chime: Phase },
    /// No phase has a positive duration left; the caller must stop.
    Exhausted,
}

// ============================================================================
// LoopState
// ============================================================================

/// The timer's mutable core: lifecycle state, current phase, countdown and
/// cycle counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopState {
    state: TimerState,
    phase: Phase,
    remaining_seconds: u32,
    cycle_count: u32,
}

impl LoopState {
    /// Creates a stopped machine displaying the practice duration.
    pub fn new(durations: PhaseDurations) -> Self {
        Self {
            state: TimerState::Stopped,
            phase: Phase::Practice,
            remaining_seconds: durations.practice,
            cycle_count: 1,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Remaining seconds in the current phase.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Practice cycles started so far.
    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    /// Builds the display snapshot for the current state.
    pub fn snapshot(&self, durations: PhaseDurations) -> TimerSnapshot {
        let status = match self.state {
            TimerState::Running => RunStatus::Running,
            TimerState::Paused => RunStatus::Paused,
            TimerState::Stopped => {
                if durations.any() {
                    RunStatus::Stopped
                } else {
                    RunStatus::Unconfigured
                }
            }
        };
        TimerSnapshot {
            remaining_seconds: self.remaining_seconds,
            phase: self.phase,
            cycle_count: self.cycle_count,
            status,
        }
    }

    /// Starts or resumes the timer.
    ///
    /// With both durations zero this is a no-op reporting
    /// [`StartOutcome::Unconfigured`]. A fresh start picks the first phase
    /// with a non-zero duration (practice preferred) and resets the cycle
    /// counter; a resume preserves phase and remaining time, advancing
    /// first only if the paused phase's remaining time is already zero.
    pub fn begin(&mut self, durations: PhaseDurations) -> StartOutcome {
        if !durations.any() {
            return StartOutcome::Unconfigured;
        }

        match self.state {
            TimerState::Running => StartOutcome::AlreadyRunning,
            TimerState::Stopped => {
                let phase = if durations.practice > 0 {
                    Phase::Practice
                } else {
                    Phase::Rest
                };
                self.phase = phase;
                self.cycle_count = 1;
                self.remaining_seconds = durations.get(phase);
                self.state = TimerState::Running;
                StartOutcome::Started { chime: phase }
            }
            TimerState::Paused => {
                let advanced = if self.remaining_seconds == 0 {
                    // Duration was edited down to zero while paused; move
                    // on before resuming. `any()` above guarantees a
                    // target phase exists.
                    self.advance(durations)
                } else {
                    None
                };
                self.state = TimerState::Running;
                StartOutcome::Resumed { advanced }
            }
        }
    }

    /// Pauses a running timer. Returns true if the state changed.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        true
    }

    /// Stops and resets to the practice baseline.
    pub fn stop(&mut self, durations: PhaseDurations) -> RunStatus {
        self.state = TimerState::Stopped;
        self.phase = Phase::Practice;
        self.cycle_count = 1;
        self.remaining_seconds = durations.practice;
        if durations.any() {
            RunStatus::Stopped
        } else {
            RunStatus::Unconfigured
        }
    }

    /// Applies one tick firing: count down, and advance on expiry within
    /// the same firing so the display never holds at 00:00.
    pub fn tick(&mut self, durations: PhaseDurations) -> TickResult {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        if self.remaining_seconds > 0 {
            return TickResult::Counted;
        }
        match self.advance(durations) {
            Some(chime) => TickResult::Advanced { chime },
            None => TickResult::Exhausted,
        }
    }

    /// Builds a machine in an arbitrary state (test setup only).
    #[cfg(test)]
    pub(crate) fn forced(
        state: TimerState,
        phase: Phase,
        remaining_seconds: u32,
        cycle_count: u32,
    ) -> Self {
        Self {
            state,
            phase,
            remaining_seconds,
            cycle_count,
        }
    }

    /// Switches to the next eligible phase.
    ///
    /// Never selects a phase with zero duration: a zero-duration rest is
    /// skipped (staying on practice counts as a new cycle), and a
    /// zero-duration practice keeps the loop resting. The cycle counter
    /// increments exactly when the resulting phase is practice. Returns
    /// `None` when no phase can run.
    fn advance(&mut self, durations: PhaseDurations) -> Option<Phase> {
        let preferred = self.phase.other();
        let next = if durations.get(preferred) > 0 {
            preferred
        } else if durations.get(self.phase) > 0 {
            self.phase
        } else {
            return None;
        };

        if next == Phase::Practice {
            self.cycle_count += 1;
        }
        self.phase = next;
        self.remaining_seconds = durations.get(next);
        Some(next)
    }
}

// ============================================================================
// Tests
// ============================================================================
