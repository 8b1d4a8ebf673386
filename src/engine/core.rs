//! Timer engine.
//!
//! `TimerEngine` is the one context object owning all mutable timer state:
//! the phase/cycle machine, the beat scheduler cursor, the chime
//! reservation and the driver sessions. Two periodic drivers run while the
//! timer does — a one-second ticker for the countdown and a 25 ms poller
//! for the metronome — on independent cadences and independent clocks.
//!
//! Every driver task captures the session id it was spawned under and
//! no-ops once the id moves on, so a firing queued before a pause, stop or
//! restart can never mutate state that has since been reset.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::audio::{Timbre, TonePlayer, ToneSpec};
use crate::config::{DurationSource, SharedSettings};
use crate::types::{Phase, RunStatus, TimerSnapshot};

use super::chime;
use super::scheduler::{BeatScheduler, POLL_INTERVAL};
use super::state::{LoopState, PhaseDurations, StartOutcome, TickResult};

// Metronome click voices; the accent sits higher and louder.
const ACCENT_CLICK_HZ: f32 = 1200.0;
const CLICK_HZ: f32 = 800.0;
const CLICK_SECONDS: f32 = 0.05;

// ============================================================================
// EngineEvent
// ============================================================================

/// Display-refresh events emitted after every state mutation.
///
/// Purely informational: nothing feeds back into the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Fresh start into the snapshot's phase.
    Started { snapshot: TimerSnapshot },
    /// Resumed from pause.
    Resumed { snapshot: TimerSnapshot },
    /// One second elapsed.
    Ticked { snapshot: TimerSnapshot },
    /// A phase expired and the loop moved on.
    PhaseAdvanced { snapshot: TimerSnapshot },
    /// Paused with state preserved.
    Paused { snapshot: TimerSnapshot },
    /// Stopped and reset (user stop or exhausted durations).
    Stopped { snapshot: TimerSnapshot },
    /// A start request was rejected because no duration is configured.
    Rejected { snapshot: TimerSnapshot },
}

impl EngineEvent {
    /// The snapshot carried by this event.
    pub fn snapshot(&self) -> &TimerSnapshot {
        match self {
            EngineEvent::Started { snapshot }
            | EngineEvent::Resumed { snapshot }
            | EngineEvent::Ticked { snapshot }
            | EngineEvent::PhaseAdvanced { snapshot }
            | EngineEvent::Paused { snapshot }
            | EngineEvent::Stopped { snapshot }
            | EngineEvent::Rejected { snapshot } => snapshot,
        }
    }
}

// ============================================================================
// EngineCore
// ============================================================================

/// What a ticker firing decided, reported back to the driver task.
enum TickStep {
    /// Keep ticking.
    Continue,
    /// Keep ticking and resynchronize the beat scheduler.
    PhaseChanged,
    /// This driver is done (stale session, pause or stop).
    Halt,
}

struct EngineCore {
    state: LoopState,
    scheduler: BeatScheduler,
    /// Chime handshake: earliest time the next metronome beat may sound.
    reserved_start: Option<f64>,
    /// Session ids; a driver whose id no longer matches must exit.
    tick_session: u64,
    beat_session: u64,
    settings: SharedSettings,
    player: Arc<dyn TonePlayer>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineCore {
    fn durations(&self) -> PhaseDurations {
        PhaseDurations {
            practice: self.settings.duration(Phase::Practice),
            rest: self.settings.duration(Phase::Rest),
        }
    }

    fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot(self.durations())
    }

    fn emit(&self, event: EngineEvent) {
        // The receiver may be gone during shutdown; that is not an error.
        let _ = self.events.send(event);
    }

    /// Gate predicate: is the metronome supposed to sound right now?
    fn should_run_metronome(&self) -> bool {
        let config = self.settings.metronome();
        config.enabled
            && self.state.state().is_running()
            && !(config.auto_mute_on_rest && self.state.phase() == Phase::Rest)
    }

    /// Schedules both chime notes and publishes the beat reservation.
    fn play_chime(&mut self, phase: Phase) {
        let plan = chime::plan(
            phase,
            self.player.now(),
            self.settings.volume_percent(),
        );
        for (spec, at) in plan.notes {
            self.player.play_at(spec, Some(at));
        }
        self.reserved_start = Some(plan.reserved_until);
    }

    /// Invalidates both drivers and drops the scheduler cursor. Must run
    /// before any state reset so stale firings see a dead session.
    fn invalidate_drivers(&mut self) {
        self.tick_session += 1;
        self.beat_session += 1;
        self.scheduler.halt();
    }
}

fn click_tone(accent: bool, volume_percent: u32) -> ToneSpec {
    ToneSpec {
        frequency_hz: if accent { ACCENT_CLICK_HZ } else { CLICK_HZ },
        duration_seconds: CLICK_SECONDS,
        timbre: Timbre::Sine,
        volume_percent: if accent {
            volume_percent
        } else {
            volume_percent * 7 / 10
        },
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Cloneable handle to the timer engine.
///
/// All mutation goes through the async methods here; driver tasks share the
/// same core behind a mutex, and the current-thread runtime interleaves
/// their bodies without preemption.
#[derive(Clone)]
pub struct TimerEngine {
    core: Arc<Mutex<EngineCore>>,
}

impl TimerEngine {
    /// Creates an engine and the receiving end of its event stream.
    pub fn new(
        settings: SharedSettings,
        player: Arc<dyn TonePlayer>,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let durations = PhaseDurations {
            practice: settings.duration(Phase::Practice),
            rest: settings.duration(Phase::Rest),
        };
        let core = EngineCore {
            state: LoopState::new(durations),
            scheduler: BeatScheduler::new(),
            reserved_start: None,
            tick_session: 0,
            beat_session: 0,
            settings,
            player,
            events,
        };
        (
            Self {
                core: Arc::new(Mutex::new(core)),
            },
            rx,
        )
    }

    /// Shared settings handle for configuration edits.
    pub async fn settings(&self) -> SharedSettings {
        self.core.lock().await.settings.clone()
    }

    /// Current display snapshot.
    pub async fn snapshot(&self) -> TimerSnapshot {
        let core = self.core.lock().await;
        core.snapshot()
    }

    /// True while the beat scheduler holds an active cursor.
    pub async fn metronome_running(&self) -> bool {
        self.core.lock().await.scheduler.is_running()
    }

    /// Starts a stopped timer or resumes a paused one.
    ///
    /// With both durations zero this reports
    /// [`StartOutcome::Unconfigured`] and changes nothing. Entering
    /// `Running` spawns the tick driver and synchronizes the scheduler.
    pub async fn start(&self) -> StartOutcome {
        let (outcome, tick_session) = {
            let mut core = self.core.lock().await;
            let durations = core.durations();
            let outcome = core.state.begin(durations);

            match outcome {
                StartOutcome::Started { chime } => {
                    core.play_chime(chime);
                    let snapshot = core.snapshot();
                    core.emit(EngineEvent::Started { snapshot });
                }
                StartOutcome::Resumed { advanced } => {
                    if let Some(phase) = advanced {
                        core.play_chime(phase);
                    }
                    let snapshot = core.snapshot();
                    core.emit(EngineEvent::Resumed { snapshot });
                }
                StartOutcome::AlreadyRunning => {}
                StartOutcome::Unconfigured => {
                    let snapshot = core.snapshot();
                    core.emit(EngineEvent::Rejected { snapshot });
                }
            }

            let session = if matches!(
                outcome,
                StartOutcome::Started { .. } | StartOutcome::Resumed { .. }
            ) {
                core.tick_session += 1;
                Some(core.tick_session)
            } else {
                None
            };
            (outcome, session)
        };

        if let Some(session) = tick_session {
            self.spawn_ticker(session);
            self.refresh_scheduler().await;
        }
        outcome
    }

    /// Pauses a running timer; a no-op otherwise.
    ///
    /// Both drivers are invalidated before the state flips, so a queued
    /// tick or poll can no longer fire into the paused state.
    pub async fn pause(&self) -> bool {
        let mut core = self.core.lock().await;
        if core.state.state() != crate::types::TimerState::Running {
            return false;
        }
        core.invalidate_drivers();
        core.state.pause();
        let snapshot = core.snapshot();
        core.emit(EngineEvent::Paused { snapshot });
        true
    }

    /// Stops unconditionally and resets to the practice baseline.
    pub async fn stop(&self) -> RunStatus {
        let mut core = self.core.lock().await;
        core.invalidate_drivers();
        core.reserved_start = None;
        let durations = core.durations();
        let status = core.state.stop(durations);
        let snapshot = core.snapshot();
        core.emit(EngineEvent::Stopped { snapshot });
        status
    }

    /// Forced-restart entry point for the beat scheduler.
    ///
    /// Call after any metronome configuration change (tempo, signature,
    /// enabled, auto-mute). The running cursor is always discarded; a new
    /// one starts only if the gate predicate holds, consuming a pending
    /// chime reservation.
    pub async fn refresh_scheduler(&self) {
        let beat_session = {
            let mut core = self.core.lock().await;
            core.beat_session += 1;
            core.scheduler.halt();
            if core.should_run_metronome() {
                let now = core.player.now();
                let reserved = core.reserved_start.take();
                core.scheduler.begin(now, reserved);
                Some(core.beat_session)
            } else {
                None
            }
        };

        if let Some(session) = beat_session {
            self.spawn_beat_poller(session);
        }
    }

    // ------------------------------------------------------------------
    // Configuration setters
    //
    // Each one updates the shared settings and, when the stored value
    // actually changed, forces the scheduler restart the configuration
    // contract requires. (The gate predicate would also catch flag flips
    // on the next poll; the restart just makes the edit take effect on a
    // fresh cursor.)
    // ------------------------------------------------------------------

    /// Sets the metronome tempo, restarting the beat grid on change.
    pub async fn set_tempo(&self, tempo_bpm: u32) {
        let changed = self.core.lock().await.settings.set_tempo(tempo_bpm);
        if changed {
            self.refresh_scheduler().await;
        }
    }

    /// Sets the beats-per-bar signature, restarting the grid on change.
    pub async fn set_beats_per_bar(&self, beats_per_bar: u32) {
        let changed = self
            .core
            .lock()
            .await
            .settings
            .set_beats_per_bar(beats_per_bar);
        if changed {
            self.refresh_scheduler().await;
        }
    }

    /// Enables or disables the metronome.
    pub async fn set_metronome_enabled(&self, enabled: bool) {
        let changed = self.core.lock().await.settings.set_metronome_enabled(enabled);
        if changed {
            self.refresh_scheduler().await;
        }
    }

    /// Toggles auto-mute during rest phases.
    pub async fn set_auto_mute_on_rest(&self, auto_mute: bool) {
        let changed = self
            .core
            .lock()
            .await
            .settings
            .set_auto_mute_on_rest(auto_mute);
        if changed {
            self.refresh_scheduler().await;
        }
    }

    /// Sets a phase duration; picked up at the next transition.
    pub async fn set_duration(&self, phase: Phase, seconds: u32) {
        self.core.lock().await.settings.set_duration(phase, seconds);
    }

    /// Invalidates all drivers without touching timer state. After this
    /// the engine is inert until `start()` is called again.
    pub async fn dispose(&self) {
        let mut core = self.core.lock().await;
        core.invalidate_drivers();
        debug!("engine disposed");
    }

    // ------------------------------------------------------------------
    // Drivers
    // ------------------------------------------------------------------

    fn spawn_ticker(&self, session: u64) {
        let engine = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // An interval's first tick completes immediately; the
            // countdown starts one full second later.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match engine.on_tick(session).await {
                    TickStep::Continue => {}
                    TickStep::PhaseChanged => engine.refresh_scheduler().await,
                    TickStep::Halt => break,
                }
            }
        });
    }

    async fn on_tick(&self, session: u64) -> TickStep {
        let mut core = self.core.lock().await;
        if core.tick_session != session {
            return TickStep::Halt;
        }

        let durations = core.durations();
        match core.state.tick(durations) {
            TickResult::Counted => {
                let snapshot = core.snapshot();
                core.emit(EngineEvent::Ticked { snapshot });
                TickStep::Continue
            }
            TickResult::Advanced { chime } => {
                // Kill the old cursor in the same critical section as the
                // transition; the poller restarts against the new phase
                // and the fresh chime reservation.
                core.beat_session += 1;
                core.scheduler.halt();
                core.play_chime(chime);
                let snapshot = core.snapshot();
                core.emit(EngineEvent::PhaseAdvanced { snapshot });
                TickStep::PhaseChanged
            }
            TickResult::Exhausted => {
                core.invalidate_drivers();
                core.reserved_start = None;
                core.state.stop(durations);
                let snapshot = core.snapshot();
                core.emit(EngineEvent::Stopped { snapshot });
                TickStep::Halt
            }
        }
    }

    fn spawn_beat_poller(&self, session: u64) {
        let engine = self.clone();
        tokio::spawn(async move {
            let mut poll = interval(POLL_INTERVAL);
            poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                poll.tick().await;
                if !engine.on_poll(session).await {
                    break;
                }
            }
        });
    }

    async fn on_poll(&self, session: u64) -> bool {
        let mut core = self.core.lock().await;
        if core.beat_session != session {
            return false;
        }
        if !core.should_run_metronome() {
            core.scheduler.halt();
            core.beat_session += 1;
            return false;
        }

        let config = core.settings.metronome();
        let volume = core.settings.volume_percent();
        let now = core.player.now();
        for beat in core.scheduler.collect_due(now, &config) {
            core.player
                .play_at(click_tone(beat.accent, volume), Some(beat.timestamp));
        }
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
