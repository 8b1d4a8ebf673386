//! Display utilities for the takt CLI.
//!
//! Renders engine events as terminal output. Countdown ticks overwrite a
//! single status line; phase changes and lifecycle messages get their own
//! lines.

use std::io::Write;

use crate::engine::EngineEvent;
use crate::types::{RunStatus, TimerSnapshot};

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders one engine event.
    pub fn show_event(event: &EngineEvent) {
        match event {
            EngineEvent::Started { snapshot } => {
                println!(
                    "* Started · {} {} · Cycle {}",
                    snapshot.phase.label(),
                    snapshot.clock(),
                    snapshot.cycle_count
                );
            }
            EngineEvent::Resumed { snapshot } => {
                println!(
                    "> Resumed · {} {} · Cycle {}",
                    snapshot.phase.label(),
                    snapshot.clock(),
                    snapshot.cycle_count
                );
            }
            EngineEvent::Ticked { snapshot } => {
                Self::show_countdown(snapshot);
            }
            EngineEvent::PhaseAdvanced { snapshot } => {
                println!(
                    "\n~ {} {} · Cycle {}",
                    snapshot.phase.label(),
                    snapshot.clock(),
                    snapshot.cycle_count
                );
            }
            EngineEvent::Paused { snapshot } => {
                println!(
                    "\n|| Paused at {} ({})",
                    snapshot.clock(),
                    snapshot.phase.label()
                );
            }
            EngineEvent::Stopped { snapshot } => {
                println!("\n[] {}", snapshot.status.label());
            }
            EngineEvent::Rejected { .. } => {
                println!("{}", RunStatus::Unconfigured.label());
            }
        }
    }

    /// Overwrites the countdown line in place.
    fn show_countdown(snapshot: &TimerSnapshot) {
        print!(
            "\r  {}  {} · Cycle {} · {} · next: {}   ",
            snapshot.clock(),
            snapshot.phase.label(),
            snapshot.cycle_count,
            snapshot.status.label(),
            snapshot.phase.other().label()
        );
        let _ = std::io::stdout().flush();
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}
