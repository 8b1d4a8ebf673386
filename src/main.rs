//! takt - practice-loop timer with a built-in metronome
//!
//! Alternates practice and rest phases on a repeating loop, announcing
//! each phase with a two-note chime and keeping a click track running
//! while you practice.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use takt::audio;
use takt::cli::{Cli, Commands, Display, RunArgs};
use takt::config::SharedSettings;
use takt::engine::{EngineEvent, TimerEngine};
use takt::types::Phase;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run_loop(args).await,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Runs the practice loop until it stops or Ctrl-C arrives.
async fn run_loop(args: RunArgs) -> Result<()> {
    let settings = SharedSettings::new(args.to_settings());
    let (_audio_guard, player) = audio::create_player();
    let (engine, mut events) = TimerEngine::new(settings, player);

    engine.start().await;

    let mut current_phase = engine.snapshot().await.phase;
    let mut completed_practices: u32 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                engine.stop().await;
                // The stop event is already queued; drain and show it.
                while let Ok(event) = events.try_recv() {
                    Display::show_event(&event);
                }
                break;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                Display::show_event(&event);

                match &event {
                    EngineEvent::Stopped { .. } | EngineEvent::Rejected { .. } => break,
                    EngineEvent::PhaseAdvanced { snapshot } => {
                        if current_phase == Phase::Practice {
                            completed_practices += 1;
                        }
                        current_phase = snapshot.phase;
                        if args.cycles > 0 && completed_practices >= args.cycles {
                            engine.stop().await;
                        }
                    }
                    EngineEvent::Started { snapshot }
                    | EngineEvent::Resumed { snapshot } => {
                        current_phase = snapshot.phase;
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
