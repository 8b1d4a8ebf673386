//! Command definitions for the takt CLI.
//!
//! Uses clap derive macro for argument parsing. Durations accept either a
//! `MM:SS` clock string or plain seconds.

use clap::{Args, Parser, Subcommand};

use crate::config::Settings;
use crate::types::{clamp_phase_seconds, MetronomeConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// takt - a practice-loop timer with a built-in metronome
#[derive(Parser, Debug)]
#[command(
    name = "takt",
    version,
    about = "Practice-loop interval timer with a built-in metronome",
    long_about = "Alternates practice and rest phases on a repeating loop, \
                  marking each phase change with a chime and keeping a \
                  metronome click track running while you practice.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the practice loop in the foreground (Ctrl-C stops)
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Practice phase length, MM:SS or seconds (up to 59:59)
    #[arg(short, long, default_value = "5:00", value_parser = parse_duration)]
    pub practice: u32,

    /// Rest phase length, MM:SS or seconds (up to 59:59)
    #[arg(short, long, default_value = "1:00", value_parser = parse_duration)]
    pub rest: u32,

    /// Metronome tempo in beats per minute (30-300)
    #[arg(
        short = 'b',
        long,
        default_value = "90",
        value_parser = clap::value_parser!(u32).range(30..=300)
    )]
    pub bpm: u32,

    /// Beats per bar; the first beat of each bar is accented
    #[arg(
        long,
        default_value = "4",
        value_parser = clap::value_parser!(u32).range(1..=16)
    )]
    pub beats: u32,

    /// Disable the metronome entirely
    #[arg(long)]
    pub no_metronome: bool,

    /// Keep the metronome clicking through rest phases
    #[arg(long)]
    pub metronome_on_rest: bool,

    /// Master volume in percent (0-100)
    #[arg(
        long,
        default_value = "80",
        value_parser = clap::value_parser!(u32).range(0..=100)
    )]
    pub volume: u32,

    /// Stop after this many completed practice cycles (0 = until Ctrl-C)
    #[arg(short, long, default_value = "0")]
    pub cycles: u32,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            practice: 5 * 60,
            rest: 60,
            bpm: 90,
            beats: 4,
            no_metronome: false,
            metronome_on_rest: false,
            volume: 80,
            cycles: 0,
        }
    }
}

impl RunArgs {
    /// Builds engine settings from the parsed arguments.
    pub fn to_settings(&self) -> Settings {
        Settings {
            practice_seconds: self.practice,
            rest_seconds: self.rest,
            metronome: MetronomeConfig {
                enabled: !self.no_metronome,
                auto_mute_on_rest: !self.metronome_on_rest,
                tempo_bpm: self.bpm,
                beats_per_bar: self.beats,
            },
            volume_percent: self.volume,
        }
    }
}

// ============================================================================
// Value Parsers
// ============================================================================

/// Parses a phase duration given as `MM:SS` or plain seconds.
///
/// The result is clamped to the configurable maximum (59:59); malformed
/// input is rejected with a usage hint.
fn parse_duration(value: &str) -> Result<u32, String> {
    let value = value.trim();
    if let Some((minutes, seconds)) = value.split_once(':') {
        let minutes: u32 = minutes
            .parse()
            .map_err(|_| format!("invalid minutes in '{value}'"))?;
        let seconds: u32 = seconds
            .parse()
            .map_err(|_| format!("invalid seconds in '{value}'"))?;
        if seconds > 59 {
            return Err(format!("seconds must be 00-59 in '{value}'"));
        }
        Ok(clamp_phase_seconds(minutes * 60 + seconds))
    } else {
        let seconds: u32 = value
            .parse()
            .map_err(|_| format!("'{value}' is not a duration (use MM:SS or seconds)"))?;
        Ok(clamp_phase_seconds(seconds))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_duration_tests {
        use super::*;

        #[test]
        fn test_clock_format() {
            assert_eq!(parse_duration("5:00"), Ok(300));
            assert_eq!(parse_duration("0:45"), Ok(45));
            assert_eq!(parse_duration("59:59"), Ok(3599));
        }

        #[test]
        fn test_plain_seconds() {
            assert_eq!(parse_duration("90"), Ok(90));
            assert_eq!(parse_duration("0"), Ok(0));
        }

        #[test]
        fn test_clamps_to_maximum() {
            assert_eq!(parse_duration("7200"), Ok(3599));
            assert_eq!(parse_duration("99:59"), Ok(3599));
        }

        #[test]
        fn test_rejects_garbage() {
            assert!(parse_duration("abc").is_err());
            assert!(parse_duration("1:xx").is_err());
            assert!(parse_duration("x:30").is_err());
            assert!(parse_duration("").is_err());
        }

        #[test]
        fn test_rejects_out_of_range_seconds() {
            assert!(parse_duration("1:60").is_err());
            assert!(parse_duration("0:99").is_err());
        }

        #[test]
        fn test_trims_whitespace() {
            assert_eq!(parse_duration(" 2:30 "), Ok(150));
        }
    }

    mod cli_parse_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["takt"]);
            assert!(cli.command.is_none());
        }

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["takt", "run"]);
            let Some(Commands::Run(args)) = cli.command else {
                panic!("expected run command");
            };
            assert_eq!(args.practice, 300);
            assert_eq!(args.rest, 60);
            assert_eq!(args.bpm, 90);
            assert_eq!(args.beats, 4);
            assert!(!args.no_metronome);
            assert_eq!(args.cycles, 0);
        }

        #[test]
        fn test_parse_run_with_options() {
            let cli = Cli::parse_from([
                "takt", "run", "--practice", "10:00", "--rest", "90", "-b",
                "120", "--beats", "3", "--no-metronome", "--volume", "55",
                "--cycles", "4",
            ]);
            let Some(Commands::Run(args)) = cli.command else {
                panic!("expected run command");
            };
            assert_eq!(args.practice, 600);
            assert_eq!(args.rest, 90);
            assert_eq!(args.bpm, 120);
            assert_eq!(args.beats, 3);
            assert!(args.no_metronome);
            assert_eq!(args.volume, 55);
            assert_eq!(args.cycles, 4);
        }

        #[test]
        fn test_parse_rejects_bpm_out_of_range() {
            assert!(Cli::try_parse_from(["takt", "run", "-b", "20"]).is_err());
            assert!(Cli::try_parse_from(["takt", "run", "-b", "400"]).is_err());
        }

        #[test]
        fn test_parse_rejects_bad_duration() {
            assert!(
                Cli::try_parse_from(["takt", "run", "--practice", "abc"]).is_err()
            );
        }

        #[test]
        fn test_verbose_flag() {
            let cli = Cli::parse_from(["takt", "-v", "run"]);
            assert!(cli.verbose);
        }
    }

    mod settings_tests {
        use super::*;

        #[test]
        fn test_to_settings_maps_flags() {
            let args = RunArgs {
                practice: 120,
                rest: 30,
                bpm: 132,
                beats: 3,
                no_metronome: true,
                metronome_on_rest: true,
                volume: 70,
                cycles: 2,
            };

            let settings = args.to_settings();
            assert_eq!(settings.practice_seconds, 120);
            assert_eq!(settings.rest_seconds, 30);
            assert_eq!(settings.metronome.tempo_bpm, 132);
            assert_eq!(settings.metronome.beats_per_bar, 3);
            assert!(!settings.metronome.enabled);
            assert!(!settings.metronome.auto_mute_on_rest);
            assert_eq!(settings.volume_percent, 70);
        }

        #[test]
        fn test_default_args_match_default_settings() {
            let settings = RunArgs::default().to_settings();
            assert_eq!(settings, Settings::default());
        }
    }
}
