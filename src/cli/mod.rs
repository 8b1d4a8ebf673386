//! CLI module for the takt timer.
//!
//! This module provides the command-line interface:
//! - `commands`: command definitions using clap derive
//! - `display`: output formatting for engine events

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
