//! Smoke tests for the takt binary.
//!
//! These exercise argument parsing and help/completions output through the
//! real executable. The run command itself is covered by the engine tests;
//! spawning an open-ended timer here would hang the suite.

use assert_cmd::Command;
use predicates::prelude::*;

fn takt() -> Command {
    Command::cargo_bin("takt").expect("binary builds")
}

#[test]
fn test_no_args_shows_help() {
    takt()
        .assert()
        .success()
        .stdout(predicate::str::contains("practice"));
}

#[test]
fn test_help_mentions_run_command() {
    takt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("metronome"));
}

#[test]
fn test_version_flag() {
    takt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("takt"));
}

#[test]
fn test_run_help_lists_options() {
    takt()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--practice"))
        .stdout(predicate::str::contains("--rest"))
        .stdout(predicate::str::contains("--bpm"))
        .stdout(predicate::str::contains("--cycles"));
}

#[test]
fn test_rejects_malformed_duration() {
    takt()
        .args(["run", "--practice", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration"));
}

#[test]
fn test_rejects_out_of_range_seconds_field() {
    takt()
        .args(["run", "--rest", "1:75"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("00-59"));
}

#[test]
fn test_rejects_tempo_out_of_range() {
    takt()
        .args(["run", "--bpm", "500"])
        .assert()
        .failure();
}

#[test]
fn test_completions_bash() {
    takt()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("takt"));
}

#[test]
fn test_unknown_subcommand_fails() {
    takt().arg("frobnicate").assert().failure();
}
