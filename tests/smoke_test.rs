//! Smoke tests for the mcs CLI.
//!
//! These tests verify basic CLI functionality:
//! - `mcs --version` outputs version info
//! - `mcs --help` outputs help text
//! - `mcs version` outputs valid JSON

mod common;

use assert_cmd::Command;
use common::TestEnv;
use predicates::prelude::*;

/// Get a Command for the mcs binary.
fn mcs() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mcs"))
}

#[test]
fn test_version_flag() {
    mcs()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mcs"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    mcs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn test_no_args_prints_usage() {
    mcs()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_command_outputs_json() {
    let env = TestEnv::new();

    env.mcs()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""version":""#))
        .stdout(predicate::str::contains(r#""commit":""#));
}

#[test]
fn test_human_readable_flag() {
    let env = TestEnv::new();

    env.mcs()
        .args(["-H", "version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("mcs "));
}

#[test]
fn test_settings_help() {
    mcs()
        .args(["settings", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("release"));
}
