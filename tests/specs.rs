//! Workspace-level integration specs.
//!
//! Exercises the `booter` and `supervisor` binaries as black boxes via
//! `assert_cmd`, the way the oddjobs `oj` CLI specs exercised the `oj`
//! binary.

use assert_cmd::Command;

fn booter() -> Command {
    Command::cargo_bin("booter").expect("booter binary is built by this workspace")
}

fn supervisor() -> Command {
    Command::cargo_bin("supervisor").expect("supervisor binary is built by this workspace")
}

#[test]
fn booter_help_shows_usage() {
    let output = booter().arg("--help").output().expect("booter runs");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage:"));
}

#[test]
fn supervisor_help_shows_usage() {
    let output = supervisor().arg("--help").output().expect("supervisor runs");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage:"));
}

#[test]
fn booter_rejects_unknown_flag() {
    let output = booter().arg("--not-a-real-flag").output().expect("booter runs");
    assert!(!output.status.success());
}

#[test]
fn supervisor_rejects_unknown_flag() {
    let output = supervisor().arg("--not-a-real-flag").output().expect("supervisor runs");
    assert!(!output.status.success());
}
