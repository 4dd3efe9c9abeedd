//! Integration tests for the la-harness CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow as _;
use clap as _;
use clap_verbosity_flag as _;
use harness_cli as _;
use harness_core as _;
use rstest as _;
use serde as _;
use serde_json as _;
use tracing as _;
use tracing_subscriber as _;

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_la-harness"))
}

fn sample_scenario(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("failed to run la-harness")
}

#[test]
fn sample_not_taken_scenario_passes() {
    let scenario = sample_scenario("addi_not_taken.json");
    let output = run(&["run", scenario.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pass at 0x00000418 (tag 0x19)"), "{stdout}");
    assert!(stdout.contains("rom 6"), "{stdout}");
}

#[test]
fn sample_ram_scenario_fails_after_masked_write() {
    let scenario = sample_scenario("ram_masked_write.json");
    let output = run(&["run", scenario.to_str().unwrap(), "--settle-spins", "0"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fail at 0x00000400 (tag 0x1a)"), "{stdout}");
    assert!(
        stdout.contains("ram-read 1 ram-write 1 unmapped 1"),
        "{stdout}"
    );
}

#[test]
fn demo_exit_codes_follow_branch_path() {
    assert_eq!(run(&["demo", "--branch", "taken"]).status.code(), Some(1));
    assert_eq!(run(&["demo", "--branch", "not-taken"]).status.code(), Some(0));
}

#[test]
fn exhausted_script_is_a_harness_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let scenario = create_temp_file(
        temp_dir.path(),
        "short.json",
        r#"{ "settle_spins": 0, "transactions": [{ "idle": 3 }] }"#,
    );

    let output = run(&["run", scenario.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("requester script exhausted after 3 sampled cycles"),
        "{stderr}"
    );
}

#[test]
fn malformed_scenario_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let scenario = create_temp_file(temp_dir.path(), "bad.json", "{ \"rom\": [");

    let output = run(&["run", scenario.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not parse scenario"), "{stderr}");
}

#[test]
fn missing_scenario_file_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("absent.json");

    let output = run(&["run", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not read scenario"), "{stderr}");
}
