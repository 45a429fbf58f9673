//! Integration tests for the CLI binary.
//!
//! This test is registered as a [[test]] in the ztidentity-cli crate
//! so that CARGO_BIN_EXE_ztid is available.

use std::process::Command;

const KNOWN_SECRET: &str = include_str!("../../crates/ztidentity/testdata/identity.secret");

/// Get a Command pointing to the `ztid` binary.
fn ztid_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ztid"))
}

fn run(args: &[&str]) -> std::process::Output {
    ztid_binary()
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute ztid {args:?}: {e}"))
}

fn known_address() -> &'static str {
    &KNOWN_SECRET[..10]
}

#[test]
fn cli_responds_to_help() {
    let output = run(&["--help"]);
    assert!(
        output.status.success(),
        "ztid --help should exit with success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("ztid") || stdout.contains("Usage"),
        "ztid --help output should contain usage information, got: {stdout}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("0.1") || stdout.contains("ztid"),
        "ztid --version should contain version info, got: {stdout}"
    );
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = run(&["--nonexistent-flag"]);
    assert!(!output.status.success());
}

#[test]
fn cli_hash_matches_golden_vector() {
    let zeros = "0".repeat(128);
    let output = run(&["hash", &zeros]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "2c84e95af27f206aed3c14eb32a6deaf044e89250fd4694c91702c7354ef0373\
         061180240aa50353ec0eeda6a892d4832a21e6aab95566cce72084e59ff4da43"
    );
}

#[test]
fn cli_hash_rejects_short_input() {
    let output = run(&["hash", "abcd"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
}

#[test]
fn cli_inspect_known_identity() {
    let output = run(&["inspect", KNOWN_SECRET.trim()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(known_address()));
    assert!(stdout.contains("Private key:   present"));
}

#[test]
fn cli_validate_known_identity() {
    let output = run(&["validate", KNOWN_SECRET.trim()]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("valid"));
}

#[test]
fn cli_validate_rejects_forged_address() {
    let public = KNOWN_SECRET.trim().rsplit_once(':').unwrap().0;
    let claimed = u64::from_str_radix(known_address(), 16).unwrap() ^ 0x01;
    let forged = format!("{claimed:010x}{}", &public[10..]);

    let output = run(&["validate", &forged]);
    assert!(!output.status.success());
}

#[test]
fn cli_generate_prints_secret() {
    let output = run(&["generate"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.trim();
    let fields: Vec<&str> = line.split(':').collect();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].len(), 10);
    assert_eq!(fields[1], "0");
    assert_eq!(fields[2].len(), 128);
    assert_eq!(fields[3].len(), 128);
}

#[test]
fn cli_generate_json() {
    let output = run(&["generate", "--json", "--count", "2", "--jobs", "2"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect();
    assert_eq!(records.len(), 2);
    for record in records {
        let id = record["id"].as_str().unwrap();
        let public = record["public_key"].as_str().unwrap();
        let private = record["private_key"].as_str().unwrap();
        assert!(public.starts_with(id));
        assert!(private.starts_with(public));
    }
}

#[test]
fn cli_generate_to_directory_then_validate() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("node");
    let target_str = target.to_str().unwrap();

    let output = run(&["generate", "--out", target_str]);
    assert!(output.status.success());
    assert!(target.join("identity.public").exists());
    assert!(target.join("identity.secret").exists());

    let output = run(&["validate", target_str]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // A second generate into the same directory must not clobber it.
    let output = run(&["generate", "--out", target_str]);
    assert!(!output.status.success());
}

#[test]
fn cli_generate_rejects_json_with_out() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("node");

    let output = run(&["generate", "--json", "--out", target.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!target.exists(), "nothing should be written");
}

#[test]
fn cli_generate_leaves_occupied_directory_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let stale = dir.path().join("identity.public");
    std::fs::write(&stale, "stale\n").unwrap();

    let output = run(&["generate", "--out", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(std::fs::read_to_string(&stale).unwrap(), "stale\n");
    assert!(!dir.path().join("identity.secret").exists());
}
