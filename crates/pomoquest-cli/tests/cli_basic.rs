//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomoquest-cli"))
        .args(args)
        .env("POMOQUEST_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn status(data_dir: &Path) -> serde_json::Value {
    let (stdout, _, code) = run_cli(data_dir, &["status"]);
    assert_eq!(code, 0, "status failed");
    serde_json::from_str(&stdout).expect("status is JSON")
}

#[test]
fn test_fresh_status() {
    let dir = tempfile::tempdir().unwrap();
    let json = status(dir.path());
    assert_eq!(json["snapshot"]["screen"], "menu");
    assert_eq!(json["level"]["level"], 1);
    assert_eq!(json["coins"], 0);
}

#[test]
fn test_task_done_rewards_once() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["task", "add", "Sharpen the axe"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Task created: 0"));

    let (stdout, _, code) = run_cli(dir.path(), &["task", "done", "0"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("TaskRewarded"));

    // Uncheck and check again: no second payout.
    run_cli(dir.path(), &["task", "done", "0"]);
    let (stdout, _, _) = run_cli(dir.path(), &["task", "done", "0"]);
    assert_eq!(stdout.trim(), "checked");

    let json = status(dir.path());
    assert_eq!(json["lifetime_experience"], 10);
    assert_eq!(json["coins"], 5);
}

#[test]
fn test_task_list_json() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["task", "add", "Gather herbs"]);
    let (stdout, _, code) = run_cli(dir.path(), &["task", "list", "--json"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks[0]["title"], "Gather herbs");
    assert_eq!(tasks[0]["done"], false);
}

#[test]
fn test_empty_task_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "   "]);
    assert_ne!(code, 0);
    assert!(stderr.contains("must not be empty"));
}

#[test]
fn test_shop_declines_without_coins() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["shop", "buy", "10"]);
    assert_ne!(code, 0);
    assert!(stdout.contains("InsufficientFunds"));
    assert!(stderr.contains("Not enough coins."));
}

#[test]
fn test_character_and_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["character", "karl"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(dir.path(), &["state", "show"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["version"], 1);
    assert_eq!(snapshot["screen"], "play");
    assert_eq!(snapshot["characterName"], "Karl");
    assert_eq!(snapshot["hasSession"], true);

    run_cli(dir.path(), &["state", "clear"]);
    let (stdout, _, _) = run_cli(dir.path(), &["state", "show"]);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["screen"], "menu");
    assert_eq!(snapshot["characterName"], serde_json::Value::Null);
    assert_eq!(snapshot["hasSession"], false);
}

#[test]
fn test_unknown_character_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["character", "Merlin"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown character"));
}

#[test]
fn test_play_without_session_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["play", "--phases", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no active session"));
}

#[test]
fn test_play_runs_one_phase() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["character", "Susan"]);
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["play", "--focus", "1", "--tick-ms", "1", "--phases", "1"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Susan: Break begins"));
}

#[test]
fn test_config_set_clamps() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "timer.focus_minutes", "999"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "180");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "timer.focus_minutes"]);
    assert_eq!(stdout.trim(), "180");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_mute_toggles() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, _) = run_cli(dir.path(), &["mute"]);
    assert!(stdout.contains("\"muted\": true"));
    let json = status(dir.path());
    assert_eq!(json["snapshot"]["muted"], true);

    // Ending the session keeps the preference.
    run_cli(dir.path(), &["state", "clear"]);
    let json = status(dir.path());
    assert_eq!(json["snapshot"]["muted"], true);
}
