//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated HOME so
//! runs cannot interfere with each other or with a real installation.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with its own home directory and return output.
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "chime-cli", "--quiet", "--"])
        .args(args)
        .env("HOME", home)
        .env("CHIME_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn fresh_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp home")
}

#[test]
fn test_status() {
    let home = fresh_home();
    let (stdout, stderr, code) = run_cli(home.path(), &["status"]);
    assert_eq!(code, 0, "status failed: {stderr}");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("status is JSON");
    assert!(parsed["timers"]["pinned"].is_string());
}

#[test]
fn test_alarm_create_and_list() {
    let home = fresh_home();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["alarm", "create", "Test Alarm", "--hour", "9", "--minute", "30"],
    );
    assert_eq!(code, 0, "alarm create failed: {stderr}");
    assert!(stdout.contains("AlarmCreated"));

    let (stdout, _, code) = run_cli(home.path(), &["alarm", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Test Alarm"));
}

#[test]
fn test_alarm_create_rejects_bad_time() {
    let home = fresh_home();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["alarm", "create", "Bad", "--hour", "25", "--minute", "0"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error"));
}

#[test]
fn test_timer_create_start_pause() {
    let home = fresh_home();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["timer", "create", "Test Timer", "--minutes", "5"],
    );
    assert_eq!(code, 0, "timer create failed: {stderr}");
    let event: serde_json::Value = serde_json::from_str(&stdout).expect("event is JSON");
    let id = event["id"].as_str().expect("event has id").to_string();

    let (stdout, _, code) = run_cli(home.path(), &["timer", "start", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("TimerStarted"));

    let (stdout, _, code) = run_cli(home.path(), &["timer", "pause", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("TimerPaused"));
}

#[test]
fn test_timer_list_includes_builtins() {
    let home = fresh_home();
    let (stdout, _, code) = run_cli(home.path(), &["timer", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("builtin-timer-pomodoro"));
}

#[test]
fn test_tick_runs_clean() {
    let home = fresh_home();
    let (_, stderr, code) = run_cli(home.path(), &["tick"]);
    assert_eq!(code, 0, "tick failed: {stderr}");
}

#[test]
fn test_stopwatch_roundtrip() {
    let home = fresh_home();
    let (stdout, _, code) = run_cli(home.path(), &["stopwatch", "start"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("StopwatchStarted"));

    let (stdout, _, code) = run_cli(home.path(), &["stopwatch", "show"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("show is JSON");
    assert_eq!(parsed["is_running"], serde_json::Value::Bool(true));
}

#[test]
fn test_section_create_and_list() {
    let home = fresh_home();
    let (stdout, _, code) = run_cli(home.path(), &["section", "create", "timer", "Kitchen"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SectionCreated"));

    let (stdout, _, code) = run_cli(home.path(), &["section", "list", "timer"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Kitchen"));
}

#[test]
fn test_completions_generate() {
    let home = fresh_home();
    let (stdout, _, code) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("chime"));
}
