//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a dev data directory and
//! verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "mindfocus-cli", "--"])
        .args(args)
        .env("MINDFOCUS_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_timer_status() {
    let output = run_cli(&["timer", "status"]);
    assert_eq!(output.2, 0, "Timer status failed: {}", output.1);
    let parsed: serde_json::Value = serde_json::from_str(&output.0).unwrap();
    assert!(parsed.get("mode").is_some());
    assert!(parsed.get("remaining_secs").is_some());
}

#[test]
fn test_timer_reset() {
    let output = run_cli(&["timer", "reset"]);
    assert_eq!(output.2, 0, "Timer reset failed: {}", output.1);
    assert!(output.0.contains("TimerReset"));
}

#[test]
fn test_timer_settings_show() {
    let output = run_cli(&["timer", "settings"]);
    assert_eq!(output.2, 0, "Timer settings failed: {}", output.1);
    let parsed: serde_json::Value = serde_json::from_str(&output.0).unwrap();
    assert!(parsed.get("focus_min").is_some());
}

#[test]
fn test_timer_mode_rejects_unknown() {
    let output = run_cli(&["timer", "mode", "nap"]);
    assert_ne!(output.2, 0);
    assert!(output.1.contains("unknown timer mode"));
}

#[test]
fn test_task_add_and_list_json() {
    let output = run_cli(&["task", "add", "E2E Task", "--category", "study"]);
    assert_eq!(output.2, 0, "Task add failed: {}", output.1);

    let list = run_cli(&["task", "list", "--json"]);
    assert_eq!(list.2, 0, "Task list failed: {}", list.1);
    let parsed: serde_json::Value = serde_json::from_str(&list.0).unwrap();
    let tasks = parsed.as_array().unwrap();
    assert!(tasks.iter().any(|t| t["title"] == "E2E Task"));
}

#[test]
fn test_task_add_rejects_empty_title() {
    let output = run_cli(&["task", "add", "   "]);
    assert_ne!(output.2, 0);
}

#[test]
fn test_task_select_unknown_id_fails() {
    let output = run_cli(&["task", "select", "no-such-id"]);
    assert_ne!(output.2, 0);
    assert!(output.1.contains("No task"));
}

#[test]
fn test_stats_today() {
    let output = run_cli(&["stats", "today"]);
    assert_eq!(output.2, 0, "Stats today failed: {}", output.1);
    let parsed: serde_json::Value = serde_json::from_str(&output.0).unwrap();
    assert!(parsed.get("sessions").is_some());
}

#[test]
fn test_stats_all() {
    let output = run_cli(&["stats", "all"]);
    assert_eq!(output.2, 0, "Stats all failed: {}", output.1);
}

#[test]
fn test_achievements_list() {
    let output = run_cli(&["achievements", "list", "--json"]);
    assert_eq!(output.2, 0, "Achievements list failed: {}", output.1);
    let parsed: serde_json::Value = serde_json::from_str(&output.0).unwrap();
    assert!(!parsed.as_array().unwrap().is_empty());
}

#[test]
fn test_stress_sample_fixed_score() {
    let output = run_cli(&["stress", "sample", "--score", "45", "--count", "3", "--no-forward"]);
    assert_eq!(output.2, 0, "Stress sample failed: {}", output.1);
    assert!(output.0.contains("\"level\": \"medium\""));
}

#[test]
fn test_stress_patterns() {
    let output = run_cli(&["stress", "patterns"]);
    assert_eq!(output.2, 0, "Stress patterns failed: {}", output.1);
    assert!(output.0.contains("box"));
}

#[test]
fn test_stress_breathe_no_wait() {
    let output = run_cli(&["stress", "breathe", "--cycles", "1", "--no-wait"]);
    assert_eq!(output.2, 0, "Breathe failed: {}", output.1);
    assert!(output.0.contains("done"));
}

#[test]
fn test_config_get_set_roundtrip() {
    let set = run_cli(&["config", "set", "goals.daily_goal", "6"]);
    assert_eq!(set.2, 0, "Config set failed: {}", set.1);

    let get = run_cli(&["config", "get", "goals.daily_goal"]);
    assert_eq!(get.2, 0, "Config get failed: {}", get.1);
    assert_eq!(get.0.trim(), "6");

    let _ = run_cli(&["config", "reset"]);
}

#[test]
fn test_config_get_unknown_key_fails() {
    let output = run_cli(&["config", "get", "nope.nothing"]);
    assert_ne!(output.2, 0);
}

#[test]
fn test_config_list() {
    let output = run_cli(&["config", "list"]);
    assert_eq!(output.2, 0, "Config list failed: {}", output.1);
    assert!(output.0.contains("backend.base_url"));
}
