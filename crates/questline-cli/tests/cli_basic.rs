//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and verify exit codes and output shape.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "questline-cli", "--"])
        .args(args)
        .env("QUESTLINE_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_challenge_status() {
    let (stdout, _, code) = run_cli(&["challenge", "status"]);
    assert_eq!(code, 0, "challenge status failed");
    let snapshot: serde_json::Value =
        serde_json::from_str(&stdout).expect("status output is not JSON");
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert!(snapshot["level"].as_u64().unwrap() >= 1);
}

#[test]
fn test_complete_with_nothing_active_is_noop() {
    let (_, _, reset_code) = run_cli(&["challenge", "reset"]);
    assert_eq!(reset_code, 0, "challenge reset failed");

    let (stdout, _, code) = run_cli(&["challenge", "complete"]);
    assert_eq!(code, 0, "challenge complete failed");
    let value: serde_json::Value =
        serde_json::from_str(&stdout).expect("complete output is not JSON");
    // Nothing was active, so the unchanged snapshot is printed.
    assert_eq!(value["type"], "StateSnapshot");
}

#[test]
fn test_catalog_list_json() {
    let (stdout, _, code) = run_cli(&["catalog", "list", "--json"]);
    assert_eq!(code, 0, "catalog list failed");
    let templates: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let templates = templates.as_array().unwrap();
    assert!(!templates.is_empty());
    for template in templates {
        assert!(template["amount"].as_u64().is_some());
        assert!(template["description"].as_str().is_some());
    }
}

#[test]
fn test_config_get() {
    let (stdout, _, code) = run_cli(&["config", "get", "notifications.enabled"]);
    assert_eq!(code, 0, "config get failed");
    let value = stdout.trim();
    assert!(value == "true" || value == "false");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_stats_show() {
    let (stdout, _, code) = run_cli(&["stats", "show"]);
    assert_eq!(code, 0, "stats show failed");
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(stats["total_completions"].as_u64().is_some());
}
