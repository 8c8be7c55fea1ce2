//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and
//! check its JSON output.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pantry-cli"))
        .args(args)
        .env("PANTRY_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

#[test]
fn test_streak_advance() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(
        dir.path(),
        &["streak", "advance", "--last", "2024-06-10", "--current", "5", "--today", "2024-06-11"],
    );
    assert_eq!(out["streak"], 6);
    assert_eq!(out["transition"], "continued");

    let out = run_json(
        dir.path(),
        &["streak", "advance", "--last", "2024-06-10", "--current", "5", "--today", "2024-06-13"],
    );
    assert_eq!(out["streak"], 1);
    assert_eq!(out["transition"], "reset");
}

#[test]
fn test_badges_evaluate() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(
        dir.path(),
        &["badges", "evaluate", "--photos", "10", "--streak", "7", "--earned", "cook_first"],
    );
    assert_eq!(
        out["newlyUnlocked"],
        serde_json::json!(["meal_10", "streak_3", "streak_7"])
    );
    assert_eq!(out["updatedBadges"]["cook_first"], true);
}

#[test]
fn test_badges_catalogue() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["badges", "catalogue"]);
    let entries = out.as_array().unwrap();
    assert_eq!(entries.len(), 9);
    assert_eq!(entries[0]["id"], "cook_first");
    assert_eq!(entries[0]["threshold"], 1);
}

#[test]
fn test_profile_meal_and_journal_flow() {
    let dir = tempfile::tempdir().unwrap();
    let profile = run_json(dir.path(), &["profile", "create", "ada", "--name", "Ada"]);
    assert_eq!(profile["userId"], "ada");
    assert_eq!(profile["photoCount"], 0);

    let meal = run_json(dir.path(), &["meal", "log", "ada", "Pancakes"]);
    assert_eq!(meal["counters"]["photoCount"], 1);
    assert_eq!(meal["newlyUnlocked"], serde_json::json!(["cook_first"]));

    let entry = run_json(
        dir.path(),
        &["journal", "save", "ada", "First entry", "--date", "2024-06-10"],
    );
    assert_eq!(entry["counters"]["streakCount"], 1);
    assert_eq!(entry["transition"], "started");

    let shown = run_json(dir.path(), &["profile", "show", "ada"]);
    assert_eq!(shown["journalCount"], 1);
    assert_eq!(shown["badges"]["cook_first"], true);

    let meals = run_json(dir.path(), &["meal", "list", "ada"]);
    assert_eq!(meals.as_array().unwrap().len(), 1);
}

#[test]
fn test_duplicate_profile_fails() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["profile", "create", "bo"]);
    let (code, _, stderr) = run_cli(dir.path(), &["profile", "create", "bo"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_goal_set_and_check() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["profile", "create", "cy"]);

    let check = run_json(dir.path(), &["goal", "check", "cy", "--at", "2024-06-12T09:00:00"]);
    assert_eq!(check["requiresGoalSetting"], true);

    let update = run_json(dir.path(), &["goal", "set", "cy", "4", "--at", "2024-06-12T09:00:00"]);
    assert_eq!(update["weeklyGoal"], 4);
    assert_eq!(update["streakStartDate"], "2024-06-09");

    let check = run_json(dir.path(), &["goal", "check", "cy", "--at", "2024-06-15T23:59:59"]);
    assert_eq!(check["requiresGoalSetting"], false);
    let check = run_json(dir.path(), &["goal", "check", "cy", "--at", "2024-06-16T00:00:00"]);
    assert_eq!(check["requiresGoalSetting"], true);

    let progress = run_json(dir.path(), &["goal", "progress", "cy", "--at", "2024-06-13T12:00:00"]);
    assert_eq!(progress["view"], "progress");
    assert_eq!(progress["remaining"], 4);
}

#[test]
fn test_goal_below_minimum_fails() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["profile", "create", "di"]);
    let (code, _, stderr) = run_cli(dir.path(), &["goal", "set", "di", "2"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("at least 3"), "unexpected stderr: {stderr}");

    let check = run_json(dir.path(), &["goal", "check", "di"]);
    assert_eq!(check["requiresGoalSetting"], true);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "goals.min_weekly_goal"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "goals.min_weekly_goal", "5"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "goals.min_weekly_goal"]);
    assert_eq!(stdout.trim(), "5");

    // The new minimum applies to goal submission
    run_json(dir.path(), &["profile", "create", "ed"]);
    let (code, _, _) = run_cli(dir.path(), &["goal", "set", "ed", "4"]);
    assert_eq!(code, 1);

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "goals.min_weekly_goal", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("must be at least 3"), "unexpected stderr: {stderr}");
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "goals.min_weekly_goal"]);
    assert_eq!(stdout.trim(), "5");

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "goals.nope"]);
    assert_eq!(code, 1);
}
