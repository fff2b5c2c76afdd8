//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with JSON fixtures in a temp dir and an
//! explicit `--config` path so the user's config is never touched.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{json, Value};
use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let config = dir.join("config.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_hearth-cli"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let (code, stdout, stderr) = run_cli(dir, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn active_day(date: &str) -> Value {
    json!({
        "user_id": "alice",
        "date": date,
        "tasks_completed": 2,
        "critical_tasks": 0,
        "total_weight": 2.0,
        "was_active_day": true
    })
}

#[test]
fn test_streak_status() {
    let dir = TempDir::new().unwrap();
    let days: Vec<Value> = (1..=5).map(|d| active_day(&format!("2024-03-{d:02}"))).collect();
    let activities = write_json(dir.path(), "activities.json", &Value::Array(days));

    let status = run_json(
        dir.path(),
        &[
            "streak",
            "status",
            "--user",
            "alice",
            "--activities",
            activities.to_str().unwrap(),
            "--today",
            "2024-03-05",
        ],
    );
    assert_eq!(status["current_streak"], 5);
    assert_eq!(status["longest_streak"], 5);
    assert_eq!(status["is_active_today"], true);
    assert_eq!(status["risk_of_break"], false);
}

#[test]
fn test_streak_status_at_risk() {
    let dir = TempDir::new().unwrap();
    let days: Vec<Value> = (1..=3).map(|d| active_day(&format!("2024-03-{d:02}"))).collect();
    let activities = write_json(dir.path(), "activities.json", &Value::Array(days));

    let status = run_json(
        dir.path(),
        &[
            "streak",
            "status",
            "--user",
            "alice",
            "--activities",
            activities.to_str().unwrap(),
            "--today",
            "2024-03-04",
        ],
    );
    assert_eq!(status["current_streak"], 3);
    assert_eq!(status["risk_of_break"], true);
}

#[test]
fn test_streak_milestone() {
    let dir = TempDir::new().unwrap();
    let output = run_json(dir.path(), &["streak", "milestone", "7", "--previous", "6"]);
    assert_eq!(output["milestone"]["reached"], 7);
    assert_eq!(output["milestone"]["next"], 14);
    assert_eq!(output["points"]["milestones_crossed"], json!([7]));
}

#[test]
fn test_joker_allocate_twice_in_a_month() {
    let dir = TempDir::new().unwrap();
    let first = run_json(
        dir.path(),
        &["joker", "allocate", "--user", "alice", "--now", "2024-03-01T08:00:00Z"],
    );
    assert_eq!(first["allocated"], true);
    assert_eq!(first["granted"].as_array().unwrap().len(), 2);

    let inventory = write_json(dir.path(), "inventory.json", &first["inventory"]);
    let second = run_json(
        dir.path(),
        &[
            "joker",
            "allocate",
            "--inventory",
            inventory.to_str().unwrap(),
            "--now",
            "2024-03-20T08:00:00Z",
        ],
    );
    assert_eq!(second["allocated"], false);
    assert_eq!(second["inventory"]["available"].as_array().unwrap().len(), 2);
}

#[test]
fn test_joker_allocate_premium() {
    let dir = TempDir::new().unwrap();
    let output = run_json(
        dir.path(),
        &[
            "joker",
            "allocate",
            "--user",
            "alice",
            "--premium",
            "--now",
            "2024-03-01T08:00:00Z",
        ],
    );
    assert_eq!(output["granted"].as_array().unwrap().len(), 3);
}

#[test]
fn test_joker_allocate_requires_source() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["joker", "allocate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_joker_golden_check() {
    let dir = TempDir::new().unwrap();
    let crossed = run_json(dir.path(), &["joker", "golden", "29", "30"]);
    assert_eq!(crossed["reward"], true);

    let not_crossed = run_json(dir.path(), &["joker", "golden", "30", "31"]);
    assert_eq!(not_crossed["reward"], false);
}

#[test]
fn test_achievements_update_unlocks() {
    let dir = TempDir::new().unwrap();
    let stats = write_json(
        dir.path(),
        "stats.json",
        &json!({
            "tasks_completed": 1,
            "current_streak": 3,
            "longest_streak": 3,
            "days_active": 3
        }),
    );

    let output = run_json(
        dir.path(),
        &[
            "achievements",
            "update",
            "--user",
            "alice",
            "--stats",
            stats.to_str().unwrap(),
            "--now",
            "2024-03-03T20:00:00Z",
        ],
    );
    let unlocked: Vec<&str> = output["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["achievement_id"].as_str().unwrap())
        .collect();
    assert!(unlocked.contains(&"first_task"));
    assert!(unlocked.contains(&"streak_starter"));

    // Replaying the same snapshot awards nothing new.
    let stored = write_json(dir.path(), "achievements.json", &output["achievements"]);
    let replay = run_json(
        dir.path(),
        &[
            "achievements",
            "update",
            "--achievements",
            stored.to_str().unwrap(),
            "--stats",
            stats.to_str().unwrap(),
            "--now",
            "2024-03-04T20:00:00Z",
        ],
    );
    assert!(replay["notifications"].as_array().unwrap().is_empty());
    assert_eq!(replay["achievements"]["total_points"], output["achievements"]["total_points"]);
}

#[test]
fn test_achievements_tier() {
    let dir = TempDir::new().unwrap();
    let output = run_json(dir.path(), &["achievements", "tier", "150"]);
    assert_eq!(output["tier"], "silver");
    assert_eq!(output["next_tier"], "gold");
    assert_eq!(output["points_to_next"], 150);
}

#[test]
fn test_achievements_catalog() {
    let dir = TempDir::new().unwrap();
    let output = run_json(dir.path(), &["achievements", "catalog"]);
    assert_eq!(output.as_array().unwrap().len(), 17);
}

fn member(user_id: &str, name: &str, points: u32, streak: u32, tasks: u32) -> Value {
    json!({
        "user_id": user_id,
        "name": name,
        "total_points": points,
        "current_streak": streak,
        "tasks_completed": tasks
    })
}

fn leaderboard_request(dir: &Path) -> PathBuf {
    write_json(
        dir,
        "request.json",
        &json!({
            "household_id": "home",
            "current_user_id": "bob",
            "members": [
                member("alice", "Alice", 150, 2, 10),
                member("bob", "Bob", 100, 9, 20),
                member("carol", "Carol", 75, 0, 5)
            ]
        }),
    )
}

#[test]
fn test_leaderboard_rank_points() {
    let dir = TempDir::new().unwrap();
    let request = leaderboard_request(dir.path());
    let board = run_json(
        dir.path(),
        &[
            "leaderboard",
            "rank",
            "--request",
            request.to_str().unwrap(),
            "--now",
            "2024-03-06T12:00:00Z",
        ],
    );
    let names: Vec<&str> = board["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    assert_eq!(board["top_performer"], "Alice");
    assert_eq!(board["current_user_rank"], 2);
}

#[test]
fn test_leaderboard_rank_dimension_override() {
    let dir = TempDir::new().unwrap();
    let request = leaderboard_request(dir.path());
    let board = run_json(
        dir.path(),
        &[
            "leaderboard",
            "rank",
            "--request",
            request.to_str().unwrap(),
            "--dimension",
            "streak",
            "--now",
            "2024-03-06T12:00:00Z",
        ],
    );
    assert_eq!(board["dimension"], "streak");
    assert_eq!(board["entries"][0]["user_id"], "bob");
}

#[test]
fn test_leaderboard_rejects_duplicate_member() {
    let dir = TempDir::new().unwrap();
    let request = write_json(
        dir.path(),
        "request.json",
        &json!({
            "household_id": "home",
            "members": [
                { "user_id": "alice", "name": "Alice" },
                { "user_id": "alice", "name": "Alice again" }
            ]
        }),
    );
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["leaderboard", "rank", "--request", request.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_leaderboard_all_time_has_no_previous_period() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["leaderboard", "period", "all_time", "--previous"]);
    assert_eq!(code, 1);

    let (code, _, _) = run_cli(dir.path(), &["leaderboard", "period", "month", "--previous"]);
    assert_eq!(code, 0);
}

#[test]
fn test_day_process() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "input.json",
        &json!({
            "user_id": "alice",
            "now": "2024-03-03T21:00:00Z",
            "activities": [
                active_day("2024-03-01"),
                active_day("2024-03-02"),
                active_day("2024-03-03")
            ],
            "stats": { "tasks_completed": 6 }
        }),
    );

    let outcome = run_json(
        dir.path(),
        &["day", "process", "--input", input.to_str().unwrap()],
    );
    assert_eq!(outcome["status"]["current_streak"], 3);
    assert_eq!(outcome["inventory"]["available"].as_array().unwrap().len(), 2);

    let types: Vec<&str> = outcome["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"jokers_allocated"));
    assert!(types.contains(&"milestone_reached"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) =
        run_cli(dir.path(), &["config", "set", "jokers.monthly_allocation", "4"]);
    assert_eq!(code, 0, "config set failed: {stderr}");

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "jokers.monthly_allocation"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "4");

    let allocation = run_json(
        dir.path(),
        &["joker", "allocate", "--user", "alice", "--now", "2024-03-01T08:00:00Z"],
    );
    assert_eq!(allocation["granted"].as_array().unwrap().len(), 4);
}

#[test]
fn test_config_rejects_invalid_value() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "jokers.max_storable", "0"]);
    assert_eq!(code, 1);

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_reset() {
    let dir = TempDir::new().unwrap();
    let _ = run_cli(dir.path(), &["config", "set", "streak.recovery_window_hours", "24"]);
    let (code, _, _) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);

    let config = run_json(dir.path(), &["config", "show"]);
    assert_eq!(config["jokers"]["monthly_allocation"], 2);
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("hearth-cli"));
}
