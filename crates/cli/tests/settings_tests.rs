//! Integration tests for `sentinel-cli settings`.

mod common;

use common::{sentinel_cmd, state_file};
use predicates::prelude::*;

fn show_json(state: &std::path::Path) -> serde_json::Value {
    let output = sentinel_cmd(state)
        .args(["settings", "show", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_show_defaults_without_state_file() {
    let (_dir, state) = state_file();
    sentinel_cmd(&state)
        .env_remove("SENTINEL_API_TOKEN")
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("refresh_interval\t30"))
        .stdout(predicate::str::contains("logs_per_page\t50"));
    assert!(!state.exists());
}

#[test]
fn test_set_persists_and_reset_restores() {
    let (_dir, state) = state_file();
    sentinel_cmd(&state)
        .args(["settings", "set", "refresh_interval", "15"])
        .assert()
        .success()
        .stdout("Set refresh_interval = 15\n");
    sentinel_cmd(&state)
        .args(["settings", "set", "theme", "light"])
        .assert()
        .success();

    let settings = show_json(&state);
    assert_eq!(settings["refresh_interval"], 15);
    assert_eq!(settings["theme"], "light");

    sentinel_cmd(&state)
        .args(["settings", "reset"])
        .assert()
        .success();
    let settings = show_json(&state);
    assert_eq!(settings["refresh_interval"], 30);
    assert_eq!(settings["theme"], "dark");
}

#[test]
fn test_invalid_values_are_rejected() {
    let (_dir, state) = state_file();
    sentinel_cmd(&state)
        .args(["settings", "set", "logs_per_page", "75"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("logs_per_page"));
    sentinel_cmd(&state)
        .args(["settings", "set", "enable_notifications", "maybe"])
        .assert()
        .code(2);
    sentinel_cmd(&state)
        .args(["settings", "set", "colour", "red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown setting"));

    assert_eq!(show_json(&state)["logs_per_page"], 50);
}
