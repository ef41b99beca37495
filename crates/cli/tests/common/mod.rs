//! Shared test utilities for sentinel-cli integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Keep settings and saved searches in a per-test state file.
//!
//! Invariants / Assumptions:
//! - `SENTINEL_API_TOKEN` is set to "test-token" unless overridden.
//! - Nothing is read from or written to the user's real state file.

use assert_cmd::Command;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns a hermetic `sentinel-cli` command whose state lives in `state`.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `SENTINEL_API_TOKEN` is set to a dummy value to satisfy config validation.
/// - Other connection env vars are cleared to ensure no leakage from the host.
pub fn sentinel_cmd(state: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sentinel-cli");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("SENTINEL_API_TOKEN", "test-token");
    cmd.env("SENTINEL_CONFIG_PATH", state);

    cmd.env_remove("SENTINEL_API_URL")
        .env_remove("SENTINEL_USERNAME")
        .env_remove("SENTINEL_PASSWORD")
        .env_remove("SENTINEL_TIMEOUT")
        .env_remove("SENTINEL_MAX_RETRIES")
        .env_remove("SENTINEL_SKIP_VERIFY")
        .env_remove("SENTINEL_METRICS_BIND")
        .env_remove("RUST_LOG");

    cmd
}

/// `sentinel_cmd` pointed at a mock server.
#[allow(dead_code)]
pub fn sentinel_cmd_with_api_url(state: &Path, api_url: &str) -> Command {
    let mut cmd = sentinel_cmd(state);
    cmd.env("SENTINEL_API_URL", api_url);
    cmd
}

/// Temp dir plus the state file path inside it.
#[allow(dead_code)]
pub fn state_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("state.json");
    (dir, path)
}

/// Paginated search response with one entry per `(host, severity)` pair.
#[allow(dead_code)]
pub fn search_body(total: u64, entries: &[(&str, &str)]) -> Value {
    let logs: Vec<Value> = entries
        .iter()
        .enumerate()
        .map(|(i, (host, severity))| {
            json!({
                "timestamp": format!("2024-01-02T03:04:0{i}Z"),
                "hostname": host,
                "facility": 1,
                "facility_name": "user",
                "severity": 3,
                "severity_name": severity,
                "message": format!("message {i}"),
                "app_name": "sshd",
                "has_threat_indicators": false
            })
        })
        .collect();
    json!({
        "total": total,
        "page": 1,
        "page_size": 50,
        "total_pages": 1,
        "logs": logs
    })
}
