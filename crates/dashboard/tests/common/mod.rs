//! Shared helpers for dashboard integration tests.
//!
//! # Invariants
//! - Every dashboard gets its own temporary state file
//! - Backends are scripted `FakeBackend`s; nothing touches the network

use chrono::{DateTime, TimeZone, Utc};
use sentinel_config::KvStore;
use std::sync::Arc;
use tempfile::TempDir;

#[allow(unused_imports)]
pub use sentinel_dashboard::testing::{FakeBackend, RecordingSessionHandler, Reply, result_with};
#[allow(unused_imports)]
pub use sentinel_dashboard::{
    Action, Dashboard, DashboardEvent, DashboardOptions, FetchKind, SchedulerState,
};

pub type TestDashboard = Dashboard<FakeBackend, RecordingSessionHandler>;

/// Dashboard plus the handles a test needs to inspect it.
pub struct Harness {
    pub dashboard: TestDashboard,
    pub backend: Arc<FakeBackend>,
    pub session: Arc<RecordingSessionHandler>,
    _dir: TempDir,
}

#[allow(dead_code)]
pub fn harness(options: DashboardOptions) -> Harness {
    let dir = TempDir::new().expect("temp dir");
    let store = KvStore::open(dir.path().join("state.json")).expect("open store");
    let backend = Arc::new(FakeBackend::new());
    let session = Arc::new(RecordingSessionHandler::default());
    let dashboard = Dashboard::new(
        Arc::clone(&backend),
        Arc::clone(&session),
        sentinel_dashboard::SavedSearchStore::open(store),
        options,
    );
    Harness {
        dashboard,
        backend,
        session,
        _dir: dir,
    }
}

/// Midnight UTC on the given day of January 2024.
#[allow(dead_code)]
pub fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

/// Let spawned tasks run (and register their timers) without moving the clock.
#[allow(dead_code)]
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
