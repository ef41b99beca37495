//! Durable key-value storage for settings and saved searches.
//!
//! Responsibilities:
//! - Resolve the state file location (env override or platform config dir).
//! - Read and write JSON blobs under string keys (`KvStore`).
//! - Back up corrupt state files before they are overwritten.
//!
//! Does NOT handle:
//! - Loading environment variables (see `loader`).
//! - The shape of individual blobs (see `types::settings` and the dashboard crate).
//!
//! Invariants:
//! - Writes are atomic (temp file + rename).
//! - A corrupt file never blocks startup; it is moved aside and an empty store is used.
//! - A blob that fails to deserialize falls back to its default without touching other keys.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

mod path;
mod store;

pub use path::default_state_path;
pub use store::{KvStore, StoreError};

/// Move an unreadable state file to `<stem>.corrupt.<unix-secs>` next to it.
pub(crate) fn create_corrupt_backup(path: &Path) -> std::io::Result<PathBuf> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let backup = path.with_extension(format!("corrupt.{secs}"));
    std::fs::rename(path, &backup).map(|()| backup)
}
