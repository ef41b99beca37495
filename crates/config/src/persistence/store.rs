//! JSON-file backed key-value store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::create_corrupt_backup;

/// Errors from reading or writing the state file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access state file at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A small durable key-value store holding one JSON blob per key.
///
/// The whole map is kept in memory and rewritten on every `set`/`remove`.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl KvStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store. An unparseable file is backed up
    /// and replaced by an empty store.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    match create_corrupt_backup(&path) {
                        Ok(backup_path) => tracing::warn!(
                            path = %path.display(),
                            backup_path = %backup_path.display(),
                            error = %e,
                            "State file is corrupt, backed up and using defaults"
                        ),
                        Err(backup_err) => tracing::error!(
                            path = %path.display(),
                            error = %e,
                            backup_error = %backup_err,
                            "State file is corrupt and backup failed, using defaults"
                        ),
                    }
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and deserialize the blob stored under `key`.
    ///
    /// Returns `None` when the key is absent or its blob does not match `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value is unreadable, using default");
                None
            }
        }
    }

    /// Like [`get`](Self::get) but falls back to `T::default()`.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key).unwrap_or_default()
    }

    /// Whether a blob exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Serialize `value` under `key` and write the store to disk.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.entries.insert(key.to_string(), value);
        self.atomic_save()
    }

    /// Remove the blob under `key` and write the store to disk.
    pub fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.atomic_save()?;
        }
        Ok(())
    }

    fn atomic_save(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StoreError::Serialize {
                key: "<root>".to_string(),
                source,
            }
        })?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, content).map_err(io_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), "State saved atomically");
        Ok(())
    }
}
