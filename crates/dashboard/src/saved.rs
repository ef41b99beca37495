//! Saved-search store.
//!
//! Responsibilities:
//! - Keep named snapshots of search parameters under the `savedSearches` key.
//! - Persist the whole list on every mutation.
//!
//! Invariants:
//! - `id` is the only identity; names may repeat.
//! - Ids are derived from the creation time in milliseconds and bumped on
//!   collision, so they stay unique within one store.

use chrono::{DateTime, Utc};
use sentinel_client::SearchQuery;
use sentinel_config::constants::SAVED_SEARCHES_KEY;
use sentinel_config::{KvStore, StoreError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DashboardError, ValidationError};

/// A named, reusable set of search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub params: SearchQuery,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Saved searches backed by a [`KvStore`].
#[derive(Debug)]
pub struct SavedSearchStore {
    store: KvStore,
    searches: Vec<SavedSearch>,
}

impl SavedSearchStore {
    /// Load the saved list from `store`. A missing or unreadable blob is an empty list.
    pub fn open(store: KvStore) -> Self {
        let searches: Vec<SavedSearch> = store.get_or_default(SAVED_SEARCHES_KEY);
        debug!(count = searches.len(), "Loaded saved searches");
        Self { store, searches }
    }

    pub fn list(&self) -> &[SavedSearch] {
        &self.searches
    }

    pub fn get(&self, id: &str) -> Option<&SavedSearch> {
        self.searches.iter().find(|s| s.id == id)
    }

    /// Save `params` under `name`.
    ///
    /// # Errors
    /// - `ValidationError::EmptyName` if `name` is blank; nothing is written.
    /// - `DashboardError::Store` if the list cannot be persisted.
    pub fn save(
        &mut self,
        name: &str,
        description: Option<&str>,
        params: SearchQuery,
    ) -> Result<SavedSearch, DashboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let now = Utc::now();
        let saved = SavedSearch {
            id: self.next_id(now),
            name: name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            params,
            created_at: now,
            updated_at: now,
        };

        self.searches.push(saved.clone());
        if let Err(e) = self.persist() {
            self.searches.pop();
            return Err(e.into());
        }
        debug!(id = %saved.id, name = %saved.name, "Saved search");
        Ok(saved)
    }

    /// Delete by id. Returns whether an entry was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.searches.len();
        self.searches.retain(|s| s.id != id);
        if self.searches.len() == before {
            return Ok(false);
        }
        self.persist()?;
        debug!(id, "Deleted saved search");
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.store.set(SAVED_SEARCHES_KEY, &self.searches)
    }

    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis();
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}
