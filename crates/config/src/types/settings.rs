//! User-facing system settings.
//!
//! Responsibilities:
//! - Define `SystemSettings` (API endpoint, page size, refresh interval, theme).
//! - Load settings from and persist them to the key-value store.
//!
//! Does NOT handle:
//! - Rendering the theme (presentation layer).
//! - File I/O details (see `persistence::KvStore`).
//!
//! Invariants:
//! - Settings are stored as a single blob under `SETTINGS_KEY`.
//! - A missing or unreadable blob yields `SystemSettings::default()`.
//! - Every mutation through `persist`/`reset` is written immediately.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    ALLOWED_PAGE_SIZES, DEFAULT_API_URL, DEFAULT_LIVE_END_MARGIN_SECS, DEFAULT_PAGE_SIZE,
    DEFAULT_REFRESH_INTERVAL_SECS, SETTINGS_KEY,
};
use crate::loader::ConfigError;
use crate::persistence::{KvStore, StoreError};

/// Dashboard color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ConfigError::InvalidValue {
                var: "theme".to_string(),
                message: format!("expected light or dark, got {other}"),
            }),
        }
    }
}

/// System settings that persist across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    /// Base URL of the search API.
    pub api_endpoint: String,
    /// Live refresh interval in seconds (0 = off).
    pub refresh_interval: u64,
    /// Default page size for log lists.
    pub logs_per_page: u32,
    /// Selected color theme.
    pub theme: Theme,
    /// Whether "new entries" notices are shown.
    pub enable_notifications: bool,
    /// Whether live refresh starts armed.
    pub enable_auto_refresh: bool,
    /// Margin added past "now" to the live window's end bound, in seconds.
    pub live_end_margin_secs: u64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
            logs_per_page: DEFAULT_PAGE_SIZE,
            theme: Theme::Dark,
            enable_notifications: true,
            enable_auto_refresh: true,
            live_end_margin_secs: DEFAULT_LIVE_END_MARGIN_SECS,
        }
    }
}

impl SystemSettings {
    /// Load settings from the store, falling back to defaults.
    pub fn load(store: &KvStore) -> Self {
        store.get_or_default(SETTINGS_KEY)
    }

    /// Validate and write settings to the store.
    pub fn persist(&self, store: &mut KvStore) -> Result<(), SettingsError> {
        self.validate()?;
        store.set(SETTINGS_KEY, self)?;
        Ok(())
    }

    /// Restore defaults and persist them.
    pub fn reset(store: &mut KvStore) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        defaults.persist(store)?;
        Ok(defaults)
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ALLOWED_PAGE_SIZES.contains(&self.logs_per_page) {
            return Err(ConfigError::InvalidValue {
                var: "logs_per_page".to_string(),
                message: format!(
                    "must be one of {:?} (got {})",
                    ALLOWED_PAGE_SIZES, self.logs_per_page
                ),
            });
        }
        if self.api_endpoint.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(())
    }

    /// Live refresh interval, or `None` when refresh is off.
    pub fn refresh_period(&self) -> Option<Duration> {
        (self.enable_auto_refresh && self.refresh_interval > 0)
            .then(|| Duration::from_secs(self.refresh_interval))
    }

    /// Margin applied past "now" to live windows.
    pub fn live_end_margin(&self) -> Duration {
        Duration::from_secs(self.live_end_margin_secs)
    }
}

/// Errors from persisting settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Invalid(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
