//! Configuration management for the Sentinel log dashboard.
//!
//! This crate provides types and loaders for the API connection settings,
//! the user-facing `SystemSettings`, and the key-value blob store that
//! persists settings and saved searches between runs.

pub mod constants;
mod loader;
pub mod persistence;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use persistence::{KvStore, StoreError, default_state_path};
pub use types::{
    AuthConfig, AuthStrategy, Config, ConnectionConfig, SettingsError, SystemSettings, Theme,
};
