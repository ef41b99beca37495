//! Configuration types.
//!
//! Responsibilities:
//! - Re-export connection, auth and settings types from their submodules.
//!
//! Does NOT handle:
//! - Loading from env/files (see `loader`).
//! - Writing to disk (see `persistence`).

mod auth;
mod connection;
mod settings;

pub use auth::{AuthConfig, AuthStrategy};
pub use connection::{Config, ConnectionConfig};
pub use settings::{SettingsError, SystemSettings, Theme};
