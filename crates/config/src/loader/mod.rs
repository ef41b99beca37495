//! Configuration loader for environment variables and persisted settings.
//!
//! Responsibilities:
//! - Load configuration from `.env` files, environment variables, and persisted settings.
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Enforce the `DOTENV_DISABLED` gate so tests never pick up a stray `.env`.
//!
//! Does NOT handle:
//! - Persisting configuration changes back to disk (see `persistence`).
//! - Performing the login exchange (see the client crate).
//!
//! Invariants / Assumptions:
//! - Builder setters take precedence over environment variables.
//! - Environment variables take precedence over the persisted `api_endpoint`.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod env;
mod error;

pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;
