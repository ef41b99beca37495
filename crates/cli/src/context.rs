//! Per-invocation command context.
//!
//! Responsibilities:
//! - Locate the state file and load the persisted settings.
//! - Build API clients from flags, environment and settings, in that order of precedence.
//! - Derive dashboard options from the settings.
//!
//! Does NOT handle:
//! - CLI argument definitions (see `args` module).
//! - Running commands (see `dispatch` module).
//!
//! Invariants:
//! - Connection details are only resolved when a command needs them, so
//!   offline commands (`settings`, `saved list`) work without an API URL or credentials.

use anyhow::{Context, Result};
use sentinel_client::{MetricsCollector, SentinelClient};
use sentinel_config::{ConfigLoader, KvStore, SystemSettings, default_state_path};
use sentinel_dashboard::{DashboardOptions, SavedSearchStore};
use std::path::PathBuf;
use std::time::Duration;

use crate::args::ConnectionArgs;

pub(crate) struct CommandContext {
    connection: ConnectionArgs,
    state_path: PathBuf,
    settings: SystemSettings,
    metrics: bool,
}

impl CommandContext {
    /// Resolve the state file and read the settings stored in it.
    pub(crate) fn load(connection: ConnectionArgs, metrics: bool) -> Result<Self> {
        let state_path = match connection.config_path.clone() {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => default_state_path()?,
        };
        let store = KvStore::open(state_path.clone())?;
        let settings = SystemSettings::load(&store);

        Ok(Self {
            connection,
            state_path,
            settings,
            metrics,
        })
    }

    pub(crate) fn settings(&self) -> &SystemSettings {
        &self.settings
    }

    /// Open the state file for reading and writing.
    pub(crate) fn open_store(&self) -> Result<KvStore> {
        KvStore::open(self.state_path.clone())
            .with_context(|| format!("Failed to open {}", self.state_path.display()))
    }

    pub(crate) fn saved_searches(&self) -> Result<SavedSearchStore> {
        Ok(SavedSearchStore::open(self.open_store()?))
    }

    /// Options for a one-shot dashboard: live refresh off.
    pub(crate) fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            live: false,
            ..DashboardOptions::from_settings(&self.settings)
        }
    }

    /// Client with authentication. Fails when no credentials are configured.
    pub(crate) fn client(&self) -> Result<SentinelClient> {
        let config = self.loader()?.build()?;
        let client = self
            .client_builder()
            .from_config(&config)
            .build()
            .context("Failed to build API client")?;
        Ok(client)
    }

    /// Client without authentication, for endpoints that do not need it.
    pub(crate) fn anonymous_client(&self) -> Result<SentinelClient> {
        let connection = self.loader()?.build_connection()?;
        let client = self
            .client_builder()
            .from_connection(&connection)
            .build()
            .context("Failed to build API client")?;
        Ok(client)
    }

    fn client_builder(&self) -> sentinel_client::SentinelClientBuilder {
        let builder = SentinelClient::builder();
        if self.metrics {
            builder.metrics(MetricsCollector::new())
        } else {
            builder
        }
    }

    /// Settings endpoint < environment < flags.
    fn loader(&self) -> Result<ConfigLoader> {
        let args = &self.connection;
        let mut loader = ConfigLoader::new()
            .with_settings(&self.settings)
            .from_env()?;

        if let Some(ref url) = args.api_url {
            loader = loader.with_base_url(url.clone());
        }
        if let Some(ref username) = args.username {
            loader = loader.with_username(username.clone());
        }
        if let Some(ref password) = args.password {
            loader = loader.with_password(password.clone());
        }
        if let Some(ref token) = args.api_token {
            loader = loader.with_api_token(token.clone());
        }
        if let Some(secs) = args.timeout {
            loader = loader.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = args.max_retries {
            loader = loader.with_max_retries(retries);
        }
        if args.skip_verify {
            loader = loader.with_skip_verify(true);
        }
        Ok(loader)
    }
}
