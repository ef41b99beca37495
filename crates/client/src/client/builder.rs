//! Client builder for constructing [`SentinelClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, TLS verification)
//!
//! # Invariants
//! - `base_url` is required and must be an absolute http(s) URL
//! - Authentication is optional; without it only unauthenticated calls succeed
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning

use std::time::Duration;

use crate::auth::{AuthStrategy, SessionManager};
use crate::client::SentinelClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use sentinel_config::{
    AuthStrategy as ConfigAuthStrategy, Config, ConnectionConfig,
    constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS},
};

/// Builder for creating a new [`SentinelClient`].
pub struct SentinelClientBuilder {
    base_url: Option<String>,
    auth_strategy: Option<AuthStrategy>,
    skip_verify: bool,
    timeout: Duration,
    max_retries: usize,
    metrics: Option<MetricsCollector>,
}

impl Default for SentinelClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_strategy: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            metrics: None,
        }
    }
}

impl SentinelClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL including scheme and port, e.g. `http://localhost:8000`.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = Some(strategy);
        self
    }

    /// Skip TLS certificate verification. Development use only.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Per-request timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retries for 429/502/503/504 responses. Default is 3 (1s, 2s, 4s backoff).
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Apply connection settings without authentication.
    pub fn from_connection(mut self, connection: &ConnectionConfig) -> Self {
        self.base_url = Some(connection.base_url.clone());
        self.skip_verify = connection.skip_verify;
        self.timeout = connection.timeout;
        self.max_retries = connection.max_retries;
        self
    }

    /// Apply connection and auth settings from the loaded configuration.
    pub fn from_config(self, config: &Config) -> Self {
        let auth_strategy = match &config.auth.strategy {
            ConfigAuthStrategy::Credentials { username, password } => AuthStrategy::Credentials {
                username: username.clone(),
                password: password.clone(),
            },
            ConfigAuthStrategy::Token { token } => AuthStrategy::Token {
                token: token.clone(),
            },
        };
        self.from_connection(&config.connection)
            .auth_strategy(auth_strategy)
    }

    /// Build the client.
    ///
    /// # Errors
    /// - `ClientError::InvalidUrl` if the base URL is missing or not absolute http(s)
    /// - `ClientError::Network` if the HTTP client cannot be constructed
    pub fn build(self) -> Result<SentinelClient> {
        let raw_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = normalize_base_url(&raw_url)?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            if base_url.starts_with("https://") {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    base_url = %base_url,
                    "skip_verify has no effect on plain HTTP connections"
                );
            }
        }

        let http = http_builder.build().map_err(ClientError::Network)?;

        Ok(SentinelClient {
            http,
            base_url,
            session_manager: self.auth_strategy.map(SessionManager::new),
            max_retries: self.max_retries,
            metrics: self.metrics,
            login_lock: tokio::sync::Mutex::new(()),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientError::InvalidUrl(format!(
            "expected an absolute http(s) URL, got '{raw}'"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_from_config_maps_credentials() {
        let config = Config::with_credentials(
            "http://logs.internal:8000".to_string(),
            "analyst".to_string(),
            SecretString::new("pw".to_string().into()),
        );
        let client = SentinelClient::builder()
            .from_config(&config)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://logs.internal:8000");
        assert!(!client.is_static_token_auth());
        assert_eq!(client.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_skip_verify_with_http_url_still_builds() {
        let client = SentinelClient::builder()
            .base_url("http://localhost:8000".to_string())
            .skip_verify(true)
            .build();
        assert!(client.is_ok());
    }
}
