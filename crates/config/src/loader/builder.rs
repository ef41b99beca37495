//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Collect connection and auth values from setters, env vars, and persisted settings.
//! - Validate ranges and normalize the base URL.
//! - Build the final `Config` (or just `ConnectionConfig` for unauthenticated calls).
//!
//! Invariants / Assumptions:
//! - Call `from_env()` before CLI-derived `with_*` setters so the setters win.
//! - A token takes precedence over username/password when both are present.

use secrecy::SecretString;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, MAX_MAX_RETRIES, MAX_TIMEOUT_SECS};
use crate::types::{AuthConfig, AuthStrategy, Config, ConnectionConfig, SystemSettings};

/// Configuration loader that builds config from environment variables and settings.
#[derive(Default)]
pub struct ConfigLoader {
    base_url: Option<String>,
    settings_base_url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    api_token: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from a `.env` file if present.
    ///
    /// Skipped when `DOTENV_DISABLED` is `true` or `1`. A missing file is not an error.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(dotenvy::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                Ok(self)
            }
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Use the persisted `api_endpoint` as the lowest-priority base URL.
    pub fn with_settings(mut self, settings: &SystemSettings) -> Self {
        self.settings_base_url = Some(settings.api_endpoint.clone());
        self
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub(crate) fn set_base_url(&mut self, url: Option<String>) {
        self.base_url = url;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_api_token(&mut self, token: Option<SecretString>) {
        self.api_token = token;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    /// Build the connection settings only.
    ///
    /// Used for endpoints that do not require authentication (e.g. health).
    pub fn build_connection(&self) -> Result<ConnectionConfig, ConfigError> {
        let raw_url = self
            .base_url
            .as_deref()
            .or(self.settings_base_url.as_deref())
            .ok_or(ConfigError::MissingBaseUrl)?;
        let base_url = validate_and_normalize_base_url(raw_url)?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() || timeout.as_secs() > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "must be between 1 and {} seconds (got {})",
                    MAX_TIMEOUT_SECS,
                    timeout.as_secs()
                ),
            });
        }

        let max_retries = self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_MAX_RETRIES, max_retries
                ),
            });
        }

        Ok(ConnectionConfig {
            base_url,
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout,
            max_retries,
        })
    }

    /// Build the final configuration, requiring authentication.
    pub fn build(self) -> Result<Config, ConfigError> {
        let connection = self.build_connection()?;

        let strategy = if let Some(token) = self.api_token {
            AuthStrategy::Token { token }
        } else if let (Some(username), Some(password)) = (self.username, self.password) {
            AuthStrategy::Credentials { username, password }
        } else {
            return Err(ConfigError::MissingAuth);
        };

        Ok(Config {
            connection,
            auth: AuthConfig { strategy },
        })
    }
}

/// Require an absolute http(s) URL with a host, and strip the trailing slash.
fn validate_and_normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: "base_url".into(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. http://localhost:8000): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: "base_url".into(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: "base_url".into(),
            message: "host is required (e.g. http://localhost:8000)".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_build_with_token() {
        let config = ConfigLoader::new()
            .with_base_url("http://localhost:8000/".to_string())
            .with_api_token("tok".to_string())
            .build()
            .unwrap();

        assert_eq!(config.connection.base_url, "http://localhost:8000");
        match config.auth.strategy {
            AuthStrategy::Token { token } => assert_eq!(token.expose_secret(), "tok"),
            other => panic!("unexpected strategy: {other:?}"),
        }
    }

    #[test]
    fn test_token_preferred_over_credentials() {
        let config = ConfigLoader::new()
            .with_base_url("http://localhost:8000".to_string())
            .with_username("admin".to_string())
            .with_password("pw".to_string())
            .with_api_token("tok".to_string())
            .build()
            .unwrap();
        assert!(matches!(config.auth.strategy, AuthStrategy::Token { .. }));
    }

    #[test]
    fn test_missing_auth() {
        let result = ConfigLoader::new()
            .with_base_url("http://localhost:8000".to_string())
            .with_username("admin".to_string())
            .build();
        assert!(matches!(result, Err(ConfigError::MissingAuth)));
    }

    #[test]
    fn test_settings_endpoint_is_fallback_only() {
        let settings = SystemSettings {
            api_endpoint: "http://from-settings:8000".to_string(),
            ..SystemSettings::default()
        };

        let conn = ConfigLoader::new()
            .with_settings(&settings)
            .build_connection()
            .unwrap();
        assert_eq!(conn.base_url, "http://from-settings:8000");

        let conn = ConfigLoader::new()
            .with_settings(&settings)
            .with_base_url("http://explicit:9000".to_string())
            .build_connection()
            .unwrap();
        assert_eq!(conn.base_url, "http://explicit:9000");
    }

    #[test]
    fn test_missing_base_url() {
        assert!(matches!(
            ConfigLoader::new().build_connection(),
            Err(ConfigError::MissingBaseUrl)
        ));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = ConfigLoader::new()
            .with_base_url("ftp://logs.example.com".to_string())
            .build_connection();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = ConfigLoader::new()
            .with_base_url("http://localhost:8000".to_string())
            .with_timeout(Duration::ZERO)
            .build_connection();
        assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));
    }

    #[test]
    fn test_rejects_excessive_retries() {
        let result = ConfigLoader::new()
            .with_base_url("http://localhost:8000".to_string())
            .with_max_retries(MAX_MAX_RETRIES + 1)
            .build_connection();
        assert!(matches!(result, Err(ConfigError::InvalidMaxRetries { .. })));
    }
}
