//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read `SENTINEL_*` variables and apply them to a `ConfigLoader`.
//! - Treat empty or whitespace-only variables as unset.
//!
//! Does NOT handle:
//! - Building the final `Config` (see builder.rs).
//! - `.env` file loading (handled by `ConfigLoader::load_dotenv`).

use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;

pub(crate) const API_URL_ENV: &str = "SENTINEL_API_URL";
pub(crate) const USERNAME_ENV: &str = "SENTINEL_USERNAME";
pub(crate) const PASSWORD_ENV: &str = "SENTINEL_PASSWORD";
pub(crate) const API_TOKEN_ENV: &str = "SENTINEL_API_TOKEN";
pub(crate) const SKIP_VERIFY_ENV: &str = "SENTINEL_SKIP_VERIFY";
pub(crate) const TIMEOUT_ENV: &str = "SENTINEL_TIMEOUT";
pub(crate) const MAX_RETRIES_ENV: &str = "SENTINEL_MAX_RETRIES";

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_env<T: FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: expected.to_string(),
            })
        })
        .transpose()
}

/// Apply environment variable configuration to the loader.
pub(crate) fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none(API_URL_ENV) {
        loader.set_base_url(Some(url));
    }
    if let Some(username) = env_var_or_none(USERNAME_ENV) {
        loader.set_username(Some(username));
    }
    if let Some(password) = env_var_or_none(PASSWORD_ENV) {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(token) = env_var_or_none(API_TOKEN_ENV) {
        loader.set_api_token(Some(SecretString::new(token.into())));
    }
    if let Some(skip) = parse_env::<bool>(SKIP_VERIFY_ENV, "must be true or false")? {
        loader.set_skip_verify(Some(skip));
    }
    if let Some(secs) = parse_env::<u64>(TIMEOUT_ENV, "must be a number of seconds")? {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = parse_env::<usize>(MAX_RETRIES_ENV, "must be a non-negative integer")? {
        loader.set_max_retries(Some(retries));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_or_none_filters_empty_and_whitespace_strings() {
        let key = "_SENTINEL_TEST_VAR";
        assert!(env_var_or_none(key).is_none());

        temp_env::with_var(key, Some(""), || {
            assert!(env_var_or_none(key).is_none());
        });
        temp_env::with_var(key, Some("   "), || {
            assert!(env_var_or_none(key).is_none());
        });
        temp_env::with_var(key, Some(" value "), || {
            assert_eq!(env_var_or_none(key), Some("value".to_string()));
        });
    }

    #[test]
    #[serial]
    fn test_parse_env_reports_variable_name() {
        temp_env::with_var(TIMEOUT_ENV, Some("soon"), || {
            let err = parse_env::<u64>(TIMEOUT_ENV, "must be a number").unwrap_err();
            assert!(err.to_string().contains("SENTINEL_TIMEOUT"));
        });
    }
}
