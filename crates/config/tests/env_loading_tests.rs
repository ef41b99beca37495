//! Integration tests for layered configuration loading.
//!
//! Precedence: builder setters > SENTINEL_* env vars > persisted settings > defaults.

use secrecy::ExposeSecret;
use sentinel_config::{AuthStrategy, ConfigError, ConfigLoader, SystemSettings};
use serial_test::serial;
use std::time::Duration;

const ALL_VARS: [&str; 7] = [
    "SENTINEL_API_URL",
    "SENTINEL_USERNAME",
    "SENTINEL_PASSWORD",
    "SENTINEL_API_TOKEN",
    "SENTINEL_SKIP_VERIFY",
    "SENTINEL_TIMEOUT",
    "SENTINEL_MAX_RETRIES",
];

fn with_clean_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let mut all: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|k| (*k, None)).collect();
    for &(key, value) in vars {
        all.retain(|(k, _)| *k != key);
        all.push((key, Some(value)));
    }
    temp_env::with_vars(all, f);
}

#[test]
#[serial]
fn test_env_credentials_build() {
    with_clean_env(
        &[
            ("SENTINEL_API_URL", "https://logs.example.com/"),
            ("SENTINEL_USERNAME", "analyst"),
            ("SENTINEL_PASSWORD", "s3cret"),
            ("SENTINEL_TIMEOUT", "45"),
        ],
        || {
            let config = ConfigLoader::new().from_env().unwrap().build().unwrap();
            assert_eq!(config.connection.base_url, "https://logs.example.com");
            assert_eq!(config.connection.timeout, Duration::from_secs(45));
            match config.auth.strategy {
                AuthStrategy::Credentials { username, password } => {
                    assert_eq!(username, "analyst");
                    assert_eq!(password.expose_secret(), "s3cret");
                }
                other => panic!("unexpected strategy: {other:?}"),
            }
        },
    );
}

#[test]
#[serial]
fn test_setters_override_env() {
    with_clean_env(
        &[
            ("SENTINEL_API_URL", "http://env-host:8000"),
            ("SENTINEL_API_TOKEN", "env-token"),
        ],
        || {
            let config = ConfigLoader::new()
                .from_env()
                .unwrap()
                .with_base_url("http://cli-host:8000".to_string())
                .build()
                .unwrap();
            assert_eq!(config.connection.base_url, "http://cli-host:8000");
            assert!(matches!(config.auth.strategy, AuthStrategy::Token { .. }));
        },
    );
}

#[test]
#[serial]
fn test_env_overrides_persisted_endpoint() {
    let settings = SystemSettings {
        api_endpoint: "http://persisted:8000".to_string(),
        ..SystemSettings::default()
    };

    with_clean_env(&[], || {
        let conn = ConfigLoader::new()
            .with_settings(&settings)
            .from_env()
            .unwrap()
            .build_connection()
            .unwrap();
        assert_eq!(conn.base_url, "http://persisted:8000");
    });

    with_clean_env(&[("SENTINEL_API_URL", "http://env:8000")], || {
        let conn = ConfigLoader::new()
            .with_settings(&settings)
            .from_env()
            .unwrap()
            .build_connection()
            .unwrap();
        assert_eq!(conn.base_url, "http://env:8000");
    });
}

#[test]
#[serial]
fn test_whitespace_env_is_unset() {
    with_clean_env(&[("SENTINEL_API_URL", "   ")], || {
        let result = ConfigLoader::new().from_env().unwrap().build_connection();
        assert!(matches!(result, Err(ConfigError::MissingBaseUrl)));
    });
}

#[test]
#[serial]
fn test_invalid_numeric_env() {
    with_clean_env(&[("SENTINEL_MAX_RETRIES", "many")], || {
        let result = ConfigLoader::new().from_env();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    });
}

#[test]
#[serial]
fn test_dotenv_disabled_is_noop() {
    temp_env::with_var("DOTENV_DISABLED", Some("1"), || {
        assert!(ConfigLoader::new().load_dotenv().is_ok());
    });
}
