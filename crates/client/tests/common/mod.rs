//! Common test utilities for integration tests.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)

use secrecy::SecretString;

#[allow(unused_imports)]
pub use sentinel_client::testing::load_fixture;

#[allow(unused_imports)]
pub use reqwest::Client;
#[allow(unused_imports)]
pub use sentinel_client::endpoints;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use chrono::{TimeZone, Utc};
use sentinel_client::{AuthStrategy, PageSize, SearchQuery, SentinelClient, SortOrder};

/// Query from the "errors in the first week of 2024" scenario.
#[allow(dead_code)]
pub fn error_week_query() -> SearchQuery {
    SearchQuery {
        query: None,
        severity: Some("error".to_string()),
        facility: None,
        hostname: None,
        start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        page: 1,
        page_size: PageSize::default(),
        sort_by: "timestamp".to_string(),
        sort_order: SortOrder::Desc,
    }
}

/// Client against `server` using a static bearer token and no retries.
#[allow(dead_code)]
pub fn token_client(server: &MockServer) -> SentinelClient {
    SentinelClient::builder()
        .base_url(server.uri())
        .auth_strategy(AuthStrategy::Token {
            token: SecretString::new("test-token".to_string().into()),
        })
        .max_retries(0)
        .build()
        .expect("client should build")
}

/// Client against `server` that logs in with username/password.
#[allow(dead_code)]
pub fn credentials_client(server: &MockServer) -> SentinelClient {
    SentinelClient::builder()
        .base_url(server.uri())
        .auth_strategy(AuthStrategy::Credentials {
            username: "analyst".to_string(),
            password: SecretString::new("s3cret".to_string().into()),
        })
        .max_retries(0)
        .build()
        .expect("client should build")
}

/// Advance Tokio's paused clock and yield so sleepers can observe the change.
#[allow(dead_code)]
pub async fn advance_and_yield(duration: std::time::Duration) {
    tokio::time::advance(duration).await;
    tokio::task::yield_now().await;
}

/// Assert that a task has not completed after yielding to the scheduler.
#[allow(dead_code)]
pub async fn assert_pending<T>(handle: &tokio::task::JoinHandle<T>, context: &str) {
    tokio::task::yield_now().await;
    assert!(!handle.is_finished(), "Expected pending task: {}", context);
}
