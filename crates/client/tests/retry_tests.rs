//! Retry behaviour of `send_request_with_retry` through the endpoint functions.
//!
//! # Invariants
//! - 429/502/503/504 are retried with 1s, 2s, 4s... backoff
//! - 500 and other statuses fail on the first attempt
//! - `max_retries = 0` means a single attempt

mod common;

use common::*;
use sentinel_client::ClientError;
use std::time::Duration;
use wiremock::matchers::{method, path};

#[tokio::test(start_paused = true)]
async fn test_retry_on_503_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/logs/search"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(serde_json::json!({"detail": "Search backend unavailable"})),
        )
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/logs/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("search/paginated.json")),
        )
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let server_uri = mock_server.uri();
    let query = error_week_query();

    let handle = tokio::spawn(async move {
        endpoints::search_logs(&client, &server_uri, "test-token", &query, 3, None).await
    });

    assert_pending(&handle, "first 503 should wait for backoff").await;
    advance_and_yield(Duration::from_secs(1)).await;
    advance_and_yield(Duration::from_secs(2)).await;

    let result = handle.await.expect("search task");
    assert_eq!(result.unwrap().total, 120);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let result = endpoints::health(&client, &mock_server.uri(), 2, None).await;

    match result {
        Err(ClientError::MaxRetriesExceeded {
            attempts,
            last_status,
        }) => {
            assert_eq!(attempts, 3);
            assert_eq!(last_status, 429);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_500_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/logs/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let err = endpoints::search_logs(
        &client,
        &mock_server.uri(),
        "test-token",
        &error_week_query(),
        3,
        None,
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_zero_retries_is_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let err = endpoints::health(&client, &mock_server.uri(), 0, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::MaxRetriesExceeded { attempts: 1, .. }
    ));
}
