//! Retry helper for HTTP requests with exponential backoff.
//!
//! Responsibilities:
//! - Retry 429/502/503/504 with `2^attempt` second backoff.
//! - Turn non-success responses into `ClientError::Server` with a readable message.
//! - Record request metrics when a collector is supplied.

use reqwest::{RequestBuilder, Response};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Extract a human-readable message from an error response body.
///
/// Order: `detail` (string, or JSON rendered as text), then `message`,
/// then the raw body.
pub fn parse_error_message(body: &str) -> String {
    if let Ok(serde_json::Value::Object(obj)) = serde_json::from_str::<serde_json::Value>(body) {
        match obj.get("detail") {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
        if let Some(serde_json::Value::String(s)) = obj.get("message") {
            return s.clone();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "An unexpected error occurred".to_string()
    } else {
        trimmed.to_string()
    }
}

async fn into_server_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    ClientError::Server {
        status,
        url,
        message: parse_error_message(&body),
    }
}

/// Sends an HTTP request, retrying transient failures.
///
/// `max_retries = 0` means a single attempt.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let recorder = metrics.and_then(|m| m.request(endpoint, method));
    let fail = |err: ClientError| {
        if let Some(r) = &recorder {
            r.failed(&err);
        }
        Err(err)
    };
    let mut last_status = 0;

    for attempt in 0..=max_retries {
        let Some(attempt_builder) = builder.try_clone() else {
            debug!("Request builder cannot be cloned, single attempt only");
            return builder.send().await.map_err(ClientError::from);
        };

        if let Some(r) = &recorder {
            r.attempt(attempt);
        }
        let started = Instant::now();
        let sent = attempt_builder.send().await;
        if let Some(r) = &recorder {
            let status = sent.as_ref().ok().map(|resp| resp.status().as_u16());
            r.finished(started.elapsed(), status);
        }

        let response = match sent {
            Ok(response) => response,
            Err(e) => return fail(ClientError::from(e)),
        };

        let status = response.status().as_u16();
        if response.status().is_success() {
            if attempt > 0 {
                debug!(attempt = attempt + 1, endpoint, "Request succeeded after retry");
            }
            return Ok(response);
        }

        if !ClientError::is_retryable_status(status) {
            return fail(into_server_error(response).await);
        }

        last_status = status;
        if attempt < max_retries {
            let backoff = Duration::from_secs(2u64.pow(attempt as u32));
            debug!(
                attempt = attempt + 1,
                status,
                endpoint,
                backoff_secs = backoff.as_secs(),
                "Retryable status, backing off"
            );
            tokio::time::sleep(backoff).await;
        }
    }

    debug!(attempts = max_retries + 1, endpoint, "Retries exhausted");
    fail(ClientError::MaxRetriesExceeded {
        attempts: max_retries + 1,
        last_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_prefers_detail() {
        assert_eq!(
            parse_error_message(r#"{"detail": "Log search failed", "message": "ignored"}"#),
            "Log search failed"
        );
        assert_eq!(
            parse_error_message(r#"{"error": "x", "message": "Bad input"}"#),
            "Bad input"
        );
        assert_eq!(
            parse_error_message(r#"{"detail": [{"loc": ["body", "page"]}]}"#),
            r#"[{"loc":["body","page"]}]"#
        );
        assert_eq!(parse_error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(parse_error_message(""), "An unexpected error occurred");
    }
}
