//! Health endpoint. Does not require authentication.

use reqwest::Client;

use crate::endpoints::send_request_with_retry;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::HealthStatus;

/// `GET /health`.
pub async fn health(
    client: &Client,
    base_url: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<HealthStatus> {
    let url = format!("{}/health", base_url);
    let response =
        send_request_with_retry(client.get(&url), max_retries, "/health", "GET", metrics).await?;
    Ok(response.json().await?)
}
