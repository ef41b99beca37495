//! Log search, threat and statistics endpoints.

use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::debug;

use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{
    LogEntry, LogStatistics, SearchQuery, SearchResult, ThreatQuery, ThreatResponse,
    normalize_search_response,
};

/// `POST /logs/search`, normalising either response shape.
pub async fn search_logs(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    query: &SearchQuery,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<SearchResult> {
    debug!(page = query.page, page_size = %query.page_size, "Searching logs");

    let url = format!("{}/logs/search", base_url);
    let builder = client.post(&url).bearer_auth(auth_token).json(query);
    let response =
        send_request_with_retry(builder, max_retries, "/logs/search", "POST", metrics).await?;

    let bytes = response.bytes().await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
        ClientError::ProtocolMismatch(format!("unrecognized search response: {e}"))
    })?;
    normalize_search_response(body)
}

/// `GET /logs/threats`.
pub async fn threat_logs(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    query: &ThreatQuery,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<LogEntry>> {
    let url = format!("{}/logs/threats", base_url);
    let builder = client
        .get(&url)
        .bearer_auth(auth_token)
        .query(&query.to_params());
    let response =
        send_request_with_retry(builder, max_retries, "/logs/threats", "GET", metrics).await?;

    let body: ThreatResponse = response.json().await?;
    Ok(body.logs)
}

/// `GET /logs/statistics` over an optional window.
pub async fn statistics(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<LogStatistics> {
    let mut params = Vec::new();
    if let Some(start) = start_time {
        params.push(("start_time", start.to_rfc3339()));
    }
    if let Some(end) = end_time {
        params.push(("end_time", end.to_rfc3339()));
    }

    let url = format!("{}/logs/statistics", base_url);
    let builder = client.get(&url).bearer_auth(auth_token).query(&params);
    let response =
        send_request_with_retry(builder, max_retries, "/logs/statistics", "GET", metrics).await?;

    Ok(response.json().await?)
}
