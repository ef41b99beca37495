//! Authentication endpoint.

use reqwest::Client;
use tracing::debug;

use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{LoginRequest, TokenResponse};

/// Exchange username and password for an access token.
///
/// A 401 becomes `ClientError::Auth` carrying the server's message.
pub async fn login(
    client: &Client,
    base_url: &str,
    username: &str,
    password: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<TokenResponse> {
    debug!(username, "Logging in");

    let url = format!("{}/auth/login", base_url);
    let builder = client
        .post(&url)
        .json(&LoginRequest { username, password });

    let response = send_request_with_retry(builder, max_retries, "/auth/login", "POST", metrics)
        .await
        .map_err(|e| match e {
            ClientError::Server {
                status: 401,
                message,
                ..
            } => ClientError::Auth(message),
            other => other,
        })?;

    Ok(response.json().await?)
}
