//! Search API client.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `session`: Bearer-token retrieval and login
//! - `search`: Search, threat, statistics and health methods
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Token storage (delegated to [`crate::auth::SessionManager`])
//!
//! # Invariants
//! - A 401 on any authenticated call clears the session and surfaces
//!   `ClientError::Auth`; the call is never retried with a fresh login
//! - The `session_call!` macro centralises that handling

use crate::auth::SessionManager;
use crate::metrics::MetricsCollector;

/// Wrap an authenticated endpoint call.
///
/// Binds `$token` to the current bearer token for `$call`, and routes any
/// error through `on_call_error` so auth failures invalidate the session.
macro_rules! session_call {
    ($self:expr, $token:ident, $call:expr) => {{
        let bearer = $self.bearer_token().await?;
        let $token = bearer.as_str();
        match $call {
            Ok(data) => Ok(data),
            Err(err) => Err($self.on_call_error(err)),
        }
    }};
}
pub(crate) use session_call;

pub mod builder;
mod search;
mod session;

/// Search API client.
///
/// ```rust,ignore
/// use sentinel_client::{AuthStrategy, SentinelClient};
///
/// let client = SentinelClient::builder()
///     .base_url("http://localhost:8000".to_string())
///     .auth_strategy(AuthStrategy::Token { token })
///     .build()?;
/// let page = client.search(&query).await?;
/// ```
#[derive(Debug)]
pub struct SentinelClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) session_manager: Option<SessionManager>,
    pub(crate) max_retries: usize,
    pub(crate) metrics: Option<MetricsCollector>,
    pub(crate) login_lock: tokio::sync::Mutex<()>,
}

impl SentinelClient {
    /// Create a new client builder.
    pub fn builder() -> builder::SentinelClientBuilder {
        builder::SentinelClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
