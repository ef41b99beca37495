//! Error types for the search API client.
//!
//! Responsibilities:
//! - Classify every failure into the dashboard's taxonomy (network, auth,
//!   server, protocol mismatch) via [`ClientError::kind`].
//! - Decide which HTTP statuses are worth retrying.
//!
//! Does NOT handle:
//! - Presenting errors (callers map them to banners or exit codes).
//! - Session invalidation side effects (see the dashboard's session handler).

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Coarse error class used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or timeout; the request may not have reached the server.
    Network,
    /// HTTP 401 or a failed login. Not locally recoverable.
    Auth,
    /// Any other non-2xx response.
    Server,
    /// A 2xx response whose body matched no known shape.
    ProtocolMismatch,
    /// Client misconfiguration (bad URL, missing credentials).
    Config,
}

/// Errors that can occur during search API client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection refused, DNS, reset, body read).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Authentication failed or the session is no longer valid.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response from the API.
    #[error("API error ({status}) at {url}: {message}")]
    Server {
        status: u16,
        url: String,
        message: String,
    },

    /// The response body did not match any supported shape.
    #[error("Unexpected response shape: {0}")]
    ProtocolMismatch(String),

    /// Invalid base URL or request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Retryable responses kept coming until the retry budget ran out.
    #[error("Maximum retries exceeded ({attempts} attempts, last status {last_status})")]
    MaxRetriesExceeded { attempts: usize, last_status: u16 },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::ProtocolMismatch(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }
}

impl ClientError {
    /// Coarse class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Timeout => ErrorKind::Network,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Server { status: 401, .. } => ErrorKind::Auth,
            Self::Server { .. } | Self::MaxRetriesExceeded { .. } => ErrorKind::Server,
            Self::ProtocolMismatch(_) => ErrorKind::ProtocolMismatch,
            Self::InvalidUrl(_) => ErrorKind::Config,
        }
    }

    /// Check if this error is transient and a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout | Self::MaxRetriesExceeded { .. } => true,
            Self::Server { status, .. } => Self::is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// Retryable: 429, 502, 503, 504. Everything else fails immediately,
    /// including 500 which usually indicates a server bug.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::MaxRetriesExceeded { last_status, .. } => Some(*last_status),
            _ => None,
        }
    }
}
