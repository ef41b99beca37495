//! Error types for the dashboard controller.
//!
//! Responsibilities:
//! - Separate input problems (`ValidationError`, shown inline, no fetch) from
//!   fetch failures (`DashboardError::Client`, shown as a dismissible banner).
//!
//! Does NOT handle:
//! - Session invalidation (see [`crate::session::SessionHandler`]).

use sentinel_client::ClientError;
use sentinel_config::StoreError;
use std::sync::Arc;
use thiserror::Error;

use crate::export::ExportError;

/// Rejected user input. The fetch is never attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("End date must be after start date")]
    EndBeforeStart,

    #[error("Date range cannot exceed {max} days (got {days})")]
    RangeTooLong { days: i64, max: i64 },

    #[error("Saved search name cannot be empty")]
    EmptyName,

    #[error("Page size must be one of 25, 50, 100, 200 (got {0})")]
    InvalidPageSize(u32),
}

/// Any failure surfaced by the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Shared so the same failure can sit in the banner and be returned.
    #[error(transparent)]
    Client(Arc<ClientError>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Saved search not found: {0}")]
    SavedSearchNotFound(String),
}

impl From<ClientError> for DashboardError {
    fn from(err: ClientError) -> Self {
        DashboardError::Client(Arc::new(err))
    }
}

impl DashboardError {
    /// The underlying client error, if this failure came from a fetch.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            DashboardError::Client(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        self.client_error().is_some_and(ClientError::is_auth_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::RangeTooLong { days: 181, max: 180 }.to_string(),
            "Date range cannot exceed 180 days (got 181)"
        );
        assert_eq!(
            DashboardError::from(ValidationError::EmptyName).to_string(),
            "Saved search name cannot be empty"
        );
    }

    #[test]
    fn test_auth_error_detection() {
        let err = DashboardError::from(ClientError::Auth("expired".into()));
        assert!(err.is_auth_error());
        assert!(!DashboardError::from(ValidationError::EndBeforeStart).is_auth_error());
    }
}
