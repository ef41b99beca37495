//! Search API client for the Sentinel log dashboard.
//!
//! This crate provides a typed client for the log search service: log
//! search with response-shape normalisation, threat logs, aggregate
//! statistics, health, and token-based login.

mod auth;
pub mod client;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
mod serde_helpers;

pub mod endpoints;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{AuthStrategy, SessionManager};
pub use client::SentinelClient;
pub use client::builder::SentinelClientBuilder;
pub use error::{ClientError, ErrorKind, Result};
pub use metrics::{ErrorCategory, MetricsCollector, RequestRecorder};
pub use models::{
    HealthStatus, HostCount, InvalidPageSize, LogEntry, LogStatistics, PageSize, SearchQuery,
    SearchResult, SeverityClass, SortOrder, ThreatLevel, ThreatQuery, TimelineBucket,
    TokenResponse, format_threat_score, normalize_search_response,
};
