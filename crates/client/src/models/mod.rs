//! Data models for search API requests and responses.

mod auth;
mod health;
mod log_entry;
mod search;
mod statistics;
mod threats;

pub(crate) use auth::LoginRequest;
pub use auth::TokenResponse;
pub use health::HealthStatus;
pub use log_entry::{LogEntry, SeverityClass, ThreatLevel, format_threat_score};
pub use search::{
    InvalidPageSize, PageSize, SearchQuery, SearchResult, SortOrder, normalize_search_response,
};
pub use statistics::{HostCount, LogStatistics, TimelineBucket};
pub(crate) use threats::ThreatResponse;
pub use threats::ThreatQuery;
