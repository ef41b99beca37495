//! Centralized constants for the Sentinel workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default base URL of the log search API.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for rate-limited or unavailable responses.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound accepted for `SENTINEL_MAX_RETRIES`.
pub const MAX_MAX_RETRIES: usize = 10;

// =============================================================================
// Search & Pagination Defaults
// =============================================================================

/// Default number of log entries per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Page sizes the dashboard offers.
pub const ALLOWED_PAGE_SIZES: [u32; 4] = [25, 50, 100, 200];

/// Default sort field for log searches.
pub const DEFAULT_SORT_FIELD: &str = "timestamp";

/// Default number of threat entries requested by the threat view.
pub const DEFAULT_THREAT_PAGE_SIZE: u32 = 100;

/// Maximum span of a search window in days.
pub const MAX_RANGE_DAYS: i64 = 180;

/// Span of the window selected on startup, in days.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

// =============================================================================
// Live Refresh Defaults
// =============================================================================

/// Default live refresh interval in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Default margin added past "now" to the live window's end bound (1 day).
///
/// Tolerates clock skew and ingestion lag on freshly arrived entries.
pub const DEFAULT_LIVE_END_MARGIN_SECS: u64 = 86_400;

/// How long a "new entries" notice stays visible without further deltas.
pub const DEFAULT_NOTICE_DECAY_SECS: u64 = 5;

/// Default channel capacity for dashboard actions.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// Persistence Keys
// =============================================================================

/// Blob key under which `SystemSettings` is stored.
pub const SETTINGS_KEY: &str = "settings";

/// Blob key under which the saved-search list is stored.
pub const SAVED_SEARCHES_KEY: &str = "savedSearches";
