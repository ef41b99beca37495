//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Render command results as a tab-separated table, pretty JSON or CSV.
//!
//! Does NOT handle:
//! - Printing (formatters return strings).
//! - Writing export files (see `sentinel_dashboard::export`).
//!
//! ## Empty-State Handling
//!
//! | Format | Empty result |
//! |--------|--------------|
//! | JSON | Valid empty structure (`[]` or `"logs": []`) |
//! | CSV | Header row only |
//! | Table | Human message, e.g. `No logs found.` |

use anyhow::Result;
use sentinel_client::{HealthStatus, LogEntry, LogStatistics};
use sentinel_config::SystemSettings;
use sentinel_dashboard::{Pagination, SavedSearch, Stats};

use crate::args::OutputFormat;

mod csv;
mod json;
mod table;

pub use self::csv::CsvFormatter;
pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Placeholder for absent values in table and CSV output.
pub const MISSING: &str = "N/A";

/// One applied page of search results.
#[derive(Debug, Clone, Copy)]
pub struct LogPage<'a> {
    pub entries: &'a [LogEntry],
    pub pagination: Pagination,
    pub stats: Stats,
}

/// Formatter trait for the different output types.
pub trait Formatter {
    fn format_logs(&self, page: &LogPage<'_>) -> Result<String>;

    fn format_threats(&self, entries: &[LogEntry]) -> Result<String>;

    fn format_health(&self, health: &HealthStatus) -> Result<String>;

    fn format_statistics(&self, stats: &LogStatistics) -> Result<String>;

    fn format_saved_searches(&self, searches: &[SavedSearch]) -> Result<String>;

    fn format_settings(&self, settings: &SystemSettings) -> Result<String>;
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Severity shown for an entry: the name when known, else the raw code.
pub(crate) fn severity_label(entry: &LogEntry) -> &str {
    entry
        .severity_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(&entry.severity)
}

/// `(key, value)` rows for the settings listing.
pub(crate) fn settings_rows(settings: &SystemSettings) -> Vec<(&'static str, String)> {
    vec![
        ("api_endpoint", settings.api_endpoint.clone()),
        ("refresh_interval", settings.refresh_interval.to_string()),
        ("logs_per_page", settings.logs_per_page.to_string()),
        ("theme", settings.theme.to_string()),
        (
            "enable_notifications",
            settings.enable_notifications.to_string(),
        ),
        (
            "enable_auto_refresh",
            settings.enable_auto_refresh.to_string(),
        ),
        (
            "live_end_margin_secs",
            settings.live_end_margin_secs.to_string(),
        ),
    ]
}
