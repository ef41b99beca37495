//! Pretty JSON formatter.

use anyhow::Result;
use sentinel_client::{HealthStatus, LogEntry, LogStatistics};
use sentinel_config::SystemSettings;
use sentinel_dashboard::SavedSearch;
use serde_json::json;

use super::{Formatter, LogPage};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_logs(&self, page: &LogPage<'_>) -> Result<String> {
        let p = &page.pagination;
        let value = json!({
            "total": p.total,
            "page": p.page,
            "page_size": p.page_size.get(),
            "total_pages": p.total_pages(),
            "stats": {
                "errors": page.stats.errors,
                "warnings": page.stats.warnings,
            },
            "logs": page.entries,
        });
        Ok(serde_json::to_string_pretty(&value)? + "\n")
    }

    fn format_threats(&self, entries: &[LogEntry]) -> Result<String> {
        Ok(serde_json::to_string_pretty(entries)? + "\n")
    }

    fn format_health(&self, health: &HealthStatus) -> Result<String> {
        Ok(serde_json::to_string_pretty(health)? + "\n")
    }

    fn format_statistics(&self, stats: &LogStatistics) -> Result<String> {
        Ok(serde_json::to_string_pretty(stats)? + "\n")
    }

    fn format_saved_searches(&self, searches: &[SavedSearch]) -> Result<String> {
        Ok(serde_json::to_string_pretty(searches)? + "\n")
    }

    fn format_settings(&self, settings: &SystemSettings) -> Result<String> {
        Ok(serde_json::to_string_pretty(settings)? + "\n")
    }
}
