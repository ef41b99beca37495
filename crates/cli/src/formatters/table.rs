//! Tab-separated table formatter.

use anyhow::Result;
use chrono::SecondsFormat;
use sentinel_client::{HealthStatus, LogEntry, LogStatistics, format_threat_score};
use sentinel_config::SystemSettings;
use sentinel_dashboard::SavedSearch;
use std::fmt::Write as _;

use super::{Formatter, LogPage, MISSING, settings_rows, severity_label};

pub struct TableFormatter;

fn timestamp(entry: &LogEntry) -> String {
    entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Messages are cut to one line so rows stay aligned.
fn one_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}

impl Formatter for TableFormatter {
    fn format_logs(&self, page: &LogPage<'_>) -> Result<String> {
        if page.entries.is_empty() {
            return Ok("No logs found.\n".to_string());
        }

        let mut output = String::from("Timestamp\tSeverity\tHost\tApp\tMessage\n");
        for entry in page.entries {
            writeln!(
                output,
                "{}\t{}\t{}\t{}\t{}",
                timestamp(entry),
                severity_label(entry),
                entry.hostname,
                entry.app_name.as_deref().unwrap_or(MISSING),
                one_line(&entry.message)
            )?;
        }

        let p = &page.pagination;
        if let Some((first, last)) = p.visible_range() {
            writeln!(
                output,
                "\nShowing {first}-{last} of {} (page {} of {}) | errors: {} | warnings: {}",
                p.total,
                p.page,
                p.total_pages(),
                page.stats.errors,
                page.stats.warnings
            )?;
        }
        Ok(output)
    }

    fn format_threats(&self, entries: &[LogEntry]) -> Result<String> {
        if entries.is_empty() {
            return Ok("No threats found.\n".to_string());
        }

        let mut output = String::from("Timestamp\tLevel\tScore\tHost\tKeywords\tMessage\n");
        for entry in entries {
            let keywords = entry.threat_keywords_joined();
            writeln!(
                output,
                "{}\t{}\t{}\t{}\t{}\t{}",
                timestamp(entry),
                entry.threat_level().map_or(MISSING, |l| l.as_str()),
                entry
                    .threat_score
                    .map_or_else(|| MISSING.to_string(), format_threat_score),
                entry.hostname,
                if keywords.is_empty() { MISSING } else { &keywords },
                one_line(&entry.message)
            )?;
        }
        Ok(output)
    }

    fn format_health(&self, health: &HealthStatus) -> Result<String> {
        let mut output = format!("Status: {}\n", health.status);
        if let Some(ref version) = health.version {
            writeln!(output, "Version: {version}")?;
        }
        if let Some(timestamp) = health.timestamp {
            writeln!(
                output,
                "Checked: {}",
                timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
            )?;
        }
        if !health.components.is_empty() {
            output.push_str("\nComponent\tStatus\n");
            for (name, status) in &health.components {
                writeln!(output, "{name}\t{status}")?;
            }
        }
        Ok(output)
    }

    fn format_statistics(&self, stats: &LogStatistics) -> Result<String> {
        let mut output = format!(
            "Total logs: {}\nThreat logs: {}\n",
            stats.total_logs, stats.threat_logs_count
        );
        for (title, counts) in [
            ("Severity", &stats.by_severity),
            ("Facility", &stats.by_facility),
        ] {
            if counts.is_empty() {
                continue;
            }
            writeln!(output, "\n{title}\tCount")?;
            for (name, count) in counts {
                writeln!(output, "{name}\t{count}")?;
            }
        }
        if !stats.top_hosts.is_empty() {
            output.push_str("\nHost\tCount\n");
            for host in &stats.top_hosts {
                writeln!(output, "{}\t{}", host.hostname, host.count)?;
            }
        }
        Ok(output)
    }

    fn format_saved_searches(&self, searches: &[SavedSearch]) -> Result<String> {
        if searches.is_empty() {
            return Ok("No saved searches.\n".to_string());
        }

        let mut output = String::from("ID\tName\tQuery\tSeverity\tHost\tDescription\n");
        for saved in searches {
            let params = &saved.params;
            writeln!(
                output,
                "{}\t{}\t{}\t{}\t{}\t{}",
                saved.id,
                saved.name,
                params.query.as_deref().unwrap_or(MISSING),
                params.severity.as_deref().unwrap_or(MISSING),
                params.hostname.as_deref().unwrap_or(MISSING),
                saved.description.as_deref().unwrap_or(MISSING)
            )?;
        }
        Ok(output)
    }

    fn format_settings(&self, settings: &SystemSettings) -> Result<String> {
        let mut output = String::new();
        for (key, value) in settings_rows(settings) {
            writeln!(output, "{key}\t{value}")?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_client::PageSize;
    use sentinel_dashboard::testing::result_with;
    use sentinel_dashboard::{Pagination, Stats};

    #[test]
    fn test_logs_table_has_summary_line() {
        let result = result_with(120, &["error", "warning", "info"]);
        let page = LogPage {
            entries: &result.entries,
            pagination: Pagination {
                page: 2,
                page_size: PageSize::new(50).unwrap(),
                total: 120,
            },
            stats: Stats {
                total: 120,
                errors: 1,
                warnings: 1,
            },
        };
        let output = TableFormatter.format_logs(&page).unwrap();
        assert!(output.starts_with("Timestamp\tSeverity\tHost\tApp\tMessage\n"));
        assert!(output.contains("\terror\thost-01\tN/A\tentry 0\n"));
        assert!(output.contains("Showing 51-100 of 120 (page 2 of 3) | errors: 1 | warnings: 1"));
    }

    #[test]
    fn test_empty_tables_use_messages() {
        let page = LogPage {
            entries: &[],
            pagination: Pagination::new(PageSize::default()),
            stats: Stats::default(),
        };
        assert_eq!(TableFormatter.format_logs(&page).unwrap(), "No logs found.\n");
        assert_eq!(TableFormatter.format_threats(&[]).unwrap(), "No threats found.\n");
    }

    #[test]
    fn test_settings_table() {
        let output = TableFormatter
            .format_settings(&SystemSettings::default())
            .unwrap();
        assert!(output.contains("refresh_interval\t30\n"));
        assert!(output.contains("theme\tdark\n"));
    }
}
