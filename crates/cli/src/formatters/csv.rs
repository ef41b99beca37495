//! CSV formatter (RFC 4180 quoting via the `csv` crate).
//!
//! Log rows use the same columns as file exports.

use anyhow::Result;
use chrono::SecondsFormat;
use sentinel_client::{HealthStatus, LogEntry, LogStatistics};
use sentinel_config::SystemSettings;
use sentinel_dashboard::SavedSearch;
use sentinel_dashboard::export::{CSV_COLUMNS, ExportFormat, write_entries};

use super::{Formatter, LogPage, settings_rows};

pub struct CsvFormatter;

fn entries_csv(entries: &[LogEntry]) -> Result<String> {
    if entries.is_empty() {
        return Ok(format!("{}\n", CSV_COLUMNS.join(",")));
    }
    let mut buffer = Vec::new();
    write_entries(entries, ExportFormat::Csv, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn records<I, R>(header: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    Ok(String::from_utf8(writer.into_inner()?)?)
}

impl Formatter for CsvFormatter {
    fn format_logs(&self, page: &LogPage<'_>) -> Result<String> {
        entries_csv(page.entries)
    }

    fn format_threats(&self, entries: &[LogEntry]) -> Result<String> {
        entries_csv(entries)
    }

    fn format_health(&self, health: &HealthStatus) -> Result<String> {
        let overall = [("overall".to_string(), health.status.clone())];
        let rows = overall
            .into_iter()
            .chain(health.components.clone())
            .map(|(name, status)| [name, status]);
        records(&["component", "status"], rows)
    }

    /// One `(group, name, count)` row per severity, facility and top host.
    fn format_statistics(&self, stats: &LogStatistics) -> Result<String> {
        let totals = [
            ("total", "logs".to_string(), stats.total_logs),
            ("total", "threats".to_string(), stats.threat_logs_count),
        ];
        let severities = stats
            .by_severity
            .iter()
            .map(|(name, count)| ("severity", name.clone(), *count));
        let facilities = stats
            .by_facility
            .iter()
            .map(|(name, count)| ("facility", name.clone(), *count));
        let hosts = stats
            .top_hosts
            .iter()
            .map(|host| ("host", host.hostname.clone(), host.count));
        let rows = totals
            .into_iter()
            .chain(severities)
            .chain(facilities)
            .chain(hosts)
            .map(|(group, name, count)| [group.to_string(), name, count.to_string()]);
        records(&["group", "name", "count"], rows)
    }

    fn format_saved_searches(&self, searches: &[SavedSearch]) -> Result<String> {
        let rows = searches.iter().map(|saved| {
            let params = &saved.params;
            [
                saved.id.clone(),
                saved.name.clone(),
                saved.description.clone().unwrap_or_default(),
                params.query.clone().unwrap_or_default(),
                params.severity.clone().unwrap_or_default(),
                params.facility.clone().unwrap_or_default(),
                params.hostname.clone().unwrap_or_default(),
                params.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
                params.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            ]
        });
        records(
            &[
                "id",
                "name",
                "description",
                "query",
                "severity",
                "facility",
                "hostname",
                "start_time",
                "end_time",
            ],
            rows,
        )
    }

    fn format_settings(&self, settings: &SystemSettings) -> Result<String> {
        let rows = settings_rows(settings)
            .into_iter()
            .map(|(key, value)| [key.to_string(), value]);
        records(&["key", "value"], rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_empty_logs_are_header_only() {
        assert_eq!(
            CsvFormatter.format_threats(&[]).unwrap(),
            "timestamp,severity,facility,hostname,app_name,message,threat_detected,threat_type\n"
        );
    }

    #[test]
    fn test_health_rows() {
        let health = HealthStatus {
            status: "degraded".to_string(),
            components: BTreeMap::from([("kafka".to_string(), "down".to_string())]),
            version: None,
            timestamp: None,
        };
        assert_eq!(
            CsvFormatter.format_health(&health).unwrap(),
            "component,status\noverall,degraded\nkafka,down\n"
        );
    }
}
