//! Export of the current page of logs.
//!
//! Responsibilities:
//! - Render log entries as a pretty JSON array or as CSV with fixed columns.
//! - Write the rendered bytes to a file.
//!
//! Does NOT handle:
//! - Choosing which entries to export (the controller passes the current page).
//! - Creating parent directories.
//!
//! Invariants:
//! - An empty page is an error and no file is created.

use chrono::{DateTime, SecondsFormat, Utc};
use sentinel_client::LogEntry;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// CSV header row.
pub const CSV_COLUMNS: [&str; 8] = [
    "timestamp",
    "severity",
    "facility",
    "hostname",
    "app_name",
    "message",
    "threat_detected",
    "threat_type",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{other}' (expected csv or json)")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No logs to export")]
    Empty,

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `logs_export_<ISO timestamp>.<ext>`.
pub fn default_filename(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "logs_export_{}.{}",
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
        format.extension()
    )
}

/// Write `entries` to `writer` in `format`.
pub fn write_entries<W: Write>(
    entries: &[LogEntry],
    format: ExportFormat,
    writer: W,
) -> Result<(), ExportError> {
    if entries.is_empty() {
        return Err(ExportError::Empty);
    }
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(writer, entries)?;
        }
        ExportFormat::Csv => {
            let mut w = csv::Writer::from_writer(writer);
            w.write_record(CSV_COLUMNS)?;
            for entry in entries {
                w.write_record(csv_row(entry))?;
            }
            w.flush().map_err(csv::Error::from)?;
        }
    }
    Ok(())
}

/// Render `entries` into memory and write them to `path`.
pub async fn export_to_path(
    entries: &[LogEntry],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    // The csv crate has no async API, so render to a buffer first
    let mut buffer = Vec::new();
    write_entries(entries, format, &mut buffer)?;

    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::File::create(path).await.map_err(io_err)?;
    file.write_all(&buffer).await.map_err(io_err)?;
    file.flush().await.map_err(io_err)?;
    Ok(())
}

fn csv_row(entry: &LogEntry) -> [String; 8] {
    [
        entry
            .timestamp
            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        entry.severity.clone(),
        entry.facility.clone(),
        entry.hostname.clone(),
        entry.app_name.clone().unwrap_or_default(),
        entry.message.clone(),
        entry.has_threat_indicators.to_string(),
        entry.threat_keywords_joined(),
    ]
}
