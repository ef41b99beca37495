//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse time bounds and relative ranges into dashboard types.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load configuration (see `context` module).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sentinel_dashboard::{ExportFormat, QuickRange, RelativeRange, TimeRange};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "sentinel-cli")]
#[command(about = "Sentinel CLI - Search and tail syslog data from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  sentinel-cli search --severity error --last 7d\n  sentinel-cli search -q 'connection refused' --page 2 --page-size 100\n  sentinel-cli tail --hostname fw-edge-01 --interval 10\n  sentinel-cli export --format csv --last 24h\n  sentinel-cli saved save 'Edge errors' --severity error --hostname fw-edge-01\n  sentinel-cli settings set refresh_interval 15\n"
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log output format (logs are written to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9000)
    #[arg(long, global = true, env = "SENTINEL_METRICS_BIND", value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and authentication overrides. Flags win over environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Base URL of the search API (e.g., http://localhost:8000)
    #[arg(long, global = true, env = "SENTINEL_API_URL")]
    pub api_url: Option<String>,

    /// Username for token login
    #[arg(short, long, global = true, env = "SENTINEL_USERNAME")]
    pub username: Option<String>,

    /// Password for token login
    #[arg(short, long, global = true, env = "SENTINEL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Pre-issued bearer token (preferred over username/password)
    #[arg(short = 't', long, global = true, env = "SENTINEL_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "SENTINEL_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Maximum number of retries for 429/502/503/504 responses
    #[arg(long, global = true, env = "SENTINEL_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "SENTINEL_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Path to the state file holding settings and saved searches
    #[arg(long, global = true, env = "SENTINEL_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search logs and print one page of results
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        page: PageArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Follow a search, re-fetching on the live refresh interval until Ctrl+C
    Tail {
        #[command(flatten)]
        filters: FilterArgs,

        /// Refresh interval in seconds (defaults to the saved setting)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Entries per page (25, 50, 100 or 200)
        #[arg(long)]
        page_size: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List logs flagged with threat indicators
    Threats {
        #[command(flatten)]
        window: WindowArgs,

        /// Only this threat type
        #[arg(long = "type", value_name = "TYPE")]
        threat_type: Option<String>,

        /// Maximum number of entries
        #[arg(long, default_value = "100")]
        size: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Server-side counts over every log in a window
    Stats {
        #[command(flatten)]
        window: WindowArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show the health of the search API and its dependencies
    Health {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Write one page of results to a CSV or JSON file
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// 1-based page number (clamped to the last page)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Entries per page (25, 50, 100 or 200; defaults to the saved setting)
        #[arg(long)]
        page_size: Option<u32>,

        /// File format
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Destination file (defaults to logs_export_<timestamp>.<ext>)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Manage saved searches
    Saved {
        #[command(subcommand)]
        command: commands::saved::SavedCommand,
    },

    /// Show or change persisted settings
    Settings {
        #[command(subcommand)]
        command: commands::settings::SettingsCommand,
    },
}

/// Time window selection shared by commands that take one.
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Window start (RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`, UTC)
    #[arg(long, value_parser = parse_time)]
    pub start: Option<DateTime<Utc>>,

    /// Window end (same formats as --start; defaults to now)
    #[arg(long, value_parser = parse_time)]
    pub end: Option<DateTime<Utc>>,

    /// Window ending now: today, 15m, 30m, 1h, 4h, 12h, 24h, 7d, 30d, 90d, 180d
    #[arg(long, value_parser = parse_last, conflicts_with_all = ["start", "end"])]
    pub last: Option<LastRange>,
}

impl WindowArgs {
    /// The selected window, or `None` when no bound was given.
    ///
    /// A lone `--end` gets the default seven-day span; a lone `--start` ends now.
    pub fn range(&self, now: DateTime<Utc>) -> Result<Option<TimeRange>, sentinel_dashboard::ValidationError> {
        if let Some(last) = self.last {
            return Ok(Some(last.range_at(now)));
        }
        match (self.start, self.end) {
            (None, None) => Ok(None),
            (Some(start), end) => TimeRange::new(start, end.unwrap_or(now)).map(Some),
            (None, Some(end)) => {
                let default = TimeRange::default_at(end);
                TimeRange::new(default.start, end).map(Some)
            }
        }
    }
}

/// Search filters plus the time window.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Free-text query (suspends live refresh while set)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Severity name (e.g. error, warning)
    #[arg(long)]
    pub severity: Option<String>,

    /// Facility name or number
    #[arg(long)]
    pub facility: Option<String>,

    /// Hostname
    #[arg(long)]
    pub hostname: Option<String>,

    #[command(flatten)]
    pub window: WindowArgs,
}

/// Page selection and ordering.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// 1-based page number
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Entries per page (25, 50, 100 or 200; defaults to the saved setting)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Field to sort on
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction
    #[arg(long, value_parser = ["asc", "desc"])]
    pub sort_order: Option<String>,
}

/// `--last` value: a day-based quick range or a minute-based relative range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastRange {
    Quick(QuickRange),
    Relative(RelativeRange),
}

impl LastRange {
    pub fn range_at(self, now: DateTime<Utc>) -> TimeRange {
        match self {
            LastRange::Quick(quick) => quick.range_at(now),
            LastRange::Relative(relative) => relative.range_at(now),
        }
    }
}

fn parse_last(raw: &str) -> Result<LastRange, String> {
    raw.parse::<RelativeRange>()
        .map(LastRange::Relative)
        .or_else(|_| raw.parse::<QuickRange>().map(LastRange::Quick))
        .map_err(|_| {
            format!(
                "unknown range '{raw}' (expected today, 15m, 30m, 1h, 4h, 12h, 24h, 7d, 30d, 90d or 180d)"
            )
        })
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid time '{raw}' (expected RFC 3339 or YYYY-MM-DD)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_time_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(parse_time("2024-01-02"), Ok(expected));
        assert_eq!(parse_time("2024-01-02T00:00:00"), Ok(expected));
        assert_eq!(parse_time("2024-01-02T01:00:00+01:00"), Ok(expected));
        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn test_parse_last_prefers_relative_presets() {
        assert_eq!(parse_last("7d"), Ok(LastRange::Relative(RelativeRange::Days7)));
        assert_eq!(parse_last("90d"), Ok(LastRange::Quick(QuickRange::Last90Days)));
        assert_eq!(parse_last("today"), Ok(LastRange::Quick(QuickRange::Today)));
        assert!(parse_last("2w").is_err());
    }

    #[test]
    fn test_window_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        assert_eq!(WindowArgs::default().range(now), Ok(None));

        let window = WindowArgs {
            start: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..WindowArgs::default()
        };
        let range = window.range(now).unwrap().unwrap();
        assert_eq!(range.end, now);

        let inverted = WindowArgs {
            start: Some(now),
            end: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            last: None,
        };
        assert!(inverted.range(now).is_err());
    }
}
