//! Log record model and its display-oriented classifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::serde_helpers::{
    opt_f64_from_string_or_number, opt_string_from_number_or_string, string_from_number_or_string,
    utc_timestamp,
};

/// A single syslog record as returned by the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Document id. Absent in the paginated shape, where it defaults to `""`.
    #[serde(default, deserialize_with = "string_from_number_or_string")]
    pub id: String,
    #[serde(with = "utc_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub hostname: String,
    #[serde(default, deserialize_with = "string_from_number_or_string")]
    pub facility: String,
    #[serde(default)]
    pub facility_name: Option<String>,
    #[serde(default, deserialize_with = "string_from_number_or_string")]
    pub severity: String,
    #[serde(default)]
    pub severity_name: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_number_or_string")]
    pub proc_id: Option<String>,
    #[serde(default)]
    pub structured_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub raw_message: Option<String>,
    #[serde(default)]
    pub has_threat_indicators: bool,
    #[serde(default)]
    pub threat_keywords: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_f64_from_string_or_number")]
    pub threat_score: Option<f64>,
}

/// Severity bucket used by the stats aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityClass {
    Error,
    Warning,
    Other,
}

impl SeverityClass {
    /// Classify a syslog severity name, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "emergency" | "alert" | "critical" | "error" => SeverityClass::Error,
            "warning" => SeverityClass::Warning,
            _ => SeverityClass::Other,
        }
    }
}

/// Threat level bucket derived from a `threat_score` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ThreatLevel::Critical
        } else if score >= 0.6 {
            ThreatLevel::High
        } else if score >= 0.4 {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "low",
            ThreatLevel::Medium => "medium",
            ThreatLevel::High => "high",
            ThreatLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a `[0, 1]` score as a rounded percentage, e.g. `0.756` -> `"76%"`.
pub fn format_threat_score(score: f64) -> String {
    format!("{}%", (score * 100.0).round() as i64)
}

impl LogEntry {
    pub fn severity_class(&self) -> SeverityClass {
        self.severity_name
            .as_deref()
            .map(SeverityClass::from_name)
            .unwrap_or(SeverityClass::Other)
    }

    pub fn threat_level(&self) -> Option<ThreatLevel> {
        self.threat_score.map(ThreatLevel::from_score)
    }

    /// FortiGate device name from a `devname="..."` token in the message.
    pub fn device_name(&self) -> Option<&str> {
        let start = self.message.find("devname=\"")? + "devname=\"".len();
        let rest = &self.message[start..];
        let end = rest.find('"')?;
        let name = &rest[..end];
        (!name.is_empty()).then_some(name)
    }

    /// Threat keywords joined for tabular output.
    pub fn threat_keywords_joined(&self) -> String {
        self.threat_keywords
            .as_deref()
            .map(|kw| kw.join(", "))
            .unwrap_or_default()
    }
}
