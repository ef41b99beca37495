//! Server-side aggregate statistics (`GET /logs/statistics`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::serde_helpers::u64_from_string_or_number;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostCount {
    pub hostname: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBucket {
    pub timestamp: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub count: u64,
}

/// Counts over the full matched set, unlike the page-local dashboard stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogStatistics {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub total_logs: u64,
    #[serde(default)]
    pub by_severity: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_facility: BTreeMap<String, u64>,
    #[serde(default)]
    pub top_hosts: Vec<HostCount>,
    #[serde(default)]
    pub timeline: Vec<TimelineBucket>,
    #[serde(default)]
    pub threat_logs_count: u64,
}
