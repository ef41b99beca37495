//! Health check model.
//!
//! Two deployed shapes exist:
//! - `{status, opensearch: {status}, kafka?: {status}}`
//! - `{status, timestamp, version, dependencies: {name: status}}`
//!
//! Both normalise to [`HealthStatus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::serde_helpers::parse_utc_timestamp;

/// Normalised health report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    /// Dependency name to its status string.
    pub components: BTreeMap<String, String>,
    pub version: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComponentState {
    Plain(String),
    Object { status: String },
}

impl ComponentState {
    fn into_status(self) -> String {
        match self {
            ComponentState::Plain(s) | ComponentState::Object { status: s } => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHealth {
    status: String,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dependencies: Option<BTreeMap<String, ComponentState>>,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

impl<'de> Deserialize<'de> for HealthStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawHealth::deserialize(deserializer)?;

        let mut components: BTreeMap<String, String> = raw
            .rest
            .into_iter()
            .filter_map(|(name, value)| {
                let status = value.get("status")?.as_str()?.to_string();
                Some((name, status))
            })
            .collect();
        if let Some(deps) = raw.dependencies {
            components.extend(deps.into_iter().map(|(k, v)| (k, v.into_status())));
        }

        Ok(HealthStatus {
            status: raw.status,
            components,
            version: raw.version,
            timestamp: raw.timestamp.as_deref().and_then(parse_utc_timestamp),
        })
    }
}
