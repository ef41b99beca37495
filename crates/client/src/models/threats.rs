//! Threat log query and response.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::LogEntry;

/// Query parameters for `GET /logs/threats`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreatQuery {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub threat_type: Option<String>,
    pub size: Option<u32>,
}

impl ThreatQuery {
    /// Query-string pairs, omitting unset parameters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start_time {
            params.push(("start_time", start.to_rfc3339()));
        }
        if let Some(end) = self.end_time {
            params.push(("end_time", end.to_rfc3339()));
        }
        if let Some(kind) = self.threat_type.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("threat_type", kind.to_string()));
        }
        if let Some(size) = self.size {
            params.push(("size", size.to_string()));
        }
        params
    }
}

/// `{logs: [...]}`, with any paging fields ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ThreatResponse {
    pub logs: Vec<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_params_skip_unset_fields() {
        let query = ThreatQuery {
            start_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            threat_type: Some("  ".to_string()),
            size: Some(100),
            ..ThreatQuery::default()
        };
        let params = query.to_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], ("start_time", "2024-01-01T00:00:00+00:00".to_string()));
        assert_eq!(params[1], ("size", "100".to_string()));
    }
}
