//! Search request and response models.
//!
//! Responsibilities:
//! - Define the wire form of a log search (`SearchQuery`).
//! - Normalise both upstream response shapes into one `SearchResult`.
//!
//! Invariants:
//! - Optional filters are omitted from the serialized body, never sent as `""` or `null`.
//! - `page_size` can only hold one of the allowed sizes.
//! - An unrecognised response body is a `ClientError::ProtocolMismatch`.

use chrono::{DateTime, Utc};
use sentinel_config::constants::{ALLOWED_PAGE_SIZES, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{ClientError, Result};
use crate::models::LogEntry;
use crate::serde_helpers::{u64_from_string_or_number, utc_timestamp};

/// A page size outside the allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("page size must be one of 25, 50, 100, 200 (got {0})")]
pub struct InvalidPageSize(pub u32);

/// Number of entries per page; one of 25, 50, 100 or 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    pub fn new(size: u32) -> std::result::Result<Self, InvalidPageSize> {
        if ALLOWED_PAGE_SIZES.contains(&size) {
            Ok(Self(size))
        } else {
            Err(InvalidPageSize(size))
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = InvalidPageSize;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Body of `POST /logs/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(with = "utc_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    pub end_time: DateTime<Utc>,
    pub page: u32,
    pub page_size: PageSize,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

/// Canonical search result, independent of the upstream shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total: u64,
    pub entries: Vec<LogEntry>,
}

/// `{total, page, page_size, total_pages, logs}`.
#[derive(Debug, Deserialize)]
struct PaginatedLogs {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    total: u64,
    logs: Vec<LogEntry>,
}

/// `{hits: {total: {value}, hits: [{_id, _source}]}}`.
#[derive(Debug, Deserialize)]
struct HitEnvelope {
    hits: HitList,
}

#[derive(Debug, Deserialize)]
struct HitList {
    total: HitTotal,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HitTotal {
    Tracked { value: u64 },
    Count(u64),
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

/// The two shapes the search endpoints return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Paginated(PaginatedLogs),
    Hits(HitEnvelope),
}

impl Hit {
    /// `{id: _id, ..._source}`: fields in `_source` win over the envelope id.
    fn into_entry(self) -> Result<LogEntry> {
        let mut fields = Map::with_capacity(self.source.len() + 1);
        fields.insert("id".to_string(), Value::String(self.id));
        fields.extend(self.source);
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| ClientError::ProtocolMismatch(format!("invalid hit source: {e}")))
    }
}

impl SearchResponse {
    fn into_result(self) -> Result<SearchResult> {
        match self {
            SearchResponse::Paginated(page) => Ok(SearchResult {
                total: page.total,
                entries: page.logs,
            }),
            SearchResponse::Hits(envelope) => {
                let total = match envelope.hits.total {
                    HitTotal::Tracked { value } | HitTotal::Count(value) => value,
                };
                let entries = envelope
                    .hits
                    .hits
                    .into_iter()
                    .map(Hit::into_entry)
                    .collect::<Result<Vec<_>>>()?;
                Ok(SearchResult { total, entries })
            }
        }
    }
}

/// Normalise a raw search response body into a [`SearchResult`].
pub fn normalize_search_response(body: Value) -> Result<SearchResult> {
    let response: SearchResponse = serde_json::from_value(body).map_err(|e| {
        ClientError::ProtocolMismatch(format!("unrecognized search response: {e}"))
    })?;
    response.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn query() -> SearchQuery {
        SearchQuery {
            query: None,
            severity: Some("error".to_string()),
            facility: None,
            hostname: None,
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
            page: 1,
            page_size: PageSize::default(),
            sort_by: "timestamp".to_string(),
            sort_order: SortOrder::Desc,
        }
    }

    #[test]
    fn test_query_omits_unset_filters() {
        let body = serde_json::to_value(query()).unwrap();
        let obj = body.as_object().unwrap();
        assert!(!obj.contains_key("query"));
        assert!(!obj.contains_key("facility"));
        assert!(!obj.contains_key("hostname"));
        assert_eq!(body["severity"], "error");
        assert_eq!(body["start_time"], "2024-01-01T00:00:00Z");
        assert_eq!(body["page_size"], 50);
        assert_eq!(body["sort_order"], "desc");
    }

    #[test]
    fn test_page_size_rejects_unlisted_values() {
        assert!(PageSize::new(100).is_ok());
        assert_eq!(PageSize::new(30), Err(InvalidPageSize(30)));
        assert!(serde_json::from_value::<PageSize>(json!(75)).is_err());
    }

    #[test]
    fn test_paginated_shape() {
        let result = normalize_search_response(json!({
            "total": 120, "page": 1, "page_size": 50, "total_pages": 3,
            "logs": [{"timestamp": "2024-01-01T00:00:00", "severity_name": "error", "message": "x"}]
        }))
        .unwrap();
        assert_eq!(result.total, 120);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].id, "");
    }

    #[test]
    fn test_hit_list_source_id_wins() {
        let result = normalize_search_response(json!({
            "hits": {"total": {"value": 1}, "hits": [
                {"_id": "envelope", "_source": {"id": "inner", "timestamp": "2024-01-01T00:00:00Z"}}
            ]}
        }))
        .unwrap();
        assert_eq!(result.entries[0].id, "inner");
    }

    #[test]
    fn test_unknown_shape_is_protocol_mismatch() {
        let err = normalize_search_response(json!({"results": []})).unwrap_err();
        assert!(matches!(err, ClientError::ProtocolMismatch(_)));
    }
}
