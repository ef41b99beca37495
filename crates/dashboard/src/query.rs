//! Query parameter builder.
//!
//! Responsibilities:
//! - Hold the editable search parameters (`UiState`).
//! - Build the `SearchQuery` sent to the API, omitting empty filters.
//! - Reset the page to 1 whenever a parameter that changes the result set changes.
//!
//! Does NOT handle:
//! - Validating the time window (see [`crate::time_range`]).
//! - Dispatching the fetch (see [`crate::controller`]).

use chrono::{DateTime, Utc};
use sentinel_client::{PageSize, SearchQuery, SortOrder};
use sentinel_config::constants::DEFAULT_SORT_FIELD;
use std::fmt;
use std::str::FromStr;

use crate::time_range::TimeRange;

/// Field filters besides the free-text query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Severity,
    Facility,
    Hostname,
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterField::Severity => "severity",
            FilterField::Facility => "facility",
            FilterField::Hostname => "hostname",
        })
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "severity" => Ok(FilterField::Severity),
            "facility" => Ok(FilterField::Facility),
            "hostname" | "host" => Ok(FilterField::Hostname),
            other => Err(format!("unknown filter field '{other}'")),
        }
    }
}

/// Search parameters as edited by the user. Empty strings mean "unset".
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub query_text: String,
    pub severity: String,
    pub facility: String,
    pub hostname: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub page: u32,
    pub page_size: PageSize,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl UiState {
    pub fn new(range: TimeRange, page_size: PageSize) -> Self {
        Self {
            query_text: String::new(),
            severity: String::new(),
            facility: String::new(),
            hostname: String::new(),
            start_time: range.start,
            end_time: range.end,
            page: 1,
            page_size,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            sort_order: SortOrder::Desc,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether a non-blank free-text query is set.
    pub fn has_query_text(&self) -> bool {
        !self.query_text.trim().is_empty()
    }

    /// Whether the query text or any field filter is set.
    pub fn has_active_filters(&self) -> bool {
        [&self.query_text, &self.severity, &self.facility, &self.hostname]
            .iter()
            .any(|v| !v.trim().is_empty())
    }

    pub fn filter(&self, field: FilterField) -> &str {
        match field {
            FilterField::Severity => &self.severity,
            FilterField::Facility => &self.facility,
            FilterField::Hostname => &self.hostname,
        }
    }

    /// Returns whether the text changed. A change resets the page.
    pub fn set_query_text(&mut self, text: impl Into<String>) -> bool {
        let changed = replace(&mut self.query_text, text.into());
        self.reset_page_if(changed)
    }

    /// Returns whether the filter changed. A change resets the page.
    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) -> bool {
        let slot = match field {
            FilterField::Severity => &mut self.severity,
            FilterField::Facility => &mut self.facility,
            FilterField::Hostname => &mut self.hostname,
        };
        let changed = replace(slot, value.into());
        self.reset_page_if(changed)
    }

    /// Returns whether either bound changed. A change resets the page.
    pub fn set_range(&mut self, range: TimeRange) -> bool {
        if self.range() == range {
            return false;
        }
        self.start_time = range.start;
        self.end_time = range.end;
        self.page = 1;
        true
    }

    /// Clear the free-text query and every field filter, and restore `range`.
    pub fn clear_filters(&mut self, range: TimeRange) {
        self.query_text.clear();
        self.severity.clear();
        self.facility.clear();
        self.hostname.clear();
        self.set_range(range);
        self.page = 1;
    }

    /// Copy the parameters of a previously built query back into the form.
    pub fn load_query(&mut self, query: &SearchQuery) {
        self.query_text = query.query.clone().unwrap_or_default();
        self.severity = query.severity.clone().unwrap_or_default();
        self.facility = query.facility.clone().unwrap_or_default();
        self.hostname = query.hostname.clone().unwrap_or_default();
        self.start_time = query.start_time;
        self.end_time = query.end_time;
        self.page_size = query.page_size;
        self.sort_by = query.sort_by.clone();
        self.sort_order = query.sort_order;
        self.page = 1;
    }

    fn reset_page_if(&mut self, changed: bool) -> bool {
        if changed {
            self.page = 1;
        }
        changed
    }
}

fn replace(slot: &mut String, value: String) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Build the request for the current parameters.
///
/// Blank fields are left out so the backend applies its match-all default.
pub fn build(ui: &UiState) -> SearchQuery {
    SearchQuery {
        query: non_empty(&ui.query_text),
        severity: non_empty(&ui.severity),
        facility: non_empty(&ui.facility),
        hostname: non_empty(&ui.hostname),
        start_time: ui.start_time,
        end_time: ui.end_time,
        page: ui.page.max(1),
        page_size: ui.page_size,
        sort_by: ui.sort_by.clone(),
        sort_order: ui.sort_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ui() -> UiState {
        let range = TimeRange {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        };
        UiState::new(range, PageSize::default())
    }

    #[test]
    fn test_build_omits_blank_fields() {
        let mut state = ui();
        state.set_filter(FilterField::Severity, "error");
        state.set_filter(FilterField::Hostname, "   ");

        let query = build(&state);
        assert_eq!(query.severity.as_deref(), Some("error"));
        assert_eq!(query.hostname, None);
        assert_eq!(query.query, None);
        assert_eq!(query.facility, None);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size.get(), 50);
        assert_eq!(query.sort_by, "timestamp");
    }

    #[test]
    fn test_changes_reset_page() {
        let mut state = ui();
        state.page = 3;
        assert!(state.set_query_text("timeout"));
        assert_eq!(state.page, 1);

        state.page = 3;
        assert!(!state.set_query_text("timeout"));
        assert_eq!(state.page, 3);

        assert!(state.set_filter(FilterField::Facility, "auth"));
        assert_eq!(state.page, 1);

        state.page = 2;
        let mut range = state.range();
        range.end = range.end + chrono::Duration::hours(1);
        assert!(state.set_range(range));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_active_filters() {
        let mut state = ui();
        assert!(!state.has_active_filters());
        state.set_filter(FilterField::Hostname, "fw-01");
        assert!(state.has_active_filters());
        assert!(!state.has_query_text());

        let range = state.range();
        state.clear_filters(range);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_load_query_round_trips_parameters() {
        let mut state = ui();
        state.set_query_text("denied");
        state.set_filter(FilterField::Severity, "warning");
        state.page_size = PageSize::new(100).unwrap();
        let saved = build(&state);

        let mut other = ui();
        other.page = 4;
        other.load_query(&saved);
        assert_eq!(build(&other), saved);
        assert_eq!(FilterField::from_str("host"), Ok(FilterField::Hostname));
    }
}
