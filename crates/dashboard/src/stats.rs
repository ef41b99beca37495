//! Result and stats aggregation.
//!
//! `errors` and `warnings` are counted over the fetched page only, while
//! `total` is the server's count for the whole matched set. Callers that
//! need global severity counts use `SentinelClient::statistics`.

use sentinel_client::{SearchResult, SeverityClass};

/// Counts shown above the log table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub errors: u64,
    pub warnings: u64,
}

/// Outcome of folding a new result into the previous stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub stats: Stats,
    /// Entries that appeared since the previous result, when the total grew
    /// from a non-zero value.
    pub new_entries: Option<u64>,
}

/// Derive stats for `result`, comparing against `prev` for the new-entry delta.
pub fn aggregate(prev: &Stats, result: &SearchResult) -> Aggregate {
    let (errors, warnings) =
        result
            .entries
            .iter()
            .fold((0, 0), |(errors, warnings), entry| match entry.severity_class() {
                SeverityClass::Error => (errors + 1, warnings),
                SeverityClass::Warning => (errors, warnings + 1),
                SeverityClass::Other => (errors, warnings),
            });

    let new_entries =
        (prev.total > 0 && result.total > prev.total).then(|| result.total - prev.total);

    Aggregate {
        stats: Stats {
            total: result.total,
            errors,
            warnings,
        },
        new_entries,
    }
}
