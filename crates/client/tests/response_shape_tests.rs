//! Response-shape normalisation without a server.

mod common;

use common::load_fixture;
use sentinel_client::{SearchResult, normalize_search_response};
use serde_json::json;

#[test]
fn test_hit_list_normalises_to_canonical_result() {
    let body = json!({
        "hits": {
            "total": {"value": 2},
            "hits": [
                {"_id": "a", "_source": {"timestamp": "2024-01-01T00:00:00Z", "message": "first"}},
                {"_id": "b", "_source": {"timestamp": "2024-01-01T00:00:01Z", "message": "second"}}
            ]
        }
    });

    let SearchResult { total, entries } = normalize_search_response(body).unwrap();
    assert_eq!(total, 2);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "a");
    assert_eq!(entries[0].message, "first");
    assert_eq!(entries[1].id, "b");
    assert_eq!(entries[1].message, "second");
}

#[test]
fn test_both_fixture_shapes_agree_on_entry_type() {
    let paginated = normalize_search_response(load_fixture("search/paginated.json")).unwrap();
    let hits = normalize_search_response(load_fixture("search/hit_list.json")).unwrap();

    assert_eq!(paginated.total, 120);
    assert_eq!(hits.total, 2);
    // Offset-less and `Z` timestamps both land in UTC.
    assert_eq!(
        paginated.entries[0].timestamp.to_rfc3339(),
        "2024-01-07T23:59:12.481+00:00"
    );
    assert_eq!(
        hits.entries[0].timestamp.to_rfc3339(),
        "2024-01-07T10:00:00+00:00"
    );
}

#[test]
fn test_plain_numeric_hit_total() {
    let result = normalize_search_response(json!({
        "hits": {"total": 0, "hits": []}
    }))
    .unwrap();
    assert_eq!(result, SearchResult::default());
}
