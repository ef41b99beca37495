//! The controller's view of the search API.

use sentinel_client::{ClientError, SearchQuery, SearchResult, SentinelClient};
use std::future::Future;

/// Anything that can run a normalised log search.
///
/// Implemented by [`SentinelClient`]; tests substitute a scripted backend.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResult, ClientError>> + Send;
}

impl SearchBackend for SentinelClient {
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResult, ClientError>> + Send {
        SentinelClient::search(self, query)
    }
}

