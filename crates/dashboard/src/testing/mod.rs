//! Test doubles for the dashboard controller.
//!
//! Only available in tests or with the `test-utils` feature.

use sentinel_client::{ClientError, LogEntry, SearchQuery, SearchResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::backend::SearchBackend;
use crate::session::SessionHandler;

/// One scripted reply.
#[derive(Debug)]
pub struct Reply {
    pub delay: Duration,
    pub result: Result<SearchResult, ClientError>,
}

impl Reply {
    pub fn ok(result: SearchResult) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(result),
        }
    }

    pub fn err(error: ClientError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    /// Complete only after `delay` of (Tokio) time.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Backend that replays scripted replies in order and records every query.
///
/// Once the script runs out it returns an empty result.
#[derive(Debug, Default)]
pub struct FakeBackend {
    replies: Mutex<VecDeque<Reply>>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Reply) -> &Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn last_query(&self) -> Option<SearchQuery> {
        self.queries().pop()
    }
}

impl SearchBackend for FakeBackend {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, ClientError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        let reply = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        let Some(reply) = reply else {
            return Ok(SearchResult::default());
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

/// Session handler that counts invalidations.
#[derive(Debug, Default)]
pub struct RecordingSessionHandler {
    invalidations: AtomicUsize,
}

impl RecordingSessionHandler {
    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

impl SessionHandler for RecordingSessionHandler {
    fn on_session_invalidated(&self, _error: &ClientError) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

/// A result with `total` matches and one entry per severity name.
pub fn result_with(total: u64, severity_names: &[&str]) -> SearchResult {
    let entries = severity_names
        .iter()
        .enumerate()
        .map(|(i, name)| LogEntry {
            id: i.to_string(),
            timestamp: chrono::Utc::now(),
            hostname: "host-01".to_string(),
            facility: "1".to_string(),
            facility_name: Some("user".to_string()),
            severity: String::new(),
            severity_name: Some((*name).to_string()),
            message: format!("entry {i}"),
            app_name: None,
            proc_id: None,
            structured_data: None,
            raw_message: None,
            has_threat_indicators: false,
            threat_keywords: None,
            threat_score: None,
        })
        .collect();
    SearchResult { total, entries }
}
