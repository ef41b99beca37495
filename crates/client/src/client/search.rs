//! Search, threat, statistics and health methods.

use chrono::{DateTime, Utc};

use crate::client::{SentinelClient, session_call};
use crate::endpoints;
use crate::error::Result;
use crate::models::{HealthStatus, LogEntry, LogStatistics, SearchQuery, SearchResult, ThreatQuery};

impl SentinelClient {
    /// Run a log search and return the canonical result.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        session_call!(
            self,
            token,
            endpoints::search_logs(
                &self.http,
                &self.base_url,
                token,
                query,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }

    /// Fetch logs flagged with threat indicators.
    pub async fn threat_logs(&self, query: &ThreatQuery) -> Result<Vec<LogEntry>> {
        session_call!(
            self,
            token,
            endpoints::threat_logs(
                &self.http,
                &self.base_url,
                token,
                query,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }

    /// Server-side aggregates over the full matched set.
    pub async fn statistics(
        &self,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<LogStatistics> {
        session_call!(
            self,
            token,
            endpoints::statistics(
                &self.http,
                &self.base_url,
                token,
                start_time,
                end_time,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }

    /// Service health. Works without credentials.
    pub async fn health(&self) -> Result<HealthStatus> {
        endpoints::health(
            &self.http,
            &self.base_url,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
