//! Metrics collection for API call performance.
//!
//! This module records, through the `metrics` facade:
//! - Request latency histograms
//! - Request and retry counters
//! - Categorised error counters
//!
//! # What this module does NOT handle:
//! - Metrics exposition (see [`crate::metrics_exporter`])
//!
//! # Invariants
//! - Labels are always `endpoint`, `method`, `status`, `error_category`
//! - Recording is infallible and a no-op when no recorder is installed

use crate::error::{ClientError, ErrorKind};
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "sentinel_api_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "sentinel_api_requests_total";

/// Metric name for retry counter.
pub const METRIC_RETRIES_TOTAL: &str = "sentinel_api_retries_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "sentinel_api_errors_total";

/// Metric name for response-shape failures.
pub const METRIC_PROTOCOL_MISMATCHES: &str = "sentinel_api_protocol_mismatches_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Timeout,
    Auth,
    Http4xx,
    Http5xx,
    Protocol,
    Unknown,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::Timeout => ErrorCategory::Timeout,
            ClientError::Network(_) => ErrorCategory::Transport,
            _ if error.kind() == ErrorKind::Auth => ErrorCategory::Auth,
            ClientError::Server { status, .. }
            | ClientError::MaxRetriesExceeded {
                last_status: status,
                ..
            } => {
                if (400..500).contains(status) {
                    ErrorCategory::Http4xx
                } else if (500..600).contains(status) {
                    ErrorCategory::Http5xx
                } else {
                    ErrorCategory::Unknown
                }
            }
            ClientError::ProtocolMismatch(_) => ErrorCategory::Protocol,
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Records request metrics through the `metrics` facade.
///
/// Disabled collectors (the default) record nothing.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Recorder for one logical call to `endpoint`, covering all of its attempts.
    pub fn request(&self, endpoint: &str, method: &str) -> Option<RequestRecorder> {
        self.enabled.then(|| RequestRecorder {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        })
    }
}

/// Labels for one logical call. Obtained from [`MetricsCollector::request`].
#[derive(Debug, Clone)]
pub struct RequestRecorder {
    endpoint: String,
    method: String,
}

impl RequestRecorder {
    /// An attempt is about to be sent. `attempt` is 0 for the first try.
    pub fn attempt(&self, attempt: usize) {
        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => self.endpoint.clone(),
            "method" => self.method.clone(),
        )
        .increment(1);

        if attempt > 0 {
            metrics::counter!(METRIC_RETRIES_TOTAL,
                "endpoint" => self.endpoint.clone(),
                "method" => self.method.clone(),
                "attempt" => attempt.to_string(),
            )
            .increment(1);
        }
    }

    /// An attempt finished. `status` is `None` when no response arrived.
    pub fn finished(&self, elapsed: Duration, status: Option<u16>) {
        let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => self.endpoint.clone(),
            "method" => self.method.clone(),
            "status" => status,
        )
        .record(elapsed.as_secs_f64());
    }

    /// The call failed for good.
    pub fn failed(&self, error: &ClientError) {
        let category = ErrorCategory::from(error);
        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => self.endpoint.clone(),
            "method" => self.method.clone(),
            "error_category" => category.as_str(),
        )
        .increment(1);

        if category == ErrorCategory::Protocol {
            metrics::counter!(METRIC_PROTOCOL_MISMATCHES, "endpoint" => self.endpoint.clone())
                .increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization() {
        let server = |status| ClientError::Server {
            status,
            url: "u".into(),
            message: "m".into(),
        };
        assert_eq!(ErrorCategory::from(&server(404)), ErrorCategory::Http4xx);
        assert_eq!(ErrorCategory::from(&server(503)), ErrorCategory::Http5xx);
        assert_eq!(ErrorCategory::from(&server(401)), ErrorCategory::Auth);
        assert_eq!(
            ErrorCategory::from(&ClientError::Timeout),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorCategory::from(&ClientError::ProtocolMismatch("x".into())),
            ErrorCategory::Protocol
        );
        assert_eq!(
            ErrorCategory::from(&ClientError::MaxRetriesExceeded {
                attempts: 4,
                last_status: 429
            }),
            ErrorCategory::Http4xx
        );
    }

    #[test]
    fn test_disabled_collector_hands_out_no_recorder() {
        assert!(MetricsCollector::new().request("/health", "GET").is_some());
        assert!(MetricsCollector::disabled().request("/health", "GET").is_none());
        assert!(!MetricsCollector::default().is_enabled());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let recorder = MetricsCollector::new()
            .request("/logs/search", "POST")
            .unwrap();
        recorder.attempt(0);
        recorder.attempt(1);
        recorder.finished(Duration::from_millis(12), Some(200));
        recorder.failed(&ClientError::Timeout);
    }
}
