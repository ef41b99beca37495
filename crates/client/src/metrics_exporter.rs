//! Prometheus scrape endpoint for the request metrics in [`crate::metrics`].
//!
//! Must be installed from inside a Tokio runtime; the HTTP listener runs
//! as a background task for the life of the process.

use std::net::{AddrParseError, SocketAddr};

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use thiserror::Error;
use tracing::info;

use crate::metrics::METRIC_REQUEST_DURATION;

/// Latency buckets in seconds, sized for a search API behind a proxy.
const LATENCY_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 15.0, 30.0];

#[derive(Debug, Error)]
pub enum MetricsExporterError {
    #[error("metrics bind address '{addr}' is not a socket address: {source}")]
    BadAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("could not start Prometheus exporter: {0}")]
    Install(#[from] BuildError),
}

/// A running exporter. Dropping it does not stop the listener.
#[derive(Debug)]
pub struct MetricsExporter {
    listen: SocketAddr,
}

impl MetricsExporter {
    /// Parse `addr`, register the global recorder and start serving `/metrics`.
    pub fn install(addr: &str) -> Result<Self, MetricsExporterError> {
        let listen = addr
            .parse::<SocketAddr>()
            .map_err(|source| MetricsExporterError::BadAddress {
                addr: addr.to_string(),
                source,
            })?;

        PrometheusBuilder::new()
            .with_http_listener(listen)
            .set_buckets_for_metric(
                Matcher::Full(METRIC_REQUEST_DURATION.to_string()),
                LATENCY_BUCKETS,
            )?
            .install()?;

        info!(%listen, "Serving Prometheus metrics");
        Ok(Self { listen })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.listen
    }
}
