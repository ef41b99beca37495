//! Ctrl+C handling for commands.
//!
//! Commands select on a shared `CancellationToken` around every network
//! await and return `Cancelled` when it fires; `main` turns that into
//! exit code 130.

use tokio_util::sync::CancellationToken;

/// Returned by a command that stopped because the user pressed Ctrl+C.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("interrupted by user")]
pub struct Cancelled;

impl Cancelled {
    /// Whether `err` (or anything it wraps) is a cancellation.
    pub fn is_in(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| cause.is::<Cancelled>())
    }
}

/// Cancel `token` on the first Ctrl+C.
pub fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => token.cancel(),
            Err(e) => tracing::warn!(error = %e, "Ctrl+C handler unavailable"),
        }
    });
}
