//! Health command implementation.
//!
//! Exits non-zero when the service reports anything other than healthy,
//! after printing the full report.

use anyhow::{Result, bail};
use tokio_util::sync::CancellationToken;

use crate::args::OutputFormat;
use crate::cancellation::Cancelled;
use crate::context::CommandContext;
use crate::formatters::get_formatter;

pub async fn run(
    context: &CommandContext,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = context.anonymous_client()?;

    let health = tokio::select! {
        _ = cancel.cancelled() => return Err(Cancelled.into()),
        health = client.health() => health?,
    };

    print!("{}", get_formatter(format).format_health(&health)?);
    if !health.is_healthy() {
        bail!("Service is {}", health.status);
    }
    Ok(())
}
