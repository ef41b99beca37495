//! Threats command implementation.

use anyhow::Result;
use chrono::Utc;
use sentinel_client::ThreatQuery;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::args::{OutputFormat, WindowArgs};
use crate::cancellation::Cancelled;
use crate::context::CommandContext;
use crate::formatters::get_formatter;

pub async fn run(
    context: &CommandContext,
    window: &WindowArgs,
    threat_type: Option<String>,
    size: u32,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let range = window.range(Utc::now())?;
    let query = ThreatQuery {
        start_time: range.map(|r| r.start),
        end_time: range.map(|r| r.end),
        threat_type,
        size: Some(size),
    };

    let client = context.client()?;
    info!(size, "Fetching threat logs");

    let entries = tokio::select! {
        _ = cancel.cancelled() => return Err(Cancelled.into()),
        entries = client.threat_logs(&query) => entries?,
    };

    print!("{}", get_formatter(format).format_threats(&entries)?);
    Ok(())
}
