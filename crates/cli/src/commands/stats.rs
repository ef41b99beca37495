//! Stats command: server-side aggregates, as opposed to the page-local
//! counts printed under search results.

use anyhow::Result;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::args::{OutputFormat, WindowArgs};
use crate::cancellation::Cancelled;
use crate::context::CommandContext;
use crate::formatters::get_formatter;

pub async fn run(
    context: &CommandContext,
    window: &WindowArgs,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let range = window.range(Utc::now())?;
    let client = context.client()?;

    let statistics = tokio::select! {
        _ = cancel.cancelled() => return Err(Cancelled.into()),
        statistics = client.statistics(range.map(|r| r.start), range.map(|r| r.end)) => statistics?,
    };

    print!("{}", get_formatter(format).format_statistics(&statistics)?);
    Ok(())
}
