//! Export command: fetch one page through the controller and write it to a file.

use anyhow::Result;
use chrono::Utc;
use sentinel_dashboard::export::{self, ExportFormat};
use sentinel_dashboard::{Dashboard, LogSessionHandler, TimeRange};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::args::FilterArgs;
use crate::commands::{apply_filters, await_fetch};
use crate::context::CommandContext;

pub async fn run(
    context: &CommandContext,
    filters: &FilterArgs,
    page: u32,
    page_size: Option<u32>,
    format: ExportFormat,
    output: Option<PathBuf>,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = Arc::new(context.client()?);
    let mut dash = Dashboard::new(
        client,
        Arc::new(LogSessionHandler),
        context.saved_searches()?,
        context.dashboard_options(),
    );

    let result = fetch_page(&mut dash, filters, page, page_size, cancel).await;
    dash.shutdown().await;
    result?;

    let path = output.unwrap_or_else(|| PathBuf::from(export::default_filename(format, Utc::now())));
    export::export_to_path(dash.logs(), format, &path).await?;

    info!(path = %path.display(), entries = dash.logs().len(), "Export written");
    eprintln!("Exported {} entries to {}", dash.logs().len(), path.display());
    Ok(())
}

/// The page number is only known to be in range once the first page has
/// reported the total, so later pages take a second fetch.
async fn fetch_page(
    dash: &mut Dashboard<sentinel_client::SentinelClient>,
    filters: &FilterArgs,
    page: u32,
    page_size: Option<u32>,
    cancel: &CancellationToken,
) -> Result<()> {
    let now = Utc::now();
    apply_filters(dash, filters, TimeRange::default_at(now), now)?;
    let seq = match page_size {
        Some(size) => dash.set_page_size(size)?,
        None => dash.apply_filters()?,
    };
    await_fetch(dash, seq, cancel).await?;

    if page > 1 {
        let seq = dash.set_page(page)?;
        await_fetch(dash, seq, cancel).await?;
    }
    Ok(())
}
