//! Tail command: the dashboard controller with live refresh armed.
//!
//! Every applied page is printed in full; entries that arrived since the
//! previous page are announced on stderr. Runs until Ctrl+C or an auth
//! failure.

use anyhow::{Result, bail};
use chrono::Utc;
use sentinel_dashboard::{
    Dashboard, DashboardError, DashboardEvent, DashboardOptions, LogSessionHandler, QuickRange,
    SchedulerState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::args::{FilterArgs, OutputFormat};
use crate::cancellation::Cancelled;
use crate::commands::{apply_filters, render_page};
use crate::context::CommandContext;
use crate::formatters::get_formatter;

pub async fn run(
    context: &CommandContext,
    filters: &FilterArgs,
    interval: Option<u64>,
    page_size: Option<u32>,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut options = DashboardOptions {
        live: true,
        ..DashboardOptions::from_settings(context.settings())
    };
    if let Some(secs) = interval {
        options.refresh_interval = Duration::from_secs(secs);
    }
    if options.refresh_interval.is_zero() {
        bail!("Live refresh is disabled (refresh_interval is 0); pass --interval");
    }

    let client = Arc::new(context.client()?);
    let now = Utc::now();
    let fallback = QuickRange::Last7Days.live_range_at(now, options.live_end_margin);
    let interval = options.refresh_interval;
    let mut dash = Dashboard::new(
        client,
        Arc::new(LogSessionHandler),
        context.saved_searches()?,
        options,
    );
    apply_filters(&mut dash, filters, fallback, now)?;
    match page_size {
        Some(size) => dash.set_page_size(size)?,
        None => dash.apply_filters()?,
    };

    if dash.scheduler_state() == SchedulerState::Suspended {
        eprintln!("Live refresh is paused while a free-text query is set");
    }
    info!(interval_secs = interval.as_secs(), "Tailing logs");

    let formatter = get_formatter(format);
    let outcome: Result<()> = loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break Err(Cancelled.into()),
            event = dash.next_event() => event,
        };
        match event {
            Some(DashboardEvent::Applied { new_entries, .. }) => {
                match render_page(&dash, formatter.as_ref()) {
                    Ok(output) => print!("{output}"),
                    Err(e) => break Err(e),
                }
                if let Some(count) = new_entries.filter(|n| *n > 0) {
                    eprintln!("{count} new entries");
                }
            }
            Some(DashboardEvent::Failed { error, .. }) if error.is_auth_error() => {
                break Err(DashboardError::Client(error).into());
            }
            Some(DashboardEvent::Failed { error, .. }) => {
                eprintln!("Error fetching logs: {error}");
            }
            Some(_) => {}
            None => break Ok(()),
        }
    };

    dash.shutdown().await;
    outcome
}
