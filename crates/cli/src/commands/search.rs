//! Search command implementation.
//!
//! A single page is fetched straight through the query builder and the
//! client; no controller is needed since nothing is applied twice.

use anyhow::Result;
use chrono::Utc;
use sentinel_dashboard::stats::{self, Stats};
use sentinel_dashboard::{Pagination, query};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::args::{FilterArgs, OutputFormat, PageArgs};
use crate::cancellation::Cancelled;
use crate::commands::{apply_page_args, page_size_or, ui_state};
use crate::context::CommandContext;
use crate::formatters::{LogPage, get_formatter};

pub async fn run(
    context: &CommandContext,
    filters: &FilterArgs,
    page: &PageArgs,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let page_size = page_size_or(page.page_size, context.dashboard_options().page_size)?;
    let mut ui = ui_state(filters, page_size, Utc::now())?;
    apply_page_args(&mut ui, page);
    let search = query::build(&ui);

    let client = context.client()?;
    info!(page = search.page, page_size = %search.page_size, "Searching logs");

    let result = tokio::select! {
        _ = cancel.cancelled() => return Err(Cancelled.into()),
        result = client.search(&search) => result?,
    };

    let aggregate = stats::aggregate(&Stats::default(), &result);
    let pagination = Pagination {
        page: search.page,
        page_size: search.page_size,
        total: result.total,
    };

    let formatter = get_formatter(format);
    print!(
        "{}",
        formatter.format_logs(&LogPage {
            entries: &result.entries,
            pagination,
            stats: aggregate.stats,
        })?
    );
    Ok(())
}
