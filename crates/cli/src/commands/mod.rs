//! Command implementations.
//!
//! Responsibilities:
//! - One module per subcommand, each exposing `run`.
//! - Shared helpers for building search parameters from flags and for
//!   driving the dashboard controller until a fetch settles.
//!
//! Does NOT handle:
//! - Argument parsing (see `args` module).
//! - Output rendering (see `formatters` module).

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use sentinel_client::{PageSize, SortOrder};
use sentinel_dashboard::{
    Dashboard, DashboardError, DashboardEvent, FilterField, SearchBackend, SessionHandler,
    TimeRange, UiState, ValidationError,
};
use tokio_util::sync::CancellationToken;

use crate::args::{FilterArgs, PageArgs};
use crate::cancellation::Cancelled;
use crate::formatters::{Formatter, LogPage};

pub mod export;
pub mod health;
pub mod saved;
pub mod search;
pub mod settings;
pub mod stats;
pub mod tail;
pub mod threats;

/// Validate a `--page-size` value, falling back to `default`.
pub(crate) fn page_size_or(size: Option<u32>, default: PageSize) -> Result<PageSize, ValidationError> {
    match size {
        Some(n) => PageSize::new(n).map_err(|e| ValidationError::InvalidPageSize(e.0)),
        None => Ok(default),
    }
}

/// Search parameters from filter flags, over the default window when none is given.
pub(crate) fn ui_state(
    filters: &FilterArgs,
    page_size: PageSize,
    now: DateTime<Utc>,
) -> Result<UiState, ValidationError> {
    let range = filters
        .window
        .range(now)?
        .unwrap_or_else(|| TimeRange::default_at(now));
    let mut ui = UiState::new(range, page_size);
    if let Some(ref text) = filters.query {
        ui.set_query_text(text.as_str());
    }
    for (field, value) in filter_values(filters) {
        ui.set_filter(field, value);
    }
    Ok(ui)
}

/// Apply page and ordering flags to `ui`.
pub(crate) fn apply_page_args(ui: &mut UiState, page: &PageArgs) {
    ui.page = page.page.max(1);
    if let Some(ref field) = page.sort_by {
        ui.sort_by = field.clone();
    }
    match page.sort_order.as_deref() {
        Some("asc") => ui.sort_order = SortOrder::Asc,
        Some("desc") => ui.sort_order = SortOrder::Desc,
        _ => {}
    }
}

/// Copy filter flags into a dashboard. Nothing is fetched.
///
/// `fallback` is the window used when the flags name none.
pub(crate) fn apply_filters<B: SearchBackend, S: SessionHandler>(
    dash: &mut Dashboard<B, S>,
    filters: &FilterArgs,
    fallback: TimeRange,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    let range = filters.window.range(now)?.unwrap_or(fallback);
    dash.set_time_range(range.start, range.end)?;
    if let Some(ref text) = filters.query {
        dash.set_query_text(text.as_str());
    }
    for (field, value) in filter_values(filters) {
        dash.set_filter(field, value);
    }
    Ok(())
}

fn filter_values(filters: &FilterArgs) -> impl Iterator<Item = (FilterField, &str)> {
    [
        (FilterField::Severity, &filters.severity),
        (FilterField::Facility, &filters.facility),
        (FilterField::Hostname, &filters.hostname),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
}

/// Drive the dashboard until fetch `seq` is applied or fails.
///
/// Events for other fetches are applied along the way.
pub(crate) async fn await_fetch<B: SearchBackend, S: SessionHandler>(
    dash: &mut Dashboard<B, S>,
    seq: u64,
    cancel: &CancellationToken,
) -> Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => return Err(Cancelled.into()),
            event = dash.next_event() => event,
        };
        match event {
            Some(DashboardEvent::Applied { seq: applied, .. }) if applied == seq => return Ok(()),
            Some(DashboardEvent::Failed {
                seq: failed, error, ..
            }) if failed == seq => return Err(DashboardError::Client(error).into()),
            Some(DashboardEvent::Discarded { seq: dropped, .. }) if dropped == seq => {
                bail!("Fetch {seq} was superseded by a newer request")
            }
            Some(_) => {}
            None => bail!("Dashboard event channel closed"),
        }
    }
}

/// Render the page currently held by the dashboard.
pub(crate) fn render_page<B: SearchBackend, S: SessionHandler>(
    dash: &Dashboard<B, S>,
    formatter: &dyn Formatter,
) -> Result<String> {
    formatter.format_logs(&LogPage {
        entries: dash.logs(),
        pagination: dash.pagination(),
        stats: dash.stats(),
    })
}
