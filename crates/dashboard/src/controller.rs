//! Query / live-refresh controller.
//!
//! Responsibilities:
//! - Own the search parameters, the applied result, stats and the error banner.
//! - Dispatch fetches as background tasks and apply their results in
//!   sequence order.
//! - Drive the live refresh scheduler and the "new entries" notice.
//!
//! Does NOT handle:
//! - Rendering (callers read the state through the accessor methods).
//! - Session storage or login (see [`SessionHandler`]).
//!
//! Invariants:
//! - State only changes on the caller's task, in the action methods or in
//!   [`Dashboard::handle`]. Background tasks communicate through [`Action`]s.
//! - A completion (success or failure) is handled only if its sequence id
//!   is the highest settled so far; older completions are dropped.
//! - A failed fetch keeps the previously applied entries visible.
//! - An auth failure stops live refresh and notifies the session handler.

use chrono::{DateTime, Utc};
use sentinel_client::{ClientError, LogEntry, PageSize};
use sentinel_config::SystemSettings;
use sentinel_config::constants::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_LIVE_END_MARGIN_SECS, DEFAULT_NOTICE_DECAY_SECS,
    DEFAULT_REFRESH_INTERVAL_SECS,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::action::{Action, FetchKind};
use crate::backend::SearchBackend;
use crate::error::{DashboardError, ValidationError};
use crate::export::{self, ExportError, ExportFormat};
use crate::pagination::Pagination;
use crate::query::{self, FilterField, UiState};
use crate::saved::{SavedSearch, SavedSearchStore};
use crate::scheduler::{LiveScheduler, SchedulerState};
use crate::sequence::SequenceGuard;
use crate::session::{LogSessionHandler, SessionHandler};
use crate::stats::{self, Stats};
use crate::time_range::{self, QuickRange, TimeRange};

/// Tunables, usually derived from [`SystemSettings`].
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub page_size: PageSize,
    /// Start with live refresh on.
    pub live: bool,
    /// Live refresh period. Zero disables the timer.
    pub refresh_interval: Duration,
    /// How far past "now" live ticks push the window's end.
    pub live_end_margin: Duration,
    pub notifications: bool,
    pub notice_decay: Duration,
    pub channel_capacity: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            live: false,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            live_end_margin: Duration::from_secs(DEFAULT_LIVE_END_MARGIN_SECS),
            notifications: true,
            notice_decay: Duration::from_secs(DEFAULT_NOTICE_DECAY_SECS),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl DashboardOptions {
    pub fn from_settings(settings: &SystemSettings) -> Self {
        Self {
            page_size: PageSize::new(settings.logs_per_page).unwrap_or_default(),
            live: settings.enable_auto_refresh,
            refresh_interval: Duration::from_secs(settings.refresh_interval),
            live_end_margin: settings.live_end_margin(),
            notifications: settings.enable_notifications,
            ..Self::default()
        }
    }
}

/// Live refresh part of the read model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshState {
    pub is_live: bool,
    pub interval: Duration,
    pub state: SchedulerState,
    pub last_fetch_at: Option<DateTime<Utc>>,
    pub new_since_last_notice: u64,
}

/// What handling one [`Action`] did.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A result was applied.
    Applied {
        seq: u64,
        kind: FetchKind,
        total: u64,
        new_entries: Option<u64>,
    },
    /// A response arrived after a newer one had been applied.
    Discarded { seq: u64, kind: FetchKind },
    /// A fetch failed; the error is now in the banner.
    Failed {
        seq: u64,
        kind: FetchKind,
        error: Arc<ClientError>,
    },
    /// A live tick started a fetch.
    TickDispatched { seq: u64 },
    /// A tick arrived from a cancelled timer, or the live window was invalid.
    TickSkipped,
    /// The "new entries" notice timed out.
    NoticeCleared,
    /// Nothing to do (superseded notice timer).
    Ignored,
}

/// The dashboard controller.
pub struct Dashboard<B: SearchBackend, S: SessionHandler = LogSessionHandler> {
    backend: Arc<B>,
    session: Arc<S>,
    saved: SavedSearchStore,
    options: DashboardOptions,

    ui: UiState,
    entries: Vec<LogEntry>,
    stats: Stats,
    error: Option<DashboardError>,
    last_fetch_at: Option<DateTime<Utc>>,
    new_since_last_notice: u64,
    notice_generation: u64,
    loading_seq: Option<u64>,
    refreshing_seq: Option<u64>,
    /// `ui.end_time` was pushed forward by a live tick.
    end_extended: bool,

    sequence: SequenceGuard,
    scheduler: LiveScheduler,
    tx: Sender<Action>,
    rx: Receiver<Action>,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl<B: SearchBackend, S: SessionHandler> Dashboard<B, S> {
    /// Create a controller over the default seven-day window.
    ///
    /// Nothing is fetched until an action asks for it. With `options.live`
    /// set the live timer starts immediately, which requires a Tokio runtime.
    pub fn new(
        backend: Arc<B>,
        session: Arc<S>,
        saved: SavedSearchStore,
        options: DashboardOptions,
    ) -> Self {
        let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));
        let shutdown = CancellationToken::new();
        let tasks = TaskTracker::new();
        let mut scheduler = LiveScheduler::new(
            options.refresh_interval,
            tx.clone(),
            shutdown.clone(),
            tasks.clone(),
        );
        if options.live {
            scheduler.set_live(true);
        }

        Self {
            backend,
            session,
            saved,
            ui: UiState::new(TimeRange::default_at(Utc::now()), options.page_size),
            options,
            entries: Vec::new(),
            stats: Stats::default(),
            error: None,
            last_fetch_at: None,
            new_since_last_notice: 0,
            notice_generation: 0,
            loading_seq: None,
            refreshing_seq: None,
            end_extended: false,
            sequence: SequenceGuard::new(),
            scheduler,
            tx,
            rx,
            shutdown,
            tasks,
        }
    }

    // ---------------------------------------------------------------------
    // Read model
    // ---------------------------------------------------------------------

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn total(&self) -> u64 {
        self.stats.total
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.ui.page,
            page_size: self.ui.page_size,
            total: self.stats.total,
        }
    }

    pub fn refresh_state(&self) -> RefreshState {
        RefreshState {
            is_live: self.scheduler.is_live(),
            interval: self.scheduler.interval(),
            state: self.scheduler.state(),
            last_fetch_at: self.last_fetch_at,
            new_since_last_notice: self.new_since_last_notice,
        }
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// The banner error, if any.
    pub fn error(&self) -> Option<&DashboardError> {
        self.error.as_ref()
    }

    /// An interactive fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading_seq.is_some()
    }

    /// A background (refresh or live) fetch is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing_seq.is_some()
    }

    pub fn has_active_filters(&self) -> bool {
        self.ui.has_active_filters()
    }

    pub fn saved_searches(&self) -> &[SavedSearch] {
        self.saved.list()
    }

    // ---------------------------------------------------------------------
    // Parameter mutators (no fetch)
    // ---------------------------------------------------------------------

    /// Set the free-text query. A non-blank query suspends live refresh.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.ui.set_query_text(text);
        self.scheduler.set_query_active(self.ui.has_query_text());
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.ui.set_filter(field, value);
    }

    /// Set an explicit window. Rejected windows leave the current one in place.
    pub fn set_time_range(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let range = TimeRange::new(start, end)?;
        self.ui.set_range(range);
        self.end_extended = false;
        Ok(())
    }

    pub fn apply_quick_range(&mut self, preset: QuickRange) {
        self.ui.set_range(preset.range_at(Utc::now()));
        self.end_extended = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ---------------------------------------------------------------------
    // Fetching actions
    // ---------------------------------------------------------------------

    /// Fetch with the current parameters. Returns the sequence id.
    pub fn search(&mut self) -> Result<u64, DashboardError> {
        self.fetch(FetchKind::Interactive)
    }

    /// Go back to the first page and fetch.
    pub fn apply_filters(&mut self) -> Result<u64, DashboardError> {
        self.ui.page = 1;
        self.fetch(FetchKind::Interactive)
    }

    /// Clear the query and every filter, restore the default window, and fetch.
    pub fn clear_filters(&mut self) -> Result<u64, DashboardError> {
        self.ui.clear_filters(TimeRange::default_at(Utc::now()));
        self.end_extended = false;
        self.scheduler.set_query_active(false);
        self.fetch(FetchKind::Interactive)
    }

    /// Go to page `n`, clamped to the known page count, and fetch.
    pub fn set_page(&mut self, n: u32) -> Result<u64, DashboardError> {
        self.ui.page = self.pagination().clamp_page(n);
        self.fetch(FetchKind::Interactive)
    }

    /// Change the page size, go back to page 1, and fetch.
    pub fn set_page_size(&mut self, size: u32) -> Result<u64, DashboardError> {
        let size = PageSize::new(size).map_err(|e| ValidationError::InvalidPageSize(e.0))?;
        self.ui.page_size = size;
        self.ui.page = 1;
        self.fetch(FetchKind::Interactive)
    }

    /// Re-fetch the current page without the loader.
    pub fn refresh(&mut self) -> Result<u64, DashboardError> {
        self.fetch(FetchKind::Refresh)
    }

    pub fn set_live(&mut self, live: bool) {
        self.scheduler.set_live(live);
    }

    /// Change the live period. Zero turns the timer off.
    pub fn set_interval(&mut self, interval: Duration) {
        self.scheduler.set_interval(interval);
    }

    /// Load a saved search into the form and fetch its first page.
    pub fn load_saved_search(&mut self, id: &str) -> Result<u64, DashboardError> {
        let params = self
            .saved
            .get(id)
            .map(|s| s.params.clone())
            .ok_or_else(|| DashboardError::SavedSearchNotFound(id.to_string()))?;
        self.ui.load_query(&params);
        self.end_extended = false;
        self.scheduler.set_query_active(self.ui.has_query_text());
        self.fetch(FetchKind::Interactive)
    }

    /// Save the current parameters under `name`.
    pub fn save_current_search(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<SavedSearch, DashboardError> {
        self.saved.save(name, description, query::build(&self.ui))
    }

    pub fn delete_saved_search(&mut self, id: &str) -> Result<bool, DashboardError> {
        Ok(self.saved.delete(id)?)
    }

    /// Write the entries currently displayed.
    pub fn export_current_page<W: Write>(
        &self,
        format: ExportFormat,
        writer: W,
    ) -> Result<(), ExportError> {
        export::write_entries(&self.entries, format, writer)
    }

    // ---------------------------------------------------------------------
    // Event loop
    // ---------------------------------------------------------------------

    /// Wait for the next background action and apply it.
    pub async fn next_event(&mut self) -> Option<DashboardEvent> {
        let action = self.rx.recv().await?;
        Some(self.handle(action))
    }

    /// Apply an already-queued action, if there is one.
    pub fn try_next_event(&mut self) -> Option<DashboardEvent> {
        let action = self.rx.try_recv().ok()?;
        Some(self.handle(action))
    }

    /// Apply one action to the controller state.
    pub fn handle(&mut self, action: Action) -> DashboardEvent {
        match action {
            Action::Tick { generation } => self.on_tick(generation),
            Action::FetchCompleted { seq, kind, result } => match result {
                Ok(result) => self.on_fetch_ok(seq, kind, result),
                Err(error) => self.on_fetch_err(seq, kind, error),
            },
            Action::NoticeExpired { generation } => {
                if generation == self.notice_generation && self.new_since_last_notice > 0 {
                    self.new_since_last_notice = 0;
                    DashboardEvent::NoticeCleared
                } else {
                    DashboardEvent::Ignored
                }
            }
        }
    }

    /// Stop the timer, cancel in-flight work and wait for background tasks.
    pub async fn shutdown(&mut self) {
        self.scheduler.stop();
        self.shutdown.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        info!("Dashboard stopped");
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn fetch(&mut self, kind: FetchKind) -> Result<u64, DashboardError> {
        if !self.end_extended {
            time_range::validate(self.ui.start_time, self.ui.end_time)?;
        } else if self.ui.end_time < self.ui.start_time {
            return Err(ValidationError::EndBeforeStart.into());
        }
        let query = query::build(&self.ui);
        Ok(self.dispatch(kind, query))
    }

    fn dispatch(&mut self, kind: FetchKind, query: sentinel_client::SearchQuery) -> u64 {
        let seq = self.sequence.dispatch();
        if kind.shows_loader() {
            self.loading_seq = Some(seq);
        } else {
            self.refreshing_seq = Some(seq);
        }
        debug!(seq, kind = %kind, page = query.page, page_size = %query.page_size, "Dispatching fetch");

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let cancel = self.shutdown.clone();
        self.tasks.spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = backend.search(&query) => result.map_err(Arc::new),
            };
            let _ = tx.send(Action::FetchCompleted { seq, kind, result }).await;
        });
        seq
    }

    fn on_tick(&mut self, generation: u64) -> DashboardEvent {
        if !self.scheduler.accepts_tick(generation) {
            debug!(generation, "Ignoring tick from a cancelled timer");
            return DashboardEvent::TickSkipped;
        }

        // The window was validated when it was set. Only the end moves here,
        // and the margin may carry it past the maximum span.
        let margin = chrono::Duration::from_std(self.options.live_end_margin)
            .unwrap_or_else(|_| chrono::Duration::days(1));
        let end = Utc::now() + margin;
        if end < self.ui.start_time {
            warn!(
                start = %self.ui.start_time,
                %end,
                "Live window starts in the future, skipping tick"
            );
            return DashboardEvent::TickSkipped;
        }

        self.ui.end_time = end;
        self.end_extended = true;
        let seq = self.dispatch(FetchKind::Live, query::build(&self.ui));
        DashboardEvent::TickDispatched { seq }
    }

    fn on_fetch_ok(
        &mut self,
        seq: u64,
        kind: FetchKind,
        result: sentinel_client::SearchResult,
    ) -> DashboardEvent {
        self.clear_pending(seq);
        if !self.sequence.try_settle(seq) {
            debug!(seq, kind = %kind, "Discarding stale response");
            return DashboardEvent::Discarded { seq, kind };
        }

        let aggregate = stats::aggregate(&self.stats, &result);
        self.stats = aggregate.stats;
        self.entries = result.entries;
        self.last_fetch_at = Some(Utc::now());
        self.error = None;

        let new_entries = aggregate.new_entries.filter(|_| self.options.notifications);
        if let Some(delta) = new_entries {
            self.raise_notice(delta);
        }
        debug!(seq, kind = %kind, total = self.stats.total, entries = self.entries.len(), "Applied search result");

        DashboardEvent::Applied {
            seq,
            kind,
            total: self.stats.total,
            new_entries,
        }
    }

    fn on_fetch_err(
        &mut self,
        seq: u64,
        kind: FetchKind,
        error: Arc<ClientError>,
    ) -> DashboardEvent {
        self.clear_pending(seq);
        if !self.sequence.try_settle(seq) {
            debug!(seq, kind = %kind, error = %error, "Discarding stale failure");
            return DashboardEvent::Discarded { seq, kind };
        }

        if error.is_auth_error() {
            warn!(seq, error = %error, "Session rejected, stopping live refresh");
            self.scheduler.stop();
            self.session.on_session_invalidated(&error);
        } else if kind == FetchKind::Live {
            warn!(seq, error = %error, "Live refresh failed, will retry on next tick");
        } else {
            warn!(seq, kind = %kind, error = %error, "Search failed");
        }

        self.error = Some(DashboardError::Client(Arc::clone(&error)));
        DashboardEvent::Failed { seq, kind, error }
    }

    fn clear_pending(&mut self, seq: u64) {
        if self.loading_seq.is_some_and(|pending| seq >= pending) {
            self.loading_seq = None;
        }
        if self.refreshing_seq.is_some_and(|pending| seq >= pending) {
            self.refreshing_seq = None;
        }
    }

    fn raise_notice(&mut self, delta: u64) {
        self.new_since_last_notice = delta;
        self.notice_generation += 1;
        let generation = self.notice_generation;
        let decay = self.options.notice_decay;
        let tx = self.tx.clone();
        let cancel = self.shutdown.clone();

        info!(new_entries = delta, "New log entries since last fetch");
        self.tasks.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(decay) => {
                    let _ = tx.send(Action::NoticeExpired { generation }).await;
                }
            }
        });
    }
}

impl<B: SearchBackend, S: SessionHandler> Drop for Dashboard<B, S> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
