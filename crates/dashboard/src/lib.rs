//! Query and live-refresh controller for the Sentinel log dashboard.
//!
//! The [`Dashboard`] owns the search parameters, pagination, the applied
//! result and its stats, and the live refresh scheduler. Fetches run as
//! background tasks against a [`SearchBackend`] and are applied in
//! sequence order through [`Dashboard::next_event`].

pub mod action;
pub mod backend;
pub mod controller;
pub mod error;
pub mod export;
pub mod pagination;
pub mod query;
pub mod saved;
pub mod scheduler;
pub mod sequence;
pub mod session;
pub mod stats;
pub mod time_range;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use action::{Action, FetchKind};
pub use backend::SearchBackend;
pub use controller::{Dashboard, DashboardEvent, DashboardOptions, RefreshState};
pub use error::{DashboardError, ValidationError};
pub use export::{ExportError, ExportFormat};
pub use pagination::Pagination;
pub use query::{FilterField, UiState};
pub use saved::{SavedSearch, SavedSearchStore};
pub use scheduler::{LiveScheduler, SchedulerState};
pub use sequence::SequenceGuard;
pub use session::{LogSessionHandler, SessionHandler};
pub use stats::{Aggregate, Stats};
pub use time_range::{QuickRange, RelativeRange, TimeRange};
