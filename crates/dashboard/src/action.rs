//! Messages delivered to the dashboard controller.
//!
//! Background work (fetch tasks, the live timer, the notice decay timer)
//! never touches controller state directly. It sends an [`Action`] through
//! the controller's channel and the controller applies it.

use sentinel_client::{ClientError, SearchResult};
use std::fmt;
use std::sync::Arc;

/// Why a fetch was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Search, filter, pagination or saved-search load. Shows the loader.
    Interactive,
    /// Manual refresh of the current page.
    Refresh,
    /// Live refresh tick.
    Live,
}

impl FetchKind {
    pub fn shows_loader(self) -> bool {
        matches!(self, FetchKind::Interactive)
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchKind::Interactive => "interactive",
            FetchKind::Refresh => "refresh",
            FetchKind::Live => "live",
        })
    }
}

/// Unified action type for the controller's channel.
#[derive(Debug, Clone)]
pub enum Action {
    /// The live timer fired. `generation` identifies the timer instance.
    Tick { generation: u64 },
    /// A fetch finished, successfully or not.
    FetchCompleted {
        seq: u64,
        kind: FetchKind,
        result: Result<SearchResult, Arc<ClientError>>,
    },
    /// The "new entries" notice with this generation has timed out.
    NoticeExpired { generation: u64 },
}
