//! Seam to whatever owns the user's session.

use sentinel_client::ClientError;
use tracing::warn;

/// Notified when the API rejects the session.
///
/// The dashboard cannot recover from an auth failure itself: it stops live
/// refresh and hands over to this handler, which typically clears stored
/// credentials and asks the user to log in again.
pub trait SessionHandler: Send + Sync + 'static {
    fn on_session_invalidated(&self, error: &ClientError);
}

/// Handler that only logs. Used when nothing else owns the session.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSessionHandler;

impl SessionHandler for LogSessionHandler {
    fn on_session_invalidated(&self, error: &ClientError) {
        warn!(error = %error, "Session invalidated, log in again to continue");
    }
}
