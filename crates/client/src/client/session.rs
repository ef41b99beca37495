//! Client-level session handling.
//!
//! # Invariants
//! - Login is lazy: the first authenticated call logs in when using credentials
//! - Concurrent callers share one login through `login_lock`
//! - After the server rejects the session, calls fail with `ClientError::Auth`
//!   until [`SentinelClient::login`] succeeds again

use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::AuthStrategy;
use crate::client::SentinelClient;
use crate::endpoints;
use crate::error::{ClientError, Result};

impl SentinelClient {
    /// Whether the client authenticates with a pre-issued token.
    pub fn is_static_token_auth(&self) -> bool {
        self.session_manager
            .as_ref()
            .is_some_and(|s| s.is_static_token())
    }

    /// Current bearer token, logging in first if credentials allow it.
    pub(crate) async fn bearer_token(&self) -> Result<String> {
        let session = self
            .session_manager
            .as_ref()
            .ok_or_else(|| ClientError::Auth("no credentials configured".to_string()))?;

        if let Some(token) = session.bearer_token() {
            return Ok(token);
        }
        if !session.needs_login() {
            return Err(ClientError::Auth(
                "session was invalidated; log in again".to_string(),
            ));
        }

        let _guard = self.login_lock.lock().await;
        if let Some(token) = session.bearer_token() {
            return Ok(token);
        }
        self.login().await
    }

    /// Log in with the configured credentials and store the new token.
    ///
    /// Clears a previous invalidation.
    pub async fn login(&self) -> Result<String> {
        let session = self
            .session_manager
            .as_ref()
            .ok_or_else(|| ClientError::Auth("no credentials configured".to_string()))?;

        let AuthStrategy::Credentials { username, password } = session.strategy() else {
            return Err(ClientError::Auth(
                "cannot log in with a pre-issued token".to_string(),
            ));
        };

        let response = endpoints::login(
            &self.http,
            &self.base_url,
            username,
            password.expose_secret(),
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await?;

        debug!(
            token_type = %response.token_type,
            expires_in = ?response.expires_in,
            "Login succeeded"
        );
        session.set_session_token(
            response.access_token.clone(),
            response.expires_in.map(Duration::from_secs),
        );
        Ok(response.access_token)
    }

    /// Map a failed authenticated call, invalidating the session on 401.
    pub(crate) fn on_call_error(&self, err: ClientError) -> ClientError {
        if !err.is_auth_error() {
            return err;
        }
        if let Some(session) = &self.session_manager {
            session.clear_session();
        }
        warn!(error = %err, "Session rejected by server, credentials invalidated");
        match err {
            ClientError::Server { message, .. } => ClientError::Auth(message),
            other => other,
        }
    }
}
