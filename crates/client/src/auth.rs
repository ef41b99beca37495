//! Authentication strategies and session management.
//!
//! Invariants:
//! - The bearer token is only ever held as a `SecretString`.
//! - Clearing the session never re-authenticates; calls fail until an
//!   explicit login stores a new token.

use secrecy::{ExposeSecret, SecretString};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Strategy for authenticating with the search API.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Username and password, exchanged for an access token at `/auth/login`.
    Credentials {
        username: String,
        password: SecretString,
    },
    /// A pre-issued bearer token. Never refreshed.
    Token { token: SecretString },
}

#[derive(Debug, Clone)]
struct SessionToken {
    value: SecretString,
    expires_at: Option<Instant>,
}

impl SessionToken {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()).is_zero())
            .unwrap_or(false)
    }
}

/// Mutable half of the session.
#[derive(Debug, Default)]
struct SessionState {
    token: Option<SessionToken>,
    revoked: bool,
}

/// Holds the active bearer token.
///
/// Shared by concurrent requests, so the state sits behind a lock that is
/// never held across an await point.
#[derive(Debug)]
pub struct SessionManager {
    auth_strategy: AuthStrategy,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Create a new session manager with the given auth strategy.
    pub fn new(strategy: AuthStrategy) -> Self {
        Self {
            auth_strategy: strategy,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Get the current auth strategy.
    pub fn strategy(&self) -> &AuthStrategy {
        &self.auth_strategy
    }

    /// Check if we're using a pre-issued token (no login needed).
    pub fn is_static_token(&self) -> bool {
        matches!(self.auth_strategy, AuthStrategy::Token { .. })
    }

    /// Bearer token for API requests, if one is available and not expired.
    pub fn bearer_token(&self) -> Option<String> {
        let state = self.state.read().ok()?;
        if state.revoked {
            return None;
        }
        match &self.auth_strategy {
            AuthStrategy::Token { token } => Some(token.expose_secret().to_string()),
            AuthStrategy::Credentials { .. } => state
                .token
                .as_ref()
                .filter(|t| !t.is_expired())
                .map(|t| t.value.expose_secret().to_string()),
        }
    }

    /// Store a token received from login, optionally with a lifetime.
    pub fn set_session_token(&self, token: String, ttl: Option<Duration>) {
        if let Ok(mut state) = self.state.write() {
            state.token = Some(SessionToken {
                value: SecretString::new(token.into()),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            });
            state.revoked = false;
        }
    }

    /// Whether a login is needed before the next request.
    pub fn needs_login(&self) -> bool {
        !self.is_static_token() && !self.is_revoked() && self.bearer_token().is_none()
    }

    /// Whether the server rejected the session and no new login has happened since.
    pub fn is_revoked(&self) -> bool {
        self.state.read().map(|s| s.revoked).unwrap_or(true)
    }

    /// Forget the current session after the server rejected it.
    ///
    /// The session stays revoked until an explicit login stores a new token.
    pub fn clear_session(&self) {
        if let Ok(mut state) = self.state.write() {
            state.token = None;
            state.revoked = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> AuthStrategy {
        AuthStrategy::Credentials {
            username: "admin".to_string(),
            password: SecretString::new("pass".to_string().into()),
        }
    }

    #[test]
    fn test_static_token_bypasses_login() {
        let manager = SessionManager::new(AuthStrategy::Token {
            token: SecretString::new("test-token".to_string().into()),
        });
        assert!(manager.is_static_token());
        assert!(!manager.needs_login());
        assert_eq!(manager.bearer_token().as_deref(), Some("test-token"));
    }

    #[test]
    fn test_credentials_require_login() {
        let manager = SessionManager::new(credentials());
        assert!(manager.needs_login());
        assert!(manager.bearer_token().is_none());

        manager.set_session_token("session-key".to_string(), None);
        assert!(!manager.needs_login());
        assert_eq!(manager.bearer_token().as_deref(), Some("session-key"));
    }

    #[test]
    fn test_expired_token_is_not_returned() {
        let manager = SessionManager::new(credentials());
        manager.set_session_token("session-key".to_string(), Some(Duration::ZERO));
        assert!(manager.bearer_token().is_none());
        assert!(manager.needs_login());
    }

    #[test]
    fn test_clear_session() {
        let manager = SessionManager::new(credentials());
        manager.set_session_token("session-key".to_string(), None);
        manager.clear_session();
        assert!(manager.bearer_token().is_none());
        assert!(manager.is_revoked());
        assert!(!manager.needs_login());

        manager.set_session_token("fresh".to_string(), None);
        assert!(!manager.is_revoked());
        assert_eq!(manager.bearer_token().as_deref(), Some("fresh"));

        let manager = SessionManager::new(AuthStrategy::Token {
            token: SecretString::new("static".to_string().into()),
        });
        manager.clear_session();
        assert!(manager.bearer_token().is_none());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let manager = SessionManager::new(credentials());
        manager.set_session_token("super-secret-session".to_string(), None);
        let debug = format!("{:?}", manager);
        assert!(!debug.contains("super-secret-session"));
    }
}
