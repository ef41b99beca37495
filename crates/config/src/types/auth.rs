//! Authentication types for the dashboard configuration.
//!
//! Credentials only ever come from flags or the environment; they are
//! never written to the state file.
//!
//! Invariants:
//! - Passwords and tokens are held as `secrecy::SecretString` and never appear in `Debug`.

use secrecy::SecretString;

/// Strategy for authenticating with the search API.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Username and password, exchanged for an access token at `/auth/login`.
    Credentials {
        username: String,
        password: SecretString,
    },
    /// A previously issued bearer token.
    Token { token: SecretString },
}

impl AuthStrategy {
    /// Short name for logs: `credentials` or `token`.
    pub const fn kind(&self) -> &'static str {
        match self {
            AuthStrategy::Credentials { .. } => "credentials",
            AuthStrategy::Token { .. } => "token",
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub strategy: AuthStrategy,
}
