//! REST API endpoint implementations.
//!
//! Free functions taking the HTTP client, base URL and (where needed) a
//! bearer token. Session handling lives in [`crate::client`].

mod auth;
mod health;
mod request;
mod search;

pub use auth::login;
pub use health::health;
pub use request::{parse_error_message, send_request_with_retry};
pub use search::{search_logs, statistics, threat_logs};
