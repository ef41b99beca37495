//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define the exit codes scripts use to tell failure classes apart.
//! - Find the most specific known error in an `anyhow` chain and map it.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see `main` and `cancellation`).
//!
//! Invariants:
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use sentinel_client::{ClientError, ErrorKind};
use sentinel_config::{ConfigError, SettingsError};
use sentinel_dashboard::{DashboardError, ValidationError};

/// Structured exit codes for sentinel-cli.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,

    /// Unhandled or generic failure, including network and server errors.
    GeneralError = 1,

    /// Rejected input: bad time window, page size or setting value.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 2,

    /// Missing credentials, failed login or a rejected session.
    ///
    /// Scripts should refresh credentials before retrying.
    AuthenticationFailed = 3,

    /// SIGINT/Ctrl+C (128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err.kind() {
            ErrorKind::Auth => ExitCode::AuthenticationFailed,
            ErrorKind::Network
            | ErrorKind::Server
            | ErrorKind::ProtocolMismatch
            | ErrorKind::Config => ExitCode::GeneralError,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::MissingAuth => ExitCode::AuthenticationFailed,
            ConfigError::InvalidValue { .. }
            | ConfigError::InvalidTimeout { .. }
            | ConfigError::InvalidMaxRetries { .. }
            | ConfigError::MissingBaseUrl => ExitCode::ValidationError,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<&DashboardError> for ExitCode {
    fn from(err: &DashboardError) -> Self {
        match err {
            DashboardError::Validation(_) => ExitCode::ValidationError,
            DashboardError::Client(client) => Self::from(client.as_ref()),
            _ => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// The exit code for the first recognised error in the chain.
    ///
    /// Returns `ExitCode::GeneralError` when nothing in the chain is recognised.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<DashboardError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(err);
            }
            if cause.downcast_ref::<ValidationError>().is_some() {
                return ExitCode::ValidationError;
            }
            if let Some(err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(err);
            }
            if let Some(SettingsError::Invalid(err)) = cause.downcast_ref::<SettingsError>() {
                return ExitCode::from(err);
            }
        }
        ExitCode::GeneralError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::ValidationError.as_i32(), 2);
        assert_eq!(ExitCode::AuthenticationFailed.as_i32(), 3);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(
            ExitCode::from(&ClientError::Auth("expired".into())),
            ExitCode::AuthenticationFailed
        );
        let unauthorized = ClientError::Server {
            status: 401,
            url: "http://localhost:8000/logs/search".into(),
            message: "Not authenticated".into(),
        };
        assert_eq!(ExitCode::from(&unauthorized), ExitCode::AuthenticationFailed);
        assert_eq!(ExitCode::from(&ClientError::Timeout), ExitCode::GeneralError);
    }

    #[test]
    fn test_chain_is_searched() {
        let err = anyhow::Error::from(DashboardError::from(ValidationError::EndBeforeStart))
            .context("search failed");
        assert_eq!(err.exit_code(), ExitCode::ValidationError);

        let err = Err::<(), _>(ClientError::Auth("bad password".into()))
            .context("login")
            .unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::AuthenticationFailed);

        assert_eq!(anyhow::anyhow!("other").exit_code(), ExitCode::GeneralError);
    }

    #[test]
    fn test_config_errors() {
        let err = anyhow::Error::from(ConfigError::MissingAuth);
        assert_eq!(err.exit_code(), ExitCode::AuthenticationFailed);
        let err = anyhow::Error::from(ConfigError::InvalidTimeout {
            message: "must be between 1 and 300 seconds (got 0)".into(),
        });
        assert_eq!(err.exit_code(), ExitCode::ValidationError);
    }
}
