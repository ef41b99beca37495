//! Sentinel CLI - command-line front end for the log dashboard.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Install logging and, on request, the Prometheus metrics exporter.
//! - Run the selected command and map its outcome to an exit code.
//!
//! Does NOT handle:
//! - Query state, live refresh or result aggregation (see `crates/dashboard`).
//! - HTTP details (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide clap defaults.
//! - Logs go to stderr; stdout carries command output only.

mod args;
mod cancellation;
mod commands;
mod context;
mod dispatch;
mod error;
mod formatters;

use args::{Cli, LogFormat};
use cancellation::{Cancelled, cancel_on_interrupt};
use clap::Parser;
use context::CommandContext;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use sentinel_client::metrics_exporter::MetricsExporter;
use sentinel_config::ConfigLoader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // .env must be loaded before clap reads its `env` defaults
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        fail(
            format_args!("Failed to load environment: {e}"),
            ExitCode::GeneralError,
        );
    }

    let cli = Cli::parse();
    init_logging(cli.log_format);

    let exporter = match cli.metrics_bind.as_deref().map(MetricsExporter::install) {
        Some(Err(e)) => fail(
            format_args!("Failed to start metrics exporter: {e}"),
            ExitCode::GeneralError,
        ),
        Some(Ok(exporter)) => Some(exporter),
        None => None,
    };

    let context = match CommandContext::load(cli.connection.clone(), exporter.is_some()) {
        Ok(context) => context,
        Err(e) => fail(format_args!("{e:#}"), e.exit_code()),
    };

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    match run_command(cli.command, context, &cancel).await {
        Ok(()) => std::process::exit(ExitCode::Success.as_i32()),
        Err(e) if Cancelled::is_in(&e) => fail(format_args!("^C\nStopped by user"), ExitCode::Interrupted),
        Err(e) => fail(format_args!("{e:#}"), e.exit_code()),
    }
}

fn fail(message: std::fmt::Arguments<'_>, code: ExitCode) -> ! {
    eprintln!("{message}");
    std::process::exit(code.as_i32())
}

/// `RUST_LOG`-driven subscriber on stderr, `warn` by default.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr = fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(stderr).init(),
        LogFormat::Json => registry.with(stderr.json()).init(),
    }
}
