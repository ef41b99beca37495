//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI commands to their handlers.
//! - Pass the cancellation token to every handler that waits on the network.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Settings and client construction (see `context` module).

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::args::Commands;
use crate::commands;
use crate::context::CommandContext;

pub(crate) async fn run_command(
    command: Commands,
    context: CommandContext,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        Commands::Search {
            filters,
            page,
            format,
        } => commands::search::run(&context, &filters, &page, format, cancel).await,
        Commands::Tail {
            filters,
            interval,
            page_size,
            format,
        } => commands::tail::run(&context, &filters, interval, page_size, format, cancel).await,
        Commands::Threats {
            window,
            threat_type,
            size,
            format,
        } => commands::threats::run(&context, &window, threat_type, size, format, cancel).await,
        Commands::Stats { window, format } => {
            commands::stats::run(&context, &window, format, cancel).await
        }
        Commands::Health { format } => commands::health::run(&context, format, cancel).await,
        Commands::Export {
            filters,
            page,
            page_size,
            format,
            output,
        } => {
            commands::export::run(&context, &filters, page, page_size, format, output, cancel)
                .await
        }
        Commands::Saved { command } => commands::saved::run(&context, command, cancel).await,
        Commands::Settings { command } => commands::settings::run(&context, command),
    }
}
