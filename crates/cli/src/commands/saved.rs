//! Saved search commands.

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use sentinel_dashboard::{Dashboard, DashboardError, LogSessionHandler, query};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::args::{FilterArgs, OutputFormat};
use crate::commands::{await_fetch, page_size_or, render_page, ui_state};
use crate::context::CommandContext;
use crate::formatters::get_formatter;

#[derive(Subcommand)]
pub enum SavedCommand {
    /// List saved searches
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Save a search built from filter flags
    Save {
        /// Display name
        name: String,

        /// Optional description
        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Entries per page (25, 50, 100 or 200)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Delete a saved search by id
    Delete {
        /// Saved search id
        id: String,
    },

    /// Run a saved search and print its first page
    Run {
        /// Saved search id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

pub async fn run(
    context: &CommandContext,
    command: SavedCommand,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        SavedCommand::List { format } => {
            let store = context.saved_searches()?;
            print!("{}", get_formatter(format).format_saved_searches(store.list())?);
        }
        SavedCommand::Save {
            name,
            description,
            filters,
            page_size,
        } => {
            let page_size = page_size_or(page_size, context.dashboard_options().page_size)?;
            let ui = ui_state(&filters, page_size, Utc::now())?;
            let mut store = context.saved_searches()?;
            let saved = store.save(&name, description.as_deref(), query::build(&ui))?;
            println!("Saved search '{}' with id {}", saved.name, saved.id);
        }
        SavedCommand::Delete { id } => {
            let mut store = context.saved_searches()?;
            if !store.delete(&id)? {
                return Err(DashboardError::SavedSearchNotFound(id).into());
            }
            println!("Deleted saved search {id}");
        }
        SavedCommand::Run { id, format } => run_saved(context, &id, format, cancel).await?,
    }
    Ok(())
}

async fn run_saved(
    context: &CommandContext,
    id: &str,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    // Fail on an unknown id before any credentials are needed
    if context.saved_searches()?.get(id).is_none() {
        return Err(DashboardError::SavedSearchNotFound(id.to_string()).into());
    }

    let client = Arc::new(context.client()?);
    let mut dash = Dashboard::new(
        client,
        Arc::new(LogSessionHandler),
        context.saved_searches()?,
        context.dashboard_options(),
    );

    let outcome = match dash.load_saved_search(id) {
        Ok(seq) => await_fetch(&mut dash, seq, cancel).await,
        Err(e) => Err(e.into()),
    };
    dash.shutdown().await;
    outcome?;

    print!("{}", render_page(&dash, get_formatter(format).as_ref())?);
    Ok(())
}
