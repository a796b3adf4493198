// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pit - Pitstop workshop CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod adapters;
mod commands;
mod completions;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    access, assign, book, checkout, inventory, queue, report, score, ticket, triage, worker,
};
use pit_core::config::default_config_path;
use pit_core::Config;
use std::path::PathBuf;

use crate::adapters::App;
use crate::error::PitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "pit",
    version,
    about = "Pitstop - motorcycle workshop queue and operations"
)]
struct Cli {
    /// Config file
    #[arg(long, short, global = true, env = "PIT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Act as this user; their profile role is checked before changes
    #[arg(long, global = true, env = "PIT_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one assignment pass now
    Assign,
    /// Show the workshop board
    Queue,
    /// Ticket intake and transitions
    Ticket(ticket::TicketArgs),
    /// Book a diagnosis; the ticket opens once the fee is paid
    Book(book::BookArgs),
    /// Mechanic registry
    Worker(worker::WorkerArgs),
    /// Stock and invoice import
    Inventory(inventory::InventoryArgs),
    /// Take payment for a finished ticket
    Checkout(checkout::CheckoutArgs),
    /// Finance reports
    Report(report::ReportArgs),
    /// Score mechanics on jobs finished in a period
    Score(report::PeriodArgs),
    /// Check a complaint with the model
    Triage(triage::TriageArgs),
    /// Show what a user's role allows
    Access {
        /// User id of the profile
        user: String,
    },
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<PitError>() {
            Some(pit) => eprint!("{}", pit),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Completions need no config
    if let Commands::Completions(args) = &cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&path).map_err(|e| PitError::config(&path, &e))?;
    let app = App::new(config, cli.user)?;
    let format = cli.format;

    match cli.command {
        Commands::Assign => assign::handle(&app, format).await,
        Commands::Queue => queue::handle(&app, format).await,
        Commands::Ticket(args) => ticket::handle(args, &app, format).await,
        Commands::Book(args) => book::handle(args, &app, format).await,
        Commands::Worker(args) => worker::handle(args, &app, format).await,
        Commands::Inventory(args) => inventory::handle(args, &app, format).await,
        Commands::Checkout(args) => checkout::handle(args, &app, format).await,
        Commands::Report(args) => report::handle(args, &app, format).await,
        Commands::Score(period) => score::handle(period, &app, format).await,
        Commands::Triage(args) => triage::handle(args, &app, format).await,
        Commands::Access { user } => access::handle(&user, &app, format).await,
        Commands::Completions(_) => Ok(()),
    }
}

/// Log to stderr; quiet unless RUST_LOG asks for more
fn setup_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
