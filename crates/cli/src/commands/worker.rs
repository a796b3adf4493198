// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit worker` - the mechanic registry

use crate::adapters::App;
use crate::output::{print, print_list, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use pit_core::{Permission, Worker, WorkerId};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct WorkerArgs {
    #[command(subcommand)]
    pub command: WorkerCommand,
}

#[derive(Subcommand)]
pub enum WorkerCommand {
    /// List all mechanics
    List,
    /// Register a mechanic
    Add {
        /// Display name
        name: String,
    },
    /// Make a mechanic available for assignment
    Activate { id: String },
    /// Stop assigning work to a mechanic
    Deactivate { id: String },
    /// Remove a mechanic who has no ticket in progress
    Remove { id: String },
}

#[derive(Serialize)]
#[serde(transparent)]
struct WorkerRow(Worker);

impl fmt::Display for WorkerRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.active { "active" } else { "inactive" };
        write!(f, "{:<14} {:<8} {}", self.0.id.0, state, self.0.name)
    }
}

pub async fn handle(args: WorkerArgs, app: &App, format: OutputFormat) -> Result<()> {
    let desk = app.desk();
    match args.command {
        WorkerCommand::List => {
            let workers = desk.list_workers().await.map_err(|e| app.explain(e))?;
            let rows: Vec<_> = workers.into_iter().map(WorkerRow).collect();
            print_list(&rows, format, "No mechanics");
        }
        WorkerCommand::Add { name } => {
            app.authorize(Permission::ManageStaff).await?;
            let worker = desk.add_worker(&name).await.map_err(|e| app.explain(e))?;
            print(&WorkerRow(worker), format);
        }
        WorkerCommand::Activate { id } => {
            set_active(app, &id, true, format).await?;
        }
        WorkerCommand::Deactivate { id } => {
            set_active(app, &id, false, format).await?;
        }
        WorkerCommand::Remove { id } => {
            app.authorize(Permission::ManageStaff).await?;
            desk.remove_worker(&WorkerId::from(id.as_str()))
                .await
                .map_err(|e| app.explain(e))?;
            println!("Removed mechanic {}", id);
        }
    }
    Ok(())
}

async fn set_active(app: &App, id: &str, active: bool, format: OutputFormat) -> Result<()> {
    app.authorize(Permission::ManageStaff).await?;
    let worker = app
        .desk()
        .set_worker_active(&WorkerId::from(id), active)
        .await
        .map_err(|e| app.explain(e))?;
    print(&WorkerRow(worker), format);
    Ok(())
}
