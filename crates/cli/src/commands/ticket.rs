// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit ticket` - intake and operator transitions

use super::TicketDetail;
use crate::adapters::App;
use crate::error::PitError;
use crate::output::{print, OutputFormat};
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand};
use pit_core::{Permission, TicketAction, TicketId};
use pit_engine::{IssueTriage, NewTicket};

#[derive(Args)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Subcommand)]
pub enum TicketCommand {
    /// Open a ticket for a walk-in, or a booking with --date
    Add(IntakeArgs),
    /// Show one ticket
    Show { id: String },
    /// Mark the work done
    Finish { id: String },
    /// Put the ticket on hold
    Park { id: String },
    /// Wait for parts to arrive
    Parts { id: String },
    /// Pick a parked ticket back up
    Resume { id: String },
    /// Cancel the ticket
    Cancel { id: String },
    /// Delete the ticket entirely
    Delete { id: String },
}

/// Customer and motorcycle details at intake
#[derive(Args, Debug, Clone)]
pub struct IntakeArgs {
    /// Customer name
    #[arg(long)]
    pub name: String,
    /// Plate number
    #[arg(long)]
    pub plate: String,
    #[arg(long)]
    pub phone: Option<String>,
    /// Make and model
    #[arg(long)]
    pub motorcycle: Option<String>,
    /// What the customer reports
    #[arg(long, default_value = "")]
    pub complaint: String,
    /// Booking date (YYYY-MM-DD); omit for a walk-in
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Booking time (HH:MM)
    #[arg(long, requires = "date", value_parser = parse_time)]
    pub time: Option<NaiveTime>,
    /// Check and summarise the complaint with the model first
    #[arg(long)]
    pub triage: bool,
}

impl IntakeArgs {
    pub fn to_new_ticket(&self) -> NewTicket {
        let mut new = NewTicket::walk_in(&self.name, &self.plate).complaint(&self.complaint);
        new.phone = self.phone.clone();
        new.motorcycle = self.motorcycle.clone();
        if let Some(date) = self.date {
            new = new.booked_for(date, self.time);
        }
        new
    }
}

pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{}', expected HH:MM", s))
}

/// Build the intake, running triage first when asked
pub async fn prepare(intake: &IntakeArgs, app: &App) -> Result<NewTicket> {
    let mut new = intake.to_new_ticket();
    if intake.triage {
        let assessment = IssueTriage::new(app.inference())
            .assess(&intake.complaint)
            .await
            .map_err(|e| app.explain(e))?;
        if !assessment.valid {
            return Err(PitError::new("Complaint was not accepted")
                .with_context(assessment.summary)
                .with_suggestion("Describe the problem with the motorcycle")
                .into());
        }
        new.issue_summary = Some(assessment.summary);
    }
    Ok(new)
}

fn action_for(command: &TicketCommand) -> Option<(TicketAction, &str)> {
    match command {
        TicketCommand::Finish { id } => Some((TicketAction::Finish, id)),
        TicketCommand::Park { id } => Some((TicketAction::Park, id)),
        TicketCommand::Parts { id } => Some((TicketAction::AwaitParts, id)),
        TicketCommand::Resume { id } => Some((TicketAction::Resume, id)),
        TicketCommand::Cancel { id } => Some((TicketAction::Cancel, id)),
        _ => None,
    }
}

pub async fn handle(args: TicketArgs, app: &App, format: OutputFormat) -> Result<()> {
    let desk = app.desk();

    if let Some((action, id)) = action_for(&args.command) {
        app.authorize(Permission::ManageQueue).await?;
        let ticket = desk
            .apply(&TicketId::from(id), action)
            .await
            .map_err(|e| app.explain(e))?;
        print(&TicketDetail(&ticket), format);
        return Ok(());
    }

    match args.command {
        TicketCommand::Add(intake) => {
            app.authorize(Permission::ManageQueue).await?;
            let new = prepare(&intake, app).await?;
            let ticket = desk.intake(new).await.map_err(|e| app.explain(e))?;
            print(&TicketDetail(&ticket), format);
        }
        TicketCommand::Show { id } => {
            let ticket = desk
                .get(&TicketId::from(id.as_str()))
                .await
                .map_err(|e| app.explain(e))?;
            print(&TicketDetail(&ticket), format);
        }
        TicketCommand::Delete { id } => {
            app.authorize(Permission::ManageQueue).await?;
            desk.delete(&TicketId::from(id.as_str()))
                .await
                .map_err(|e| app.explain(e))?;
            println!("Deleted ticket {}", id);
        }
        TicketCommand::Finish { .. }
        | TicketCommand::Park { .. }
        | TicketCommand::Parts { .. }
        | TicketCommand::Resume { .. }
        | TicketCommand::Cancel { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
