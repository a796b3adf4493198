// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit queue` - the workshop board

use super::TicketRow;
use crate::adapters::App;
use crate::output::{print, OutputFormat};
use anyhow::Result;
use pit_engine::{QueueEntry, QueueView};
use serde::Serialize;
use std::fmt;

#[derive(Serialize)]
#[serde(transparent)]
struct Board(QueueView);

fn section(f: &mut fmt::Formatter<'_>, title: &str, entries: &[QueueEntry]) -> fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(f, "{} ({}):", title, entries.len())?;
    for entry in entries {
        write!(f, "  {}", TicketRow(&entry.ticket))?;
        if let Some(name) = &entry.worker_name {
            write!(f, " {}", name)?;
        }
        writeln!(f)?;
    }
    writeln!(f)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = &self.0;
        section(f, "In progress", &view.processing)?;
        section(f, "Waiting", &view.waiting)?;
        section(f, "Parked", &view.parked)?;
        section(f, "Upcoming bookings", &view.upcoming)?;

        if view.processing.is_empty() && view.waiting.is_empty() {
            writeln!(f, "No tickets in the queue.")?;
        }
        let idle: Vec<_> = view.idle_workers.iter().map(|w| w.name.as_str()).collect();
        if idle.is_empty() {
            write!(f, "Idle mechanics: none")
        } else {
            write!(f, "Idle mechanics: {}", idle.join(", "))
        }
    }
}

pub async fn handle(app: &App, format: OutputFormat) -> Result<()> {
    let view = app.desk().queue_view().await.map_err(|e| app.explain(e))?;
    print(&Board(view), format);
    Ok(())
}
