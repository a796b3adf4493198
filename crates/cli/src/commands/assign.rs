// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit assign` - run one assignment pass

use crate::adapters::App;
use crate::output::{print, OutputFormat};
use anyhow::Result;
use pit_core::{Permission, SystemClock};
use pit_engine::{AssignmentLoop, PassReport};
use serde::Serialize;
use std::fmt;

#[derive(Serialize)]
#[serde(transparent)]
struct ReportView(PassReport);

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        if r.skipped {
            return write!(f, "Pass skipped: store unavailable");
        }
        if r.is_idle() {
            return write!(
                f,
                "Nothing to assign ({} free mechanics, {} eligible tickets)",
                r.free_workers, r.eligible
            );
        }
        for pair in &r.claimed {
            writeln!(f, "Assigned {} -> {}", pair.ticket_id, pair.worker_id)?;
        }
        for id in &r.lost {
            writeln!(f, "Taken elsewhere: {}", id)?;
        }
        for id in &r.failed {
            writeln!(f, "Claim failed: {}", id)?;
        }
        write!(
            f,
            "{} assigned, {} lost, {} failed",
            r.claimed.len(),
            r.lost.len(),
            r.failed.len()
        )
    }
}

pub async fn handle(app: &App, format: OutputFormat) -> Result<()> {
    app.authorize(Permission::ManageQueue).await?;

    let assigner = AssignmentLoop::new(app.store.clone(), SystemClock, app.offset());
    let report = assigner.run_pass().await;
    let skipped = report.skipped;
    print(&ReportView(report), format);

    if skipped {
        anyhow::bail!("could not read the store at {}", app.config.store.url);
    }
    Ok(())
}
