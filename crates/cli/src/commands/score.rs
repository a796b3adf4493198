// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit score` - mechanic performance review

use super::report::PeriodArgs;
use crate::adapters::App;
use crate::output::{print_list, OutputFormat};
use anyhow::Result;
use pit_core::{Clock, PerformanceScore, Permission, SystemClock};
use pit_engine::PerformanceReview;
use serde::Serialize;
use std::fmt;

#[derive(Serialize)]
#[serde(transparent)]
struct ScoreRow(PerformanceScore);

impl fmt::Display for ScoreRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0;
        write!(
            f,
            "{:<14} {:>3}/100  {:>3} jobs  {}",
            s.worker_id.0, s.score, s.jobs, s.summary
        )
    }
}

pub async fn handle(period: PeriodArgs, app: &App, format: OutputFormat) -> Result<()> {
    app.authorize(Permission::ManageStaff).await?;
    let (from, to) = period.range(SystemClock.today(app.offset()));
    let scores = PerformanceReview::new(app.store.clone(), app.inference(), app.offset())
        .score(from, to)
        .await
        .map_err(|e| app.explain(e))?;
    let rows: Vec<_> = scores.into_iter().map(ScoreRow).collect();
    print_list(&rows, format, "No finished jobs in this period");
    Ok(())
}
