// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit report` - finance reports

use crate::adapters::App;
use crate::output::{money, print, OutputFormat};
use anyhow::Result;
use chrono::{Days, NaiveDate};
use clap::{Args, Subcommand};
use pit_core::{Clock, Permission, RevenueReport, SystemClock};
use pit_engine::FinanceReports;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Revenue from paid tickets, per day
    Revenue(PeriodArgs),
}

/// A range of shop-local days
#[derive(Args, Debug, Clone, Copy)]
pub struct PeriodArgs {
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,
    /// Day after the last one counted [default: tomorrow]
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl PeriodArgs {
    /// `[from, to)`, with `to` defaulting to the day after `today`
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let to = self
            .to
            .unwrap_or_else(|| today.checked_add_days(Days::new(1)).unwrap_or(today));
        (self.from, to)
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct RevenueView(RevenueReport);

impl fmt::Display for RevenueView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        writeln!(f, "Revenue {} to {} (exclusive)", r.from, r.to)?;
        for day in &r.by_day {
            writeln!(
                f,
                "  {}  {:>3} tickets  {:>14}",
                day.date,
                day.tickets,
                money(day.gross)
            )?;
        }
        write!(
            f,
            "  Total       {:>3} tickets  {:>14}",
            r.tickets_paid,
            money(r.gross)
        )
    }
}

pub async fn handle(args: ReportArgs, app: &App, format: OutputFormat) -> Result<()> {
    app.authorize(Permission::ViewFinance).await?;
    match args.command {
        ReportCommand::Revenue(period) => {
            let (from, to) = period.range(SystemClock.today(app.offset()));
            let report = FinanceReports::new(app.store.clone(), app.offset())
                .revenue(from, to)
                .await
                .map_err(|e| app.explain(e))?;
            print(&RevenueView(report), format);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
