// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit triage` - check a complaint without opening a ticket

use crate::adapters::App;
use crate::output::{print, OutputFormat};
use anyhow::Result;
use clap::Args;
use pit_engine::{IssueAssessment, IssueTriage};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct TriageArgs {
    /// The complaint, as the customer put it
    #[arg(required = true, num_args = 1..)]
    pub complaint: Vec<String>,
}

#[derive(Serialize)]
#[serde(transparent)]
struct AssessmentView(IssueAssessment);

impl fmt::Display for AssessmentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.0;
        writeln!(f, "Valid: {}", if a.valid { "yes" } else { "no" })?;
        write!(f, "Summary: {}", a.summary)?;
        if let Some(category) = &a.category {
            write!(f, "\nCategory: {}", category)?;
        }
        Ok(())
    }
}

pub async fn handle(args: TriageArgs, app: &App, format: OutputFormat) -> Result<()> {
    let complaint = args.complaint.join(" ");
    let assessment = IssueTriage::new(app.inference())
        .assess(&complaint)
        .await
        .map_err(|e| app.explain(e))?;
    print(&AssessmentView(assessment), format);
    Ok(())
}
