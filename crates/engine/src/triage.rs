// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Customer complaint triage

use crate::error::EngineError;
use pit_adapters::{InferenceAdapter, InferenceRequest};
use pit_core::extract_as;
use serde::{Deserialize, Serialize};

const TRIAGE_INSTRUCTION: &str = "You are the service advisor of a motorcycle workshop. \
Decide whether the customer's complaint describes a motorcycle problem the workshop can \
look at, and summarise it in at most ten words. Reply with JSON only: \
{\"valid\": boolean, \"summary\": string, \"category\": string or null} where category is \
one of engine, electrical, brakes, suspension, tyres, body, service.";

/// Verdict on a complaint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueAssessment {
    pub valid: bool,
    pub summary: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl IssueAssessment {
    /// Accept the complaint as written
    pub fn fallback(complaint: &str) -> Self {
        Self {
            valid: true,
            summary: complaint.trim().to_string(),
            category: None,
        }
    }
}

/// Validates and summarises complaints at intake
#[derive(Clone)]
pub struct IssueTriage<G> {
    inference: G,
}

impl<G: InferenceAdapter> IssueTriage<G> {
    pub fn new(inference: G) -> Self {
        Self { inference }
    }

    /// Assess a complaint; falls back to accepting it when the endpoint fails
    pub async fn assess(&self, complaint: &str) -> Result<IssueAssessment, EngineError> {
        let complaint = complaint.trim();
        if complaint.is_empty() {
            return Err(EngineError::invalid("complaint", "must not be empty"));
        }

        let request = InferenceRequest::new(TRIAGE_INSTRUCTION)
            .with_text(complaint)
            .json();
        let raw = match self.inference.generate(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "triage unavailable, accepting complaint as written");
                return Ok(IssueAssessment::fallback(complaint));
            }
        };

        match extract_as::<IssueAssessment>(&raw) {
            Ok(mut assessment) => {
                assessment.summary = assessment.summary.trim().to_string();
                if assessment.summary.is_empty() {
                    assessment.summary = complaint.to_string();
                }
                assessment.category = assessment
                    .category
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty());
                Ok(assessment)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "unreadable triage reply, accepting complaint as written"
                );
                Ok(IssueAssessment::fallback(complaint))
            }
        }
    }
}

#[cfg(test)]
#[path = "triage_tests.rs"]
mod tests;
