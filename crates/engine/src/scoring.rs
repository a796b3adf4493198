// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mechanic performance review

use crate::error::EngineError;
use chrono::NaiveDate;
use pit_adapters::{InferenceAdapter, InferenceError, InferenceRequest, StoreAdapter, TicketQuery};
use pit_core::{extract_as, local_midnight, PerformanceScore, TicketStatus, WorkerLog};
use serde::Deserialize;
use serde_json::json;

const SCORE_INSTRUCTION: &str = "You review the work log of a motorcycle mechanic. \
Score their performance from 0 to 100 considering job count, time per job and the \
difficulty of the complaints handled, and give a one-sentence summary. \
Reply with JSON only: {\"score\": number, \"summary\": string}.";

#[derive(Deserialize)]
struct ScoreReply {
    score: f64,
    #[serde(default)]
    summary: String,
}

/// Scores mechanics from their finished jobs
#[derive(Clone)]
pub struct PerformanceReview<S, G> {
    store: S,
    inference: G,
    utc_offset_minutes: i32,
}

impl<S, G> PerformanceReview<S, G>
where
    S: StoreAdapter,
    G: InferenceAdapter,
{
    pub fn new(store: S, inference: G, utc_offset_minutes: i32) -> Self {
        Self {
            store,
            inference,
            utc_offset_minutes,
        }
    }

    /// Job logs for shop-local days `[from, to)`
    pub async fn logs(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkerLog>, EngineError> {
        if from >= to {
            return Err(EngineError::invalid("to", "must be after from"));
        }
        let query = TicketQuery::statuses([TicketStatus::Done, TicketStatus::Paid]);
        let (workers, tickets) = tokio::try_join!(
            self.store.list_workers(false),
            self.store.list_tickets(&query),
        )?;
        Ok(WorkerLog::collect(
            &workers,
            &tickets,
            local_midnight(from, self.utc_offset_minutes),
            local_midnight(to, self.utc_offset_minutes),
        ))
    }

    /// Score every mechanic who finished a job in `[from, to)`
    ///
    /// Mechanics without jobs are left out and cost no model call.
    pub async fn score(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PerformanceScore>, EngineError> {
        let mut scores = Vec::new();
        for log in self.logs(from, to).await? {
            if log.jobs.is_empty() {
                tracing::debug!(worker = %log.worker_id, "no jobs in period");
                continue;
            }
            scores.push(self.score_log(&log).await?);
        }
        Ok(scores)
    }

    async fn score_log(&self, log: &WorkerLog) -> Result<PerformanceScore, EngineError> {
        let payload = json!({
            "mechanic": log.worker_name,
            "average_minutes": log.average_minutes(),
            "jobs": log.jobs,
        });
        let request = InferenceRequest::new(SCORE_INSTRUCTION)
            .with_text(payload.to_string())
            .json();
        let raw = self.inference.generate(&request).await?;
        let reply: ScoreReply = extract_as(&raw)
            .map_err(|e| EngineError::Inference(InferenceError::Decode(e.to_string())))?;

        let score = PerformanceScore::new(
            log.worker_id.clone(),
            reply.score,
            reply.summary.trim().to_string(),
            log.jobs.len(),
        );
        tracing::info!(
            worker = %score.worker_id,
            score = score.score,
            jobs = score.jobs,
            "mechanic scored"
        );
        Ok(score)
    }
}

#[cfg(test)]
#[path = "scoring_tests.rs"]
mod tests;
