// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mechanic job logs and performance scores

use crate::ticket::{Ticket, TicketId, TicketStatus};
use crate::worker::{Worker, WorkerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finished job in a mechanic's log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub ticket_id: TicketId,
    pub complaint: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: DateTime<Utc>,
    /// Minutes between start and finish, when the start is known
    pub duration_minutes: Option<i64>,
}

impl JobRecord {
    /// Build a record from a finished ticket; unfinished tickets yield `None`
    pub fn from_ticket(ticket: &Ticket) -> Option<Self> {
        if !matches!(ticket.status, TicketStatus::Done | TicketStatus::Paid) {
            return None;
        }
        let finished_at = ticket.finished_at?;
        let duration_minutes = ticket
            .started_at
            .map(|start| (finished_at - start).num_minutes())
            .filter(|m| *m >= 0);
        Some(Self {
            ticket_id: ticket.id.clone(),
            complaint: ticket
                .issue_summary
                .clone()
                .unwrap_or_else(|| ticket.complaint.clone()),
            started_at: ticket.started_at,
            finished_at,
            duration_minutes,
        })
    }
}

/// Finished jobs of one mechanic over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerLog {
    pub worker_id: WorkerId,
    pub worker_name: String,
    pub jobs: Vec<JobRecord>,
}

impl WorkerLog {
    /// Group finished tickets by mechanic, keeping registry order
    ///
    /// Only tickets finished within `[from, to)` are included. Mechanics
    /// without jobs still get an (empty) log.
    pub fn collect(
        workers: &[Worker],
        tickets: &[Ticket],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<WorkerLog> {
        workers
            .iter()
            .map(|w| {
                let mut jobs: Vec<JobRecord> = tickets
                    .iter()
                    .filter(|t| t.worker_id.as_ref() == Some(&w.id))
                    .filter_map(JobRecord::from_ticket)
                    .filter(|j| j.finished_at >= from && j.finished_at < to)
                    .collect();
                jobs.sort_by_key(|j| j.finished_at);
                WorkerLog {
                    worker_id: w.id.clone(),
                    worker_name: w.name.clone(),
                    jobs,
                }
            })
            .collect()
    }

    pub fn average_minutes(&self) -> Option<i64> {
        let timed: Vec<i64> = self.jobs.iter().filter_map(|j| j.duration_minutes).collect();
        if timed.is_empty() {
            return None;
        }
        Some(timed.iter().sum::<i64>() / timed.len() as i64)
    }
}

/// Score assigned to a mechanic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub worker_id: WorkerId,
    /// 0..=100
    pub score: u8,
    pub summary: String,
    pub jobs: usize,
}

impl PerformanceScore {
    /// Build a score, clamping out-of-range values from the model
    pub fn new(worker_id: WorkerId, raw_score: f64, summary: String, jobs: usize) -> Self {
        let score = if raw_score.is_finite() {
            raw_score.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        Self {
            worker_id,
            score,
            summary,
            jobs,
        }
    }
}

#[cfg(test)]
#[path = "performance_tests.rs"]
mod tests;
