// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pairing of idle mechanics with queued tickets
//!
//! Planning is pure: it takes a snapshot of the registry and the queue and
//! returns the pairs to claim. Writing the claims back is the engine's job.

use crate::ticket::{Ticket, TicketId};
use crate::worker::{busy_workers, Worker, WorkerId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// One mechanic matched with one ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub ticket_id: TicketId,
    pub worker_id: WorkerId,
}

/// Result of planning a single pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentPlan {
    pub pairs: Vec<Assignment>,
    /// Active mechanics without a processing ticket
    pub free_workers: usize,
    /// Waiting tickets that may be worked on today
    pub eligible: usize,
}

impl AssignmentPlan {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Match free mechanics to the oldest eligible waiting tickets
///
/// - `workers` in registry order; that order decides who gets the oldest ticket
/// - `processing` is used only to derive busy mechanics
/// - `waiting` may arrive in any order; it is sorted by creation time, ties
///   broken by id so the plan is deterministic
///
/// Future-dated bookings and tickets not in `waiting` are never paired.
pub fn plan_assignments(
    workers: &[Worker],
    processing: &[Ticket],
    waiting: &[Ticket],
    today: NaiveDate,
) -> AssignmentPlan {
    let busy = busy_workers(processing);

    let mut seen = HashSet::new();
    let free: Vec<&Worker> = workers
        .iter()
        .filter(|w| w.active && !busy.contains(&w.id))
        .filter(|w| seen.insert(w.id.clone()))
        .collect();

    let mut eligible: Vec<&Ticket> = waiting.iter().filter(|t| t.is_eligible(today)).collect();
    eligible.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    eligible.dedup_by(|a, b| a.id == b.id);

    let pairs = free
        .iter()
        .zip(eligible.iter())
        .map(|(worker, ticket)| Assignment {
            ticket_id: ticket.id.clone(),
            worker_id: worker.id.clone(),
        })
        .collect();

    AssignmentPlan {
        pairs,
        free_workers: free.len(),
        eligible: eligible.len(),
    }
}

#[cfg(test)]
#[path = "assignment_tests.rs"]
mod tests;
