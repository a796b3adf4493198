// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The assignment loop: one pass pairs free mechanics with waiting tickets
//!
//! A pass reads a snapshot, plans with [`plan_assignments`], then issues one
//! conditional claim per pair. A claim the store refuses (the ticket is no
//! longer waiting) is reported as lost. Nothing here is fatal: a failed
//! snapshot skips the pass and a failed claim only affects its own pair.

use pit_adapters::{StoreAdapter, StoreError, TicketQuery};
use pit_core::{plan_assignments, Assignment, Clock, Ticket, TicketId, TicketStatus, Worker};
use serde::Serialize;
use tokio::task::JoinSet;

/// What a pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Claims the store accepted, in plan order
    pub claimed: Vec<Assignment>,
    /// Tickets that stopped waiting before the claim landed
    pub lost: Vec<TicketId>,
    /// Tickets whose claim errored; retried on a later pass
    pub failed: Vec<TicketId>,
    /// The snapshot could not be read
    pub skipped: bool,
    pub free_workers: usize,
    pub eligible: usize,
}

impl PassReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// Nothing was written
    pub fn is_idle(&self) -> bool {
        self.claimed.is_empty() && self.lost.is_empty() && self.failed.is_empty()
    }
}

struct Snapshot {
    workers: Vec<Worker>,
    processing: Vec<Ticket>,
    waiting: Vec<Ticket>,
}

/// Assignment loop over a store
#[derive(Clone)]
pub struct AssignmentLoop<S, C> {
    store: S,
    clock: C,
    utc_offset_minutes: i32,
}

impl<S, C> AssignmentLoop<S, C>
where
    S: StoreAdapter,
    C: Clock,
{
    pub fn new(store: S, clock: C, utc_offset_minutes: i32) -> Self {
        Self {
            store,
            clock,
            utc_offset_minutes,
        }
    }

    async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let processing = TicketQuery::status(TicketStatus::Processing);
        let waiting = TicketQuery::status(TicketStatus::Waiting);
        let (workers, processing, waiting) = tokio::try_join!(
            self.store.list_workers(true),
            self.store.list_tickets(&processing),
            self.store.list_tickets(&waiting),
        )?;
        Ok(Snapshot {
            workers,
            processing,
            waiting,
        })
    }

    /// Run one pass
    ///
    /// Never fails; problems are logged and reflected in the report.
    pub async fn run_pass(&self) -> PassReport {
        let snapshot = match self.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "assignment pass skipped, snapshot unavailable");
                return PassReport::skipped();
            }
        };

        let today = self.clock.today(self.utc_offset_minutes);
        let plan = plan_assignments(
            &snapshot.workers,
            &snapshot.processing,
            &snapshot.waiting,
            today,
        );
        let mut report = PassReport {
            free_workers: plan.free_workers,
            eligible: plan.eligible,
            ..PassReport::default()
        };
        if plan.is_empty() {
            tracing::debug!(
                free_workers = plan.free_workers,
                eligible = plan.eligible,
                "nothing to assign"
            );
            return report;
        }

        let now = self.clock.now();
        let mut claims = JoinSet::new();
        for (index, pair) in plan.pairs.into_iter().enumerate() {
            let store = self.store.clone();
            claims.spawn(async move {
                let outcome = store
                    .claim_ticket(&pair.ticket_id, &pair.worker_id, now)
                    .await;
                (index, pair, outcome)
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = claims.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!(error = %e, "claim task failed"),
            }
        }
        outcomes.sort_by_key(|(index, _, _)| *index);

        for (_, pair, outcome) in outcomes {
            match outcome {
                Ok(true) => {
                    tracing::info!(
                        ticket = %pair.ticket_id,
                        worker = %pair.worker_id,
                        "ticket assigned"
                    );
                    report.claimed.push(pair);
                }
                Ok(false) => {
                    tracing::info!(ticket = %pair.ticket_id, "ticket taken before claim");
                    report.lost.push(pair.ticket_id);
                }
                Err(e) => {
                    tracing::warn!(ticket = %pair.ticket_id, error = %e, "claim failed");
                    report.failed.push(pair.ticket_id);
                }
            }
        }

        tracing::info!(
            claimed = report.claimed.len(),
            lost = report.lost.len(),
            failed = report.failed.len(),
            "assignment pass complete"
        );
        report
    }
}

#[cfg(test)]
#[path = "assigner_tests.rs"]
mod tests;
