// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::inference::{InferenceAdapter, InferenceError, InferenceRequest};
use crate::payment::{PaymentAdapter, PaymentError, PaymentRequest, PaymentSession, PaymentStatus};
use crate::store::{ChangeEvent, StoreAdapter, StoreError, Table, TicketQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pit_core::{InventoryItem, Ticket, TicketId, Worker, WorkerId};
use std::future::Future;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Time a call and log its outcome inside the current span
async fn timed<T, E, Fut>(fut: Fut, done: &'static str) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let result = fut.await;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => tracing::debug!(elapsed_ms, "{}", done),
        Err(e) => tracing::error!(elapsed_ms, error = %e, "failed"),
    }
    result
}

/// Wrapper that adds tracing to any StoreAdapter
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: StoreAdapter> StoreAdapter for TracedStore<S> {
    async fn list_workers(&self, active_only: bool) -> Result<Vec<Worker>, StoreError> {
        let result = timed(self.inner.list_workers(active_only), "listed")
            .instrument(tracing::info_span!("store.list_workers", active_only))
            .await;
        tracing::trace!(count = result.as_ref().map(|v| v.len()).ok(), "workers");
        result
    }

    async fn upsert_worker(&self, worker: &Worker) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.upsert_worker", worker = %worker.id);
        async {
            let result = timed(self.inner.upsert_worker(worker), "saved").await;
            if result.is_ok() {
                tracing::info!(active = worker.active, "worker saved");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn delete_worker(&self, id: &WorkerId) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.delete_worker", worker = %id);
        async {
            let result = timed(self.inner.delete_worker(id), "deleted").await;
            if result.is_ok() {
                tracing::info!("worker removed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, StoreError> {
        let span = tracing::info_span!("store.list_tickets", statuses = ?query.statuses);
        let result = timed(self.inner.list_tickets(query), "listed")
            .instrument(span)
            .await;
        tracing::trace!(count = result.as_ref().map(|v| v.len()).ok(), "tickets");
        result
    }

    async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError> {
        timed(self.inner.get_ticket(id), "fetched")
            .instrument(tracing::info_span!("store.get_ticket", ticket = %id))
            .await
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.insert_ticket", ticket = %ticket.id);
        async {
            let result = timed(self.inner.insert_ticket(ticket), "inserted").await;
            if result.is_ok() {
                tracing::info!(booking = ticket.is_booking, "ticket created");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.update_ticket", ticket = %ticket.id);
        async {
            let result = timed(self.inner.update_ticket(ticket), "updated").await;
            if result.is_ok() {
                tracing::info!(status = %ticket.status, "ticket updated");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn claim_ticket(
        &self,
        id: &TicketId,
        worker: &WorkerId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.claim_ticket", ticket = %id, worker = %worker);
        async {
            let result = timed(self.inner.claim_ticket(id, worker, at), "claim sent").await;
            match &result {
                Ok(true) => tracing::info!("claimed"),
                Ok(false) => tracing::info!("claim lost"),
                Err(_) => {}
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn delete_ticket(&self, id: &TicketId) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.delete_ticket", ticket = %id);
        async {
            let result = timed(self.inner.delete_ticket(id), "deleted").await;
            if result.is_ok() {
                tracing::info!("ticket deleted");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
        timed(self.inner.list_inventory(), "listed")
            .instrument(tracing::info_span!("store.list_inventory"))
            .await
    }

    async fn insert_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        timed(self.inner.insert_item(item), "inserted")
            .instrument(tracing::info_span!("store.insert_item", item = %item.id))
            .await
    }

    async fn update_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        timed(self.inner.update_item(item), "updated")
            .instrument(tracing::info_span!(
                "store.update_item",
                item = %item.id,
                stock = item.stock
            ))
            .await
    }

    async fn profile_role(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let span = tracing::info_span!("store.profile_role", user_id);
        async {
            let result = timed(self.inner.profile_role(user_id), "looked up").await;
            if let Ok(None) = &result {
                tracing::warn!("no role on profile");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn subscribe(&self, table: Table) -> Result<mpsc::Receiver<ChangeEvent>, StoreError> {
        let span = tracing::info_span!("store.subscribe", %table);
        async {
            let result = timed(self.inner.subscribe(table), "subscribed").await;
            if result.is_ok() {
                tracing::info!("listening for changes");
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any InferenceAdapter
#[derive(Clone)]
pub struct TracedInference<I> {
    inner: I,
}

impl<I> TracedInference<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<I: InferenceAdapter> InferenceAdapter for TracedInference<I> {
    async fn generate(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        let span = tracing::info_span!(
            "inference.generate",
            json = request.json,
            image = request.image.is_some()
        );
        async {
            tracing::debug!(
                instruction_len = request.instruction.len(),
                text_len = request.text.as_ref().map(|t| t.len()),
                "prompting"
            );
            let start = Instant::now();
            let result = self.inner.generate(request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(reply) => tracing::info!(elapsed_ms, reply_len = reply.len(), "replied"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "inference failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any PaymentAdapter
#[derive(Clone)]
pub struct TracedPayment<P> {
    inner: P,
}

impl<P> TracedPayment<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: PaymentAdapter> PaymentAdapter for TracedPayment<P> {
    async fn create_session(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        let span = tracing::info_span!(
            "payment.create_session",
            order_id = %request.order_id,
            amount = request.amount
        );
        async {
            tracing::info!("opening payment session");
            let result = timed(self.inner.create_session(request), "session opened").await;
            if result.is_ok() {
                tracing::info!("session opened");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn status(&self, order_id: &str) -> Result<PaymentStatus, PaymentError> {
        let span = tracing::info_span!("payment.status", order_id);
        async {
            let result = timed(self.inner.status(order_id), "checked").await;
            if let Ok(status) = &result {
                tracing::debug!(?status, "payment status");
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
