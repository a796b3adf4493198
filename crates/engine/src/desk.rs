// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Front desk: ticket intake, the queue board and operator actions

use crate::error::EngineError;
use chrono::{NaiveDate, NaiveTime};
use pit_adapters::{StoreAdapter, TicketQuery};
use pit_core::worker::busy_workers;
use pit_core::{
    Clock, IdGen, IdKind, Ticket, TicketAction, TicketId, TicketStatus, Worker, WorkerId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Details collected when a customer arrives or books
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub plate_number: String,
    #[serde(default)]
    pub motorcycle: Option<String>,
    #[serde(default)]
    pub complaint: String,
    #[serde(default)]
    pub issue_summary: Option<String>,
    /// Set for bookings
    #[serde(default)]
    pub booking_date: Option<NaiveDate>,
    #[serde(default)]
    pub booking_time: Option<NaiveTime>,
}

impl NewTicket {
    pub fn walk_in(customer_name: impl Into<String>, plate_number: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            plate_number: plate_number.into(),
            ..Self::default()
        }
    }

    pub fn booked_for(self, date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self {
            booking_date: Some(date),
            booking_time: time,
            ..self
        }
    }

    pub fn complaint(self, complaint: impl Into<String>) -> Self {
        Self {
            complaint: complaint.into(),
            ..self
        }
    }
}

/// A ticket on the board with its mechanic's name resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub ticket: Ticket,
    pub worker_name: Option<String>,
}

/// The live queue
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueView {
    /// Eligible today, oldest first
    pub waiting: Vec<QueueEntry>,
    pub processing: Vec<QueueEntry>,
    /// Pending or waiting for parts
    pub parked: Vec<QueueEntry>,
    /// Bookings for a later day
    pub upcoming: Vec<QueueEntry>,
    /// Active mechanics without a processing ticket
    pub idle_workers: Vec<Worker>,
}

/// Ticket and mechanic management for operators
#[derive(Clone)]
pub struct TicketDesk<S, C, I> {
    store: S,
    clock: C,
    ids: I,
    utc_offset_minutes: i32,
}

impl<S, C, I> TicketDesk<S, C, I>
where
    S: StoreAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn new(store: S, clock: C, ids: I, utc_offset_minutes: i32) -> Self {
        Self {
            store,
            clock,
            ids,
            utc_offset_minutes,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.today(self.utc_offset_minutes)
    }

    /// Open a ticket for a walk-in or a booking
    pub async fn intake(&self, new: NewTicket) -> Result<Ticket, EngineError> {
        let customer = new.customer_name.trim();
        if customer.is_empty() {
            return Err(EngineError::invalid("customer_name", "must not be empty"));
        }
        let plate = normalize_plate(&new.plate_number);
        if plate.is_empty() {
            return Err(EngineError::invalid("plate_number", "must not be empty"));
        }
        if let Some(date) = new.booking_date {
            if date < self.today() {
                return Err(EngineError::invalid(
                    "booking_date",
                    format!("{} is in the past", date),
                ));
            }
        }

        let now = self.clock.now();
        let mut ticket = Ticket::walk_in(self.ids.next(IdKind::Ticket), customer, plate, now);
        ticket.phone = non_blank(new.phone);
        ticket.motorcycle = non_blank(new.motorcycle);
        ticket.complaint = new.complaint.trim().to_string();
        ticket.issue_summary = non_blank(new.issue_summary);
        ticket.updated_at = Some(now);
        if let Some(date) = new.booking_date {
            ticket = ticket.booked_for(date, new.booking_time);
        }

        self.store.insert_ticket(&ticket).await?;
        tracing::info!(ticket = %ticket.id, booking = ticket.is_booking, "ticket opened");
        Ok(ticket)
    }

    /// Everything on the board right now
    pub async fn queue_view(&self) -> Result<QueueView, EngineError> {
        let query = TicketQuery::statuses([
            TicketStatus::Waiting,
            TicketStatus::Processing,
            TicketStatus::Pending,
            TicketStatus::WaitingPart,
        ]);
        let (tickets, workers) = tokio::try_join!(
            self.store.list_tickets(&query),
            self.store.list_workers(false),
        )?;

        let names: HashMap<&WorkerId, &str> =
            workers.iter().map(|w| (&w.id, w.name.as_str())).collect();
        let entry = |ticket: &Ticket| QueueEntry {
            worker_name: ticket
                .worker_id
                .as_ref()
                .and_then(|id| names.get(id))
                .map(|name| name.to_string()),
            ticket: ticket.clone(),
        };

        let today = self.today();
        let mut view = QueueView::default();
        for ticket in &tickets {
            match ticket.status {
                TicketStatus::Waiting if ticket.is_future_booking(today) => {
                    view.upcoming.push(entry(ticket))
                }
                TicketStatus::Waiting => view.waiting.push(entry(ticket)),
                TicketStatus::Processing => view.processing.push(entry(ticket)),
                _ => view.parked.push(entry(ticket)),
            }
        }
        view.upcoming.sort_by(|a, b| {
            (a.ticket.booking_date, a.ticket.booking_time)
                .cmp(&(b.ticket.booking_date, b.ticket.booking_time))
        });

        let busy = busy_workers(&tickets);
        view.idle_workers = workers
            .into_iter()
            .filter(|w| w.active && !busy.contains(&w.id))
            .collect();
        Ok(view)
    }

    /// Apply an operator action to a ticket
    ///
    /// Resuming a parked ticket whose mechanic has since taken other work
    /// puts it back in the waiting queue instead. Payment goes through
    /// checkout, not here.
    pub async fn apply(&self, id: &TicketId, action: TicketAction) -> Result<Ticket, EngineError> {
        if action == TicketAction::Pay {
            return Err(EngineError::invalid("action", "tickets are paid through checkout"));
        }
        let ticket = self.get(id).await?;
        let now = self.clock.now();

        let next = if action == TicketAction::Resume && self.mechanic_is_busy(&ticket).await? {
            // Validate the transition even though we requeue
            ticket.status.apply(action)?;
            tracing::info!(ticket = %id, "mechanic busy elsewhere, returning ticket to queue");
            ticket.requeue(now)
        } else {
            ticket.transition(action, now)?
        };

        self.store.update_ticket(&next).await?;
        tracing::info!(ticket = %id, %action, status = %next.status, "ticket updated");
        Ok(next)
    }

    async fn mechanic_is_busy(&self, ticket: &Ticket) -> Result<bool, EngineError> {
        let Some(worker) = &ticket.worker_id else {
            return Ok(false);
        };
        let processing = self
            .store
            .list_tickets(&TicketQuery::status(TicketStatus::Processing))
            .await?;
        Ok(processing
            .iter()
            .any(|t| t.id != ticket.id && t.worker_id.as_ref() == Some(worker)))
    }

    pub async fn get(&self, id: &TicketId) -> Result<Ticket, EngineError> {
        self.store
            .get_ticket(id)
            .await?
            .ok_or_else(|| EngineError::TicketNotFound(id.to_string()))
    }

    pub async fn delete(&self, id: &TicketId) -> Result<(), EngineError> {
        self.get(id).await?;
        self.store.delete_ticket(id).await?;
        tracing::info!(ticket = %id, "ticket deleted");
        Ok(())
    }

    pub async fn list_workers(&self) -> Result<Vec<Worker>, EngineError> {
        Ok(self.store.list_workers(false).await?)
    }

    pub async fn add_worker(&self, name: &str) -> Result<Worker, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::invalid("name", "must not be empty"));
        }
        let worker = Worker::new(self.ids.next(IdKind::Worker), name);
        self.store.upsert_worker(&worker).await?;
        Ok(worker)
    }

    pub async fn set_worker_active(
        &self,
        id: &WorkerId,
        active: bool,
    ) -> Result<Worker, EngineError> {
        let mut worker = self.find_worker(id).await?;
        worker.active = active;
        self.store.upsert_worker(&worker).await?;
        Ok(worker)
    }

    /// Remove a mechanic who holds no processing ticket
    pub async fn remove_worker(&self, id: &WorkerId) -> Result<(), EngineError> {
        self.find_worker(id).await?;
        let processing = self
            .store
            .list_tickets(&TicketQuery::status(TicketStatus::Processing))
            .await?;
        if busy_workers(&processing).contains(id) {
            return Err(EngineError::WorkerBusy(id.to_string()));
        }
        self.store.delete_worker(id).await?;
        Ok(())
    }

    async fn find_worker(&self, id: &WorkerId) -> Result<Worker, EngineError> {
        self.store
            .list_workers(false)
            .await?
            .into_iter()
            .find(|w| &w.id == id)
            .ok_or_else(|| EngineError::WorkerNotFound(id.to_string()))
    }
}

/// Upper-case, single-spaced plate number
pub(crate) fn normalize_plate(plate: &str) -> String {
    plate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "desk_tests.rs"]
mod tests;
