// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChangeEvent, SortOrder, StoreAdapter, StoreError, Table, TicketQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pit_core::{InventoryItem, Ticket, TicketId, TicketStatus, Worker, WorkerId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListWorkers { active_only: bool },
    UpsertWorker(WorkerId),
    DeleteWorker(WorkerId),
    ListTickets(TicketQuery),
    GetTicket(TicketId),
    InsertTicket(TicketId),
    UpdateTicket(TicketId),
    Claim { ticket: TicketId, worker: WorkerId },
    DeleteTicket(TicketId),
    ListInventory,
    InsertItem(String),
    UpdateItem(String),
    ProfileRole(String),
    Subscribe(Table),
}

#[derive(Default)]
struct State {
    workers: Vec<Worker>,
    tickets: Vec<Ticket>,
    items: Vec<InventoryItem>,
    roles: HashMap<String, Option<String>>,
    subscribers: Vec<(Table, mpsc::Sender<ChangeEvent>)>,
    calls: Vec<StoreCall>,
    fail_reads: bool,
    fail_writes: bool,
    fail_tables: HashSet<Table>,
    fail_items: HashSet<String>,
    fail_claims: HashSet<TicketId>,
    stolen_claims: HashSet<TicketId>,
}

impl State {
    fn notify(&mut self, table: Table) {
        self.subscribers.retain(|(t, tx)| {
            if *t != table {
                return true;
            }
            !matches!(
                tx.try_send(ChangeEvent { table }),
                Err(mpsc::error::TrySendError::Closed(_))
            )
        });
    }

    fn read(&self) -> Result<(), StoreError> {
        if self.fail_reads {
            return Err(StoreError::Transport("injected read failure".to_string()));
        }
        Ok(())
    }

    fn write(&self, table: Table) -> Result<(), StoreError> {
        if self.fail_writes || self.fail_tables.contains(&table) {
            return Err(StoreError::Transport("injected write failure".to_string()));
        }
        Ok(())
    }
}

/// In-memory store with call recording and failure injection
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<State>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a mechanic without recording a call or emitting a change
    pub fn add_worker(&self, worker: Worker) {
        self.lock().workers.push(worker);
    }

    pub fn add_ticket(&self, ticket: Ticket) {
        self.lock().tickets.push(ticket);
    }

    pub fn add_item(&self, item: InventoryItem) {
        self.lock().items.push(item);
    }

    /// Give a user a profile with the given role (`None` for a blank role)
    pub fn set_role(&self, user_id: &str, role: Option<&str>) {
        self.lock()
            .roles
            .insert(user_id.to_string(), role.map(str::to_string));
    }

    pub fn workers(&self) -> Vec<Worker> {
        self.lock().workers.clone()
    }

    pub fn tickets(&self) -> Vec<Ticket> {
        self.lock().tickets.clone()
    }

    pub fn ticket(&self, id: &str) -> Option<Ticket> {
        self.lock().tickets.iter().find(|t| t.id.0 == id).cloned()
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        self.lock().items.clone()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Recorded claim attempts, in order
    pub fn claims(&self) -> Vec<(TicketId, WorkerId)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                StoreCall::Claim { ticket, worker } => Some((ticket.clone(), worker.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Make every read fail with a transport error
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make every write fail with a transport error
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Make writes to one table fail with a transport error
    pub fn fail_writes_to(&self, table: Table, fail: bool) {
        let mut state = self.lock();
        if fail {
            state.fail_tables.insert(table);
        } else {
            state.fail_tables.remove(&table);
        }
    }

    /// Make writes to this inventory item fail with a transport error
    pub fn fail_item_write(&self, id: &str) {
        self.lock().fail_items.insert(id.to_string());
    }

    /// Make claims on this ticket fail with a transport error
    pub fn fail_claim(&self, id: &str) {
        self.lock().fail_claims.insert(TicketId::from(id));
    }

    /// Another writer claims this ticket just before our claim lands
    pub fn steal_claim(&self, id: &str) {
        self.lock().stolen_claims.insert(TicketId::from(id));
    }

    /// Emit a change as if another client wrote to `table`
    pub fn touch(&self, table: Table) {
        self.lock().notify(table);
    }
}

#[async_trait]
impl StoreAdapter for FakeStore {
    async fn list_workers(&self, active_only: bool) -> Result<Vec<Worker>, StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::ListWorkers { active_only });
        state.read()?;
        Ok(state
            .workers
            .iter()
            .filter(|w| !active_only || w.active)
            .cloned()
            .collect())
    }

    async fn upsert_worker(&self, worker: &Worker) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::UpsertWorker(worker.id.clone()));
        state.write(Table::Workers)?;
        match state.workers.iter_mut().find(|w| w.id == worker.id) {
            Some(existing) => *existing = worker.clone(),
            None => state.workers.push(worker.clone()),
        }
        state.notify(Table::Workers);
        Ok(())
    }

    async fn delete_worker(&self, id: &WorkerId) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::DeleteWorker(id.clone()));
        state.write(Table::Workers)?;
        state.workers.retain(|w| &w.id != id);
        state.notify(Table::Workers);
        Ok(())
    }

    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::ListTickets(query.clone()));
        state.read()?;
        let mut rows: Vec<Ticket> = state
            .tickets
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        if query.order == SortOrder::Descending {
            rows.reverse();
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::GetTicket(id.clone()));
        state.read()?;
        Ok(state.tickets.iter().find(|t| &t.id == id).cloned())
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::InsertTicket(ticket.id.clone()));
        state.write(Table::Tickets)?;
        if state.tickets.iter().any(|t| t.id == ticket.id) {
            return Err(StoreError::Status {
                status: 409,
                body: format!("duplicate ticket {}", ticket.id),
            });
        }
        state.tickets.push(ticket.clone());
        state.notify(Table::Tickets);
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::UpdateTicket(ticket.id.clone()));
        state.write(Table::Tickets)?;
        let Some(existing) = state.tickets.iter_mut().find(|t| t.id == ticket.id) else {
            return Err(StoreError::NotFound(ticket.id.to_string()));
        };
        *existing = ticket.clone();
        state.notify(Table::Tickets);
        Ok(())
    }

    async fn claim_ticket(
        &self,
        id: &TicketId,
        worker: &WorkerId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Claim {
            ticket: id.clone(),
            worker: worker.clone(),
        });
        if state.fail_claims.contains(id) {
            return Err(StoreError::Transport("injected claim failure".to_string()));
        }
        state.write(Table::Tickets)?;
        let stolen = state.stolen_claims.remove(id);
        let Some(ticket) = state.tickets.iter_mut().find(|t| &t.id == id) else {
            return Ok(false);
        };
        if stolen {
            ticket.status = TicketStatus::Processing;
            ticket.worker_id = Some(WorkerId::from("someone-else"));
            ticket.updated_at = Some(at);
            state.notify(Table::Tickets);
            return Ok(false);
        }
        if ticket.status != TicketStatus::Waiting {
            return Ok(false);
        }
        ticket.status = TicketStatus::Processing;
        ticket.worker_id = Some(worker.clone());
        ticket.started_at = Some(at);
        ticket.updated_at = Some(at);
        state.notify(Table::Tickets);
        Ok(true)
    }

    async fn delete_ticket(&self, id: &TicketId) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::DeleteTicket(id.clone()));
        state.write(Table::Tickets)?;
        state.tickets.retain(|t| &t.id != id);
        state.notify(Table::Tickets);
        Ok(())
    }

    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::ListInventory);
        state.read()?;
        let mut items = state.items.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn insert_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::InsertItem(item.id.to_string()));
        state.write(Table::Inventory)?;
        state.items.push(item.clone());
        state.notify(Table::Inventory);
        Ok(())
    }

    async fn update_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::UpdateItem(item.id.to_string()));
        state.write(Table::Inventory)?;
        if state.fail_items.contains(&item.id.0) {
            return Err(StoreError::Transport("injected item write failure".to_string()));
        }
        let Some(existing) = state.items.iter_mut().find(|i| i.id == item.id) else {
            return Err(StoreError::NotFound(item.id.to_string()));
        };
        *existing = item.clone();
        state.notify(Table::Inventory);
        Ok(())
    }

    async fn profile_role(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::ProfileRole(user_id.to_string()));
        state.read()?;
        Ok(state.roles.get(user_id).cloned().flatten())
    }

    async fn subscribe(&self, table: Table) -> Result<mpsc::Receiver<ChangeEvent>, StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Subscribe(table));
        state.read()?;
        let (tx, rx) = mpsc::channel(1);
        state.subscribers.push((table, tx));
        Ok(rx)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
