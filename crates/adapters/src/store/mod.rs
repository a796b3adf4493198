// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosted data store adapters

mod rest;

pub use rest::RestStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pit_core::{InventoryItem, Ticket, TicketId, TicketStatus, Worker, WorkerId};
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Tables the application reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Tickets,
    Workers,
    Inventory,
    Profiles,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Tickets => "tickets",
            Table::Workers => "mechanics",
            Table::Inventory => "inventory",
            Table::Profiles => "profiles",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation-time ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Ascending,
    Descending,
}

/// Ticket selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQuery {
    /// Empty means every status
    pub statuses: Vec<TicketStatus>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl TicketQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn status(status: TicketStatus) -> Self {
        Self::statuses([status])
    }

    pub fn statuses(statuses: impl IntoIterator<Item = TicketStatus>) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn newest_first(self) -> Self {
        Self {
            order: SortOrder::Descending,
            ..self
        }
    }

    pub fn limit(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&ticket.status)
    }
}

/// Something changed in a table
///
/// Carries no row data; consumers re-read whatever they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: Table,
}

/// Adapter for the hosted data store
#[async_trait]
pub trait StoreAdapter: Clone + Send + Sync + 'static {
    /// List mechanics in registry order
    async fn list_workers(&self, active_only: bool) -> Result<Vec<Worker>, StoreError>;

    /// Insert or replace a mechanic
    async fn upsert_worker(&self, worker: &Worker) -> Result<(), StoreError>;

    async fn delete_worker(&self, id: &WorkerId) -> Result<(), StoreError>;

    /// List tickets ordered by creation time
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, StoreError>;

    async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError>;

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Overwrite a ticket row unconditionally
    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Hand a ticket to a mechanic if it is still waiting
    ///
    /// Single conditional write. Returns `false` when the ticket was no
    /// longer waiting (someone else claimed, cancelled or deleted it).
    async fn claim_ticket(
        &self,
        id: &TicketId,
        worker: &WorkerId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn delete_ticket(&self, id: &TicketId) -> Result<(), StoreError>;

    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, StoreError>;

    async fn insert_item(&self, item: &InventoryItem) -> Result<(), StoreError>;

    async fn update_item(&self, item: &InventoryItem) -> Result<(), StoreError>;

    /// Role string on a user's profile, `None` when there is no profile
    async fn profile_role(&self, user_id: &str) -> Result<Option<String>, StoreError>;

    /// Receive an event whenever `table` changes
    async fn subscribe(&self, table: Table) -> Result<mpsc::Receiver<ChangeEvent>, StoreError>;
}
