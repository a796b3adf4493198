// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PostgREST-style hosted store adapter

use super::{ChangeEvent, SortOrder, StoreAdapter, StoreError, Table, TicketQuery};
use crate::http::{self, blocking, JoinFailed, Reply};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pit_core::config::{ConfigError, StoreConfig};
use pit_core::{InventoryItem, Ticket, TicketId, TicketStatus, Worker, WorkerId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use ureq::Agent;

impl From<JoinFailed> for StoreError {
    fn from(e: JoinFailed) -> Self {
        StoreError::Transport(e.0)
    }
}

impl From<ureq::Error> for StoreError {
    fn from(e: ureq::Error) -> Self {
        StoreError::Transport(e.to_string())
    }
}

type Query = Vec<(&'static str, String)>;

/// Store adapter speaking the PostgREST dialect (`/rest/v1/<table>`)
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<Inner>,
}

struct Inner {
    agent: Agent,
    base: String,
    key: String,
    change_poll: Duration,
}

impl RestStore {
    pub fn new(url: &str, api_key: &str, timeout: Duration, change_poll: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                agent: http::agent(timeout),
                base: url.trim_end_matches('/').to_string(),
                key: api_key.to_string(),
                change_poll,
            }),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            &config.url,
            config.api_key()?,
            config.timeout,
            config.change_poll,
        ))
    }

    fn endpoint(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.inner.base, table)
    }

    async fn select<T>(&self, table: Table, query: Query) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let store = self.clone();
        blocking(move || {
            let reply = store.get_raw(table, &query)?;
            serde_json::from_str(&reply.body).map_err(|e| StoreError::Decode(e.to_string()))
        })
        .await
    }

    fn get_raw(&self, table: Table, query: &Query) -> Result<Reply, StoreError> {
        let mut request = self
            .inner
            .agent
            .get(self.endpoint(table))
            .header("apikey", self.inner.key.as_str())
            .header("Authorization", format!("Bearer {}", self.inner.key));
        for (key, value) in query {
            request = request.query(*key, value);
        }
        checked(Reply::read(request.call()?)?)
    }

    /// POST or PATCH with a JSON body
    async fn write<B>(
        &self,
        method: WriteMethod,
        table: Table,
        query: Query,
        body: B,
        prefer: &'static str,
    ) -> Result<Reply, StoreError>
    where
        B: Serialize + Send + 'static,
    {
        let store = self.clone();
        blocking(move || {
            let url = store.endpoint(table);
            let mut request = match method {
                WriteMethod::Post => store.inner.agent.post(url),
                WriteMethod::Patch => store.inner.agent.patch(url),
            }
            .header("apikey", store.inner.key.as_str())
            .header("Authorization", format!("Bearer {}", store.inner.key))
            .header("Prefer", prefer);
            for (key, value) in &query {
                request = request.query(*key, value);
            }
            checked(Reply::read(request.send_json(&body)?)?)
        })
        .await
    }

    async fn delete(&self, table: Table, query: Query) -> Result<(), StoreError> {
        let store = self.clone();
        blocking(move || {
            let mut request = store
                .inner
                .agent
                .delete(store.endpoint(table))
                .header("apikey", store.inner.key.as_str())
                .header("Authorization", format!("Bearer {}", store.inner.key));
            for (key, value) in &query {
                request = request.query(*key, value);
            }
            checked(Reply::read(request.call()?)?)?;
            Ok(())
        })
        .await
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteMethod {
    Post,
    Patch,
}

fn checked(reply: Reply) -> Result<Reply, StoreError> {
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(StoreError::Status {
            status: reply.status,
            body: http::snippet(&reply.body),
        })
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// PostgREST query parameters for a ticket selection
pub(crate) fn ticket_params(query: &TicketQuery) -> Query {
    let mut params: Query = vec![("select", "*".to_string())];
    if !query.statuses.is_empty() {
        let names: Vec<&str> = query.statuses.iter().map(|s| s.as_str()).collect();
        params.push(("status", format!("in.({})", names.join(","))));
    }
    let direction = match query.order {
        SortOrder::Ascending => "asc",
        SortOrder::Descending => "desc",
    };
    params.push(("order", format!("created_at.{},id.{}", direction, direction)));
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

#[derive(Serialize)]
struct ClaimPatch<'a> {
    status: TicketStatus,
    worker_id: &'a WorkerId,
    started_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ProfileRow {
    #[serde(default)]
    role: Option<String>,
}

#[async_trait]
impl StoreAdapter for RestStore {
    async fn list_workers(&self, active_only: bool) -> Result<Vec<Worker>, StoreError> {
        let mut query: Query = vec![("select", "*".to_string()), ("order", "id.asc".to_string())];
        if active_only {
            query.push(("active", eq(true)));
        }
        self.select(Table::Workers, query).await
    }

    async fn upsert_worker(&self, worker: &Worker) -> Result<(), StoreError> {
        self.write(
            WriteMethod::Post,
            Table::Workers,
            Vec::new(),
            worker.clone(),
            "resolution=merge-duplicates",
        )
        .await?;
        Ok(())
    }

    async fn delete_worker(&self, id: &WorkerId) -> Result<(), StoreError> {
        self.delete(Table::Workers, vec![("id", eq(id))]).await
    }

    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, StoreError> {
        self.select(Table::Tickets, ticket_params(query)).await
    }

    async fn get_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError> {
        let rows: Vec<Ticket> = self
            .select(
                Table::Tickets,
                vec![("select", "*".to_string()), ("id", eq(id)), ("limit", "1".to_string())],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        self.write(
            WriteMethod::Post,
            Table::Tickets,
            Vec::new(),
            ticket.clone(),
            "return=minimal",
        )
        .await?;
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let reply = self
            .write(
                WriteMethod::Patch,
                Table::Tickets,
                vec![("id", eq(&ticket.id))],
                ticket.clone(),
                "return=representation",
            )
            .await?;
        if returned_rows(&reply)? == 0 {
            return Err(StoreError::NotFound(ticket.id.to_string()));
        }
        Ok(())
    }

    async fn claim_ticket(
        &self,
        id: &TicketId,
        worker: &WorkerId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let patch = serde_json::to_value(ClaimPatch {
            status: TicketStatus::Processing,
            worker_id: worker,
            started_at: at,
            updated_at: at,
        })
        .map_err(|e| StoreError::Decode(e.to_string()))?;
        let reply = self
            .write(
                WriteMethod::Patch,
                Table::Tickets,
                vec![("id", eq(id)), ("status", eq(TicketStatus::Waiting))],
                patch,
                "return=representation",
            )
            .await?;
        Ok(returned_rows(&reply)? > 0)
    }

    async fn delete_ticket(&self, id: &TicketId) -> Result<(), StoreError> {
        self.delete(Table::Tickets, vec![("id", eq(id))]).await
    }

    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
        self.select(
            Table::Inventory,
            vec![("select", "*".to_string()), ("order", "name.asc".to_string())],
        )
        .await
    }

    async fn insert_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        self.write(
            WriteMethod::Post,
            Table::Inventory,
            Vec::new(),
            item.clone(),
            "return=minimal",
        )
        .await?;
        Ok(())
    }

    async fn update_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let reply = self
            .write(
                WriteMethod::Patch,
                Table::Inventory,
                vec![("id", eq(&item.id))],
                item.clone(),
                "return=representation",
            )
            .await?;
        if returned_rows(&reply)? == 0 {
            return Err(StoreError::NotFound(item.id.to_string()));
        }
        Ok(())
    }

    async fn profile_role(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let rows: Vec<ProfileRow> = self
            .select(
                Table::Profiles,
                vec![
                    ("select", "role".to_string()),
                    ("id", eq(user_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().and_then(|row| row.role))
    }

    async fn subscribe(&self, table: Table) -> Result<mpsc::Receiver<ChangeEvent>, StoreError> {
        let (tx, rx) = mpsc::channel(1);
        let store = self.clone();
        // Establish the baseline before returning so the first change is seen
        let mut last = store.fingerprint(table).await?;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(store.inner.change_poll);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tx.closed() => break,
                }
                match store.fingerprint(table).await {
                    Ok(current) if current != last => {
                        last = current;
                        // A full channel already holds an undelivered change
                        if let Err(mpsc::error::TrySendError::Closed(_)) =
                            tx.try_send(ChangeEvent { table })
                        {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::debug!(%table, error = %e, "change poll failed"),
                }
            }
            tracing::debug!(%table, "change feed stopped");
        });

        Ok(rx)
    }
}

impl RestStore {
    /// Hash of the full table contents
    async fn fingerprint(&self, table: Table) -> Result<u64, StoreError> {
        let store = self.clone();
        blocking(move || {
            let query: Query = vec![("select", "*".to_string())];
            let reply = store.get_raw(table, &query)?;
            let mut hasher = DefaultHasher::new();
            reply.body.hash(&mut hasher);
            Ok(hasher.finish())
        })
        .await
    }
}

fn returned_rows(reply: &Reply) -> Result<usize, StoreError> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&reply.body).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(rows.len())
}

#[cfg(test)]
#[path = "rest_tests.rs"]
mod tests;
