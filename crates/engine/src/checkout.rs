// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-of-sale checkout for finished tickets

use crate::error::EngineError;
use pit_adapters::StoreAdapter;
use pit_core::{Clock, InventoryItem, ItemId, Ticket, TicketAction, TicketId, TicketStatus};
use serde::{Deserialize, Serialize};

/// Parts used on a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartLine {
    pub item_id: ItemId,
    pub quantity: i64,
}

impl PartLine {
    pub fn new(item_id: impl Into<ItemId>, quantity: i64) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub ticket_id: TicketId,
    pub lines: Vec<ReceiptLine>,
    pub parts_total: i64,
    pub labour: i64,
    pub total: i64,
}

/// Prices and settles tickets
#[derive(Clone)]
pub struct Checkout<S, C> {
    store: S,
    clock: C,
}

impl<S, C> Checkout<S, C>
where
    S: StoreAdapter,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Price a job at current inventory prices without changing anything
    pub async fn quote(
        &self,
        ticket_id: &TicketId,
        parts: &[PartLine],
        labour: i64,
    ) -> Result<Receipt, EngineError> {
        let ticket = self.ticket(ticket_id).await?;
        let inventory = self.store.list_inventory().await?;
        let (receipt, _) = price(&ticket, parts, labour, &inventory)?;
        Ok(receipt)
    }

    /// Take payment: draw parts from stock and mark the ticket paid
    ///
    /// Only finished tickets can be settled. Stock is checked for every
    /// line before any item is touched. If a later write fails, the items
    /// already drawn are put back so the settlement can be retried.
    pub async fn settle(
        &self,
        ticket_id: &TicketId,
        parts: &[PartLine],
        labour: i64,
    ) -> Result<Receipt, EngineError> {
        let ticket = self.ticket(ticket_id).await?;
        let now = self.clock.now();
        let mut paid = ticket.transition(TicketAction::Pay, now)?;

        let inventory = self.store.list_inventory().await?;
        let (receipt, items) = price(&ticket, parts, labour, &inventory)?;
        for (item, line) in items.iter().zip(&receipt.lines) {
            if item.stock < line.quantity {
                return Err(EngineError::InsufficientStock {
                    item: item.name.clone(),
                    requested: line.quantity,
                    available: item.stock,
                });
            }
        }

        let mut drawn: Vec<InventoryItem> = Vec::with_capacity(items.len());
        for (item, line) in items.into_iter().zip(&receipt.lines) {
            let updated = InventoryItem {
                stock: item.stock - line.quantity,
                updated_at: Some(now),
                ..item.clone()
            };
            if let Err(e) = self.store.update_item(&updated).await {
                return Err(self.put_back(ticket_id, drawn, e.into()).await);
            }
            drawn.push(item);
        }

        paid.total = Some(receipt.total);
        if let Err(e) = self.store.update_ticket(&paid).await {
            return Err(self.put_back(ticket_id, drawn, e.into()).await);
        }
        tracing::info!(
            ticket = %ticket_id,
            total = receipt.total,
            lines = receipt.lines.len(),
            "ticket settled"
        );
        Ok(receipt)
    }

    /// Restore items drawn by a settlement that did not complete
    async fn put_back(
        &self,
        ticket_id: &TicketId,
        drawn: Vec<InventoryItem>,
        cause: EngineError,
    ) -> EngineError {
        let now = self.clock.now();
        let mut stranded = Vec::new();
        for item in drawn {
            let restored = InventoryItem {
                updated_at: Some(now),
                ..item
            };
            if let Err(e) = self.store.update_item(&restored).await {
                tracing::error!(
                    ticket = %ticket_id,
                    item = %restored.id,
                    error = %e,
                    "stock not restored"
                );
                stranded.push(restored.name);
            }
        }

        if stranded.is_empty() {
            tracing::warn!(ticket = %ticket_id, error = %cause, "settlement rolled back");
            return cause;
        }
        EngineError::SettlementIncomplete {
            ticket: ticket_id.to_string(),
            items: stranded.join(", "),
            cause: Box::new(cause),
        }
    }

    async fn ticket(&self, id: &TicketId) -> Result<Ticket, EngineError> {
        self.store
            .get_ticket(id)
            .await?
            .ok_or_else(|| EngineError::TicketNotFound(id.to_string()))
    }
}

/// Build the receipt, merging repeated items; returns the items in line order
fn price(
    ticket: &Ticket,
    parts: &[PartLine],
    labour: i64,
    inventory: &[InventoryItem],
) -> Result<(Receipt, Vec<InventoryItem>), EngineError> {
    if matches!(ticket.status, TicketStatus::Paid | TicketStatus::Cancelled) {
        return Err(EngineError::invalid(
            "ticket",
            format!("{} is already {}", ticket.id, ticket.status),
        ));
    }
    if labour < 0 {
        return Err(EngineError::invalid("labour", "must not be negative"));
    }

    let mut lines: Vec<ReceiptLine> = Vec::new();
    let mut items: Vec<InventoryItem> = Vec::new();
    for part in parts {
        if part.quantity <= 0 {
            return Err(EngineError::invalid(
                "quantity",
                format!("{} for {}", part.quantity, part.item_id),
            ));
        }
        if let Some(line) = lines.iter_mut().find(|l| l.item_id == part.item_id) {
            line.quantity = line
                .quantity
                .checked_add(part.quantity)
                .ok_or_else(|| too_large(&part.item_id))?;
            line.amount = line
                .quantity
                .checked_mul(line.unit_price)
                .ok_or_else(|| too_large(&part.item_id))?;
            continue;
        }
        let item = inventory
            .iter()
            .find(|i| i.id == part.item_id)
            .ok_or_else(|| EngineError::ItemNotFound(part.item_id.to_string()))?;
        let amount = part
            .quantity
            .checked_mul(item.price)
            .ok_or_else(|| too_large(&part.item_id))?;
        lines.push(ReceiptLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            quantity: part.quantity,
            unit_price: item.price,
            amount,
        });
        items.push(item.clone());
    }

    let parts_total = lines
        .iter()
        .try_fold(0i64, |sum, l| sum.checked_add(l.amount))
        .ok_or_else(|| EngineError::invalid("quantity", "parts total is too large"))?;
    let total = parts_total
        .checked_add(labour)
        .ok_or_else(|| EngineError::invalid("labour", "total is too large"))?;
    Ok((
        Receipt {
            ticket_id: ticket.id.clone(),
            lines,
            parts_total,
            labour,
            total,
        },
        items,
    ))
}

fn too_large(item_id: &ItemId) -> EngineError {
    EngineError::invalid("quantity", format!("amount for {item_id} is too large"))
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;
