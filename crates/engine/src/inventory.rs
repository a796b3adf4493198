// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stock search and supplier invoice import
//!
//! Reading an invoice photo and recognising its lines as known items are
//! both delegated to the inference endpoint. Matching is best effort: if
//! the endpoint fails or replies with garbage, every line is imported as a
//! new item.

use crate::error::EngineError;
use pit_adapters::{ImageData, InferenceAdapter, InferenceRequest, StoreAdapter};
use pit_core::fuzzy::filter_by_keyword;
use pit_core::inventory::plan_import;
use pit_core::{extract_as, Clock, IdGen, IdKind, InventoryItem, ItemMatch, ScannedLine};
use serde::{Deserialize, Serialize};
use serde_json::json;

const SCAN_INSTRUCTION: &str = "Read the line items on this supplier invoice. \
Reply with JSON only: {\"items\": [{\"name\": string, \"quantity\": integer, \
\"unit_price\": integer or null}]}. Prices are whole currency units without separators.";

const MATCH_INSTRUCTION: &str = "Match each scanned invoice line to at most one existing \
inventory item when they clearly name the same part (allow abbreviations and typos). \
Reply with JSON only: {\"matches\": [{\"scanned_index\": integer, \"item_id\": string}]}. \
Leave out lines with no confident match.";

#[derive(Deserialize)]
#[serde(untagged)]
enum ScanReply {
    Wrapped { items: Vec<ScannedLine> },
    Bare(Vec<ScannedLine>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MatchReply {
    Wrapped { matches: Vec<ItemMatch> },
    Bare(Vec<ItemMatch>),
}

/// What an import changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Existing items after their stock was raised
    pub restocked: Vec<InventoryItem>,
    pub created: Vec<InventoryItem>,
}

/// Inventory operations
#[derive(Clone)]
pub struct InventoryImport<S, G, C, I> {
    store: S,
    inference: G,
    clock: C,
    ids: I,
}

impl<S, G, C, I> InventoryImport<S, G, C, I>
where
    S: StoreAdapter,
    G: InferenceAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn new(store: S, inference: G, clock: C, ids: I) -> Self {
        Self {
            store,
            inference,
            clock,
            ids,
        }
    }

    pub async fn list(&self) -> Result<Vec<InventoryItem>, EngineError> {
        Ok(self.store.list_inventory().await?)
    }

    /// Items whose name matches every word of `query`, tolerating typos
    pub async fn search(&self, query: &str) -> Result<Vec<InventoryItem>, EngineError> {
        let items = self.store.list_inventory().await?;
        Ok(filter_by_keyword(&items, query, |item| item.name.as_str())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Read the lines of a photographed invoice
    pub async fn scan_invoice(&self, image: ImageData) -> Result<Vec<ScannedLine>, EngineError> {
        let request = InferenceRequest::new(SCAN_INSTRUCTION).with_image(image).json();
        let raw = self.inference.generate(&request).await?;
        let lines = match extract_as::<ScanReply>(&raw)? {
            ScanReply::Wrapped { items } | ScanReply::Bare(items) => items,
        };
        let lines: Vec<ScannedLine> = lines
            .into_iter()
            .filter_map(|mut line| {
                line.name = line.name.trim().to_string();
                (!line.name.is_empty()).then_some(line)
            })
            .collect();
        tracing::info!(lines = lines.len(), "invoice scanned");
        Ok(lines)
    }

    /// Ask the endpoint which scanned lines are existing items
    ///
    /// Never fails: any problem yields no matches.
    pub async fn match_lines(
        &self,
        lines: &[ScannedLine],
        existing: &[InventoryItem],
    ) -> Vec<ItemMatch> {
        if lines.is_empty() || existing.is_empty() {
            return Vec::new();
        }
        let scanned: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(index, line)| json!({ "scanned_index": index, "name": line.name }))
            .collect();
        let known: Vec<_> = existing
            .iter()
            .map(|item| json!({ "item_id": item.id, "name": item.name }))
            .collect();
        let payload = json!({ "scanned": scanned, "inventory": known }).to_string();
        let request = InferenceRequest::new(MATCH_INSTRUCTION)
            .with_text(payload)
            .json();

        let raw = match self.inference.generate(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "item matching unavailable, importing all lines as new");
                return Vec::new();
            }
        };
        match extract_as::<MatchReply>(&raw) {
            Ok(MatchReply::Wrapped { matches } | MatchReply::Bare(matches)) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable match reply, importing all lines as new");
                Vec::new()
            }
        }
    }

    /// Save scanned lines: restock recognised items, create the rest
    pub async fn import(&self, lines: &[ScannedLine]) -> Result<ImportSummary, EngineError> {
        let existing = self.store.list_inventory().await?;
        let matches = self.match_lines(lines, &existing).await;
        let plan = plan_import(lines, &matches, &existing);
        let now = self.clock.now();

        // Check every restock before the first write
        let mut restocked = Vec::with_capacity(plan.restock.len());
        for restock in &plan.restock {
            let Some(item) = existing.iter().find(|i| i.id == restock.item_id) else {
                continue;
            };
            let stock = item.stock.checked_add(restock.quantity).ok_or_else(|| {
                EngineError::invalid(
                    "quantity",
                    format!("{} more of {} overflows its stock", restock.quantity, item.name),
                )
            })?;
            restocked.push(InventoryItem {
                stock,
                updated_at: Some(now),
                ..item.clone()
            });
        }

        let mut summary = ImportSummary::default();
        for updated in restocked {
            self.store.update_item(&updated).await?;
            summary.restocked.push(updated);
        }
        for line in &plan.create {
            let item = InventoryItem {
                id: self.ids.next(IdKind::Item).into(),
                name: line.name.clone(),
                sku: None,
                stock: line.quantity,
                price: line.unit_price.unwrap_or(0),
                updated_at: Some(now),
            };
            self.store.insert_item(&item).await?;
            summary.created.push(item);
        }

        tracing::info!(
            restocked = summary.restocked.len(),
            created = summary.created.len(),
            "invoice imported"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
