// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spare-part inventory and invoice import planning

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Unique identifier for an inventory item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

/// A stocked part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub stock: i64,
    /// Selling price per unit
    pub price: i64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One line read off a supplier invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedLine {
    pub name: String,
    #[serde(default = "one")]
    pub quantity: i64,
    /// Purchase price per unit, when legible
    #[serde(default)]
    pub unit_price: Option<i64>,
}

fn one() -> i64 {
    1
}

/// A scanned line recognised as an existing item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMatch {
    pub scanned_index: usize,
    pub item_id: ItemId,
}

/// Stock increase for an existing item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restock {
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: Option<i64>,
}

/// What saving a scanned invoice will do
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportPlan {
    pub restock: Vec<Restock>,
    pub create: Vec<ScannedLine>,
}

/// Split scanned lines into restocks and new items
///
/// A match is honoured only if it points at a real line and a known item,
/// and only the first match per line counts. Unmatched lines become new
/// items. Lines with a non-positive quantity are dropped. Several lines
/// matched to the same item are summed into one restock; a line that would
/// overflow the sum is dropped.
pub fn plan_import(
    lines: &[ScannedLine],
    matches: &[ItemMatch],
    existing: &[InventoryItem],
) -> ImportPlan {
    let known: HashSet<&ItemId> = existing.iter().map(|i| &i.id).collect();

    let mut matched: HashMap<usize, &ItemId> = HashMap::new();
    for m in matches {
        if m.scanned_index < lines.len() && known.contains(&m.item_id) {
            matched.entry(m.scanned_index).or_insert(&m.item_id);
        }
    }

    let mut plan = ImportPlan::default();
    for (index, line) in lines.iter().enumerate() {
        if line.quantity <= 0 {
            continue;
        }
        match matched.get(&index) {
            Some(item_id) => {
                match plan.restock.iter_mut().find(|r| &&r.item_id == item_id) {
                    Some(existing) => {
                        let Some(quantity) = existing.quantity.checked_add(line.quantity) else {
                            tracing::warn!(
                                item_id = %existing.item_id,
                                line = index,
                                "scanned quantity overflows, line dropped"
                            );
                            continue;
                        };
                        existing.quantity = quantity;
                        existing.unit_price = line.unit_price.or(existing.unit_price);
                    }
                    None => plan.restock.push(Restock {
                        item_id: (*item_id).clone(),
                        quantity: line.quantity,
                        unit_price: line.unit_price,
                    }),
                }
            }
            None => plan.create.push(line.clone()),
        }
    }
    plan
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
