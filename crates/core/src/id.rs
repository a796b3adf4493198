// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation abstractions

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// What an identifier is minted for; decides its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Ticket,
    Worker,
    Item,
    /// Payment gateway order reference
    Order,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Ticket => "tkt",
            IdKind::Worker => "wrk",
            IdKind::Item => "itm",
            IdKind::Order => "ord",
        }
    }
}

/// Generates unique identifiers
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self, kind: IdKind) -> String;
}

/// UUID-based ID generator for production use
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self, kind: IdKind) -> String {
        format!("{}-{}", kind.prefix(), uuid::Uuid::new_v4().simple())
    }
}

/// Sequential ID generator for testing
///
/// One counter is shared across kinds so ids stay globally ordered.
#[derive(Clone, Default)]
pub struct SequentialIdGen {
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self, kind: IdKind) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", kind.prefix(), n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
