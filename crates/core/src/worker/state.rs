// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mechanic records and busy-ness

use crate::ticket::{Ticket, TicketStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Unique identifier for a mechanic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        WorkerId(s)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        WorkerId(s.to_string())
    }
}

/// A mechanic in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    /// Only active mechanics receive work
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Worker {
    pub fn new(id: impl Into<WorkerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
        }
    }

    pub fn inactive(self) -> Self {
        Self {
            active: false,
            ..self
        }
    }
}

/// Mechanics referenced by at least one `processing` ticket
///
/// Tickets in any other status are ignored, so parked work does not
/// block its mechanic.
pub fn busy_workers<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> HashSet<WorkerId> {
    tickets
        .into_iter()
        .filter(|t| t.status == TicketStatus::Processing)
        .filter_map(|t| t.worker_id.clone())
        .collect()
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
