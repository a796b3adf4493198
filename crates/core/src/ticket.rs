// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repair tickets and their status lifecycle
//!
//! The assignment loop only ever moves a ticket from `waiting` to
//! `processing`. Every other transition is an operator action and goes
//! through [`Ticket::transition`].

use crate::worker::WorkerId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a ticket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TicketId {
    fn from(s: String) -> Self {
        TicketId(s)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        TicketId(s.to_string())
    }
}

/// Where a ticket is in the workshop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Queued, no mechanic yet
    Waiting,
    /// A mechanic is working on it
    Processing,
    /// Parked until parts arrive
    WaitingPart,
    /// Parked for any other reason
    Pending,
    /// Work finished, not yet paid
    Done,
    Paid,
    Cancelled,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 7] = [
        TicketStatus::Waiting,
        TicketStatus::Processing,
        TicketStatus::WaitingPart,
        TicketStatus::Pending,
        TicketStatus::Done,
        TicketStatus::Paid,
        TicketStatus::Cancelled,
    ];

    /// Wire name used by the store
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Processing => "processing",
            TicketStatus::WaitingPart => "waiting_part",
            TicketStatus::Pending => "pending",
            TicketStatus::Done => "done",
            TicketStatus::Paid => "paid",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    /// Paid and cancelled tickets never change again
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Paid | TicketStatus::Cancelled)
    }

    /// Parked tickets keep their mechanic but do not occupy them
    pub fn is_parked(self) -> bool {
        matches!(self, TicketStatus::Pending | TicketStatus::WaitingPart)
    }

    /// Compute the status an operator action leads to
    pub fn apply(self, action: TicketAction) -> Result<TicketStatus, TransitionError> {
        use TicketAction as A;
        use TicketStatus as S;

        let next = match (self, action) {
            (S::Processing, A::Finish) => S::Done,
            (S::Processing, A::Park) => S::Pending,
            (S::Processing, A::AwaitParts) => S::WaitingPart,
            (S::Pending | S::WaitingPart, A::Resume) => S::Processing,
            (S::Done, A::Pay) => S::Paid,
            (s, A::Cancel) if !s.is_terminal() => S::Cancelled,
            (from, action) => return Err(TransitionError::NotAllowed { from, action }),
        };
        Ok(next)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TransitionError::UnknownStatus(s.to_string()))
    }
}

/// Operator actions on a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    Finish,
    Park,
    AwaitParts,
    Resume,
    Cancel,
    Pay,
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TicketAction::Finish => "finish",
            TicketAction::Park => "park",
            TicketAction::AwaitParts => "await-parts",
            TicketAction::Resume => "resume",
            TicketAction::Cancel => "cancel",
            TicketAction::Pay => "pay",
        };
        f.write_str(name)
    }
}

/// Rejected status changes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action} a ticket that is {from}")]
    NotAllowed {
        from: TicketStatus,
        action: TicketAction,
    },
    #[error("cannot resume ticket without an assigned mechanic")]
    NoMechanic,
    #[error("unknown ticket status: {0}")]
    UnknownStatus(String),
}

/// A repair job in the workshop queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub plate_number: String,
    #[serde(default)]
    pub motorcycle: Option<String>,
    #[serde(default)]
    pub complaint: String,
    /// Short summary produced by issue triage
    #[serde(default)]
    pub issue_summary: Option<String>,
    pub status: TicketStatus,
    #[serde(default)]
    pub worker_id: Option<WorkerId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_booking: bool,
    #[serde(default)]
    pub booking_date: Option<NaiveDate>,
    #[serde(default)]
    pub booking_time: Option<NaiveTime>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Settled amount, set on payment
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// A fresh walk-in ticket
    pub fn walk_in(
        id: impl Into<TicketId>,
        customer_name: impl Into<String>,
        plate_number: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            customer_name: customer_name.into(),
            phone: None,
            plate_number: plate_number.into(),
            motorcycle: None,
            complaint: String::new(),
            issue_summary: None,
            status: TicketStatus::Waiting,
            worker_id: None,
            created_at,
            updated_at: None,
            is_booking: false,
            booking_date: None,
            booking_time: None,
            started_at: None,
            finished_at: None,
            total: None,
            paid_at: None,
        }
    }

    /// Mark the ticket as a booking for a given day
    pub fn booked_for(self, date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self {
            is_booking: true,
            booking_date: Some(date),
            booking_time: time,
            ..self
        }
    }

    /// A booking whose date lies strictly after `today`
    pub fn is_future_booking(&self, today: NaiveDate) -> bool {
        self.is_booking && self.booking_date.is_some_and(|date| date > today)
    }

    /// Whether the assignment loop may hand this ticket to a mechanic today
    pub fn is_eligible(&self, today: NaiveDate) -> bool {
        self.status == TicketStatus::Waiting && !self.is_future_booking(today)
    }

    /// Apply an operator action, returning the updated ticket
    pub fn transition(
        &self,
        action: TicketAction,
        now: DateTime<Utc>,
    ) -> Result<Ticket, TransitionError> {
        let status = self.status.apply(action)?;
        if action == TicketAction::Resume && self.worker_id.is_none() {
            return Err(TransitionError::NoMechanic);
        }

        let mut next = self.clone();
        next.status = status;
        next.updated_at = Some(now);
        match action {
            TicketAction::Finish => next.finished_at = Some(now),
            TicketAction::Pay => next.paid_at = Some(now),
            _ => {}
        }
        Ok(next)
    }

    /// Put the ticket back in the queue, dropping its mechanic
    ///
    /// Used when a parked ticket is resumed but its mechanic has picked up
    /// other work in the meantime. Arrival order is preserved.
    pub fn requeue(&self, now: DateTime<Utc>) -> Ticket {
        let mut next = self.clone();
        next.status = TicketStatus::Waiting;
        next.worker_id = None;
        next.started_at = None;
        next.updated_at = Some(now);
        next
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
