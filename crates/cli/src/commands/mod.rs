// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod access;
pub mod assign;
pub mod book;
pub mod checkout;
pub mod inventory;
pub mod queue;
pub mod report;
pub mod score;
pub mod ticket;
pub mod triage;
pub mod worker;

use crate::output::clip;
use pit_core::Ticket;
use serde::Serialize;
use std::fmt;

/// One-line ticket summary
#[derive(Serialize)]
#[serde(transparent)]
pub struct TicketRow<'a>(pub &'a Ticket);

impl fmt::Display for TicketRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.0;
        write!(
            f,
            "{:<14} {:<13} {:<12} {:<20}",
            clip(&t.id.0, 14),
            t.status.to_string(),
            clip(&t.plate_number, 12),
            clip(&t.customer_name, 20),
        )?;
        if let Some(date) = t.booking_date {
            write!(f, " booked {}", date)?;
            if let Some(time) = t.booking_time {
                write!(f, " {}", time.format("%H:%M"))?;
            }
        }
        if let Some(worker) = &t.worker_id {
            write!(f, " [{}]", worker)?;
        }
        Ok(())
    }
}

/// Multi-line ticket detail
#[derive(Serialize)]
#[serde(transparent)]
pub struct TicketDetail<'a>(pub &'a Ticket);

impl fmt::Display for TicketDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.0;
        writeln!(f, "Ticket: {}", t.id)?;
        writeln!(f, "  Status: {}", t.status)?;
        writeln!(f, "  Customer: {}", t.customer_name)?;
        if let Some(phone) = &t.phone {
            writeln!(f, "  Phone: {}", phone)?;
        }
        writeln!(f, "  Plate: {}", t.plate_number)?;
        if let Some(motorcycle) = &t.motorcycle {
            writeln!(f, "  Motorcycle: {}", motorcycle)?;
        }
        if !t.complaint.is_empty() {
            writeln!(f, "  Complaint: {}", t.complaint)?;
        }
        if let Some(summary) = &t.issue_summary {
            writeln!(f, "  Summary: {}", summary)?;
        }
        if let Some(date) = t.booking_date {
            writeln!(f, "  Booked for: {}", date)?;
        }
        if let Some(worker) = &t.worker_id {
            writeln!(f, "  Mechanic: {}", worker)?;
        }
        if let Some(total) = t.total {
            writeln!(f, "  Total: {}", crate::output::money(total))?;
        }
        write!(f, "  Created: {}", t.created_at.format("%Y-%m-%d %H:%M"))
    }
}
