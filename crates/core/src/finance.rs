// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Revenue reporting over settled tickets

use crate::clock::local_date;
use crate::ticket::{Ticket, TicketStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Revenue for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub tickets: usize,
    pub gross: i64,
}

/// Revenue over a half-open date range `[from, to)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tickets_paid: usize,
    pub gross: i64,
    /// Days without sales are omitted
    pub by_day: Vec<DailyRevenue>,
}

impl RevenueReport {
    /// Build a report from tickets; only paid tickets inside the range count
    ///
    /// Days are shop-local, using `utc_offset_minutes`. A paid ticket without
    /// a `paid_at` stamp or total is skipped with a warning.
    pub fn build(
        tickets: &[Ticket],
        from: NaiveDate,
        to: NaiveDate,
        utc_offset_minutes: i32,
    ) -> Self {
        let mut days: BTreeMap<NaiveDate, (usize, i64)> = BTreeMap::new();

        for ticket in tickets.iter().filter(|t| t.status == TicketStatus::Paid) {
            let (Some(paid_at), Some(total)) = (ticket.paid_at, ticket.total) else {
                tracing::warn!(ticket_id = %ticket.id, "paid ticket without settlement data");
                continue;
            };
            let date = local_date(paid_at, utc_offset_minutes);
            if date < from || date >= to {
                continue;
            }
            let entry = days.entry(date).or_default();
            entry.0 += 1;
            entry.1 += total;
        }

        let by_day: Vec<DailyRevenue> = days
            .into_iter()
            .map(|(date, (tickets, gross))| DailyRevenue {
                date,
                tickets,
                gross,
            })
            .collect();

        Self {
            from,
            to,
            tickets_paid: by_day.iter().map(|d| d.tickets).sum(),
            gross: by_day.iter().map(|d| d.gross).sum(),
            by_day,
        }
    }

    /// Mean ticket value, zero when nothing was paid
    pub fn average_ticket(&self) -> i64 {
        if self.tickets_paid == 0 {
            return 0;
        }
        self.gross / self.tickets_paid as i64
    }
}

#[cfg(test)]
#[path = "finance_tests.rs"]
mod tests;
