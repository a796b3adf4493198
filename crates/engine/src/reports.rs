// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finance reports

use crate::error::EngineError;
use chrono::NaiveDate;
use pit_adapters::{StoreAdapter, TicketQuery};
use pit_core::{RevenueReport, TicketStatus};

#[derive(Clone)]
pub struct FinanceReports<S> {
    store: S,
    utc_offset_minutes: i32,
}

impl<S: StoreAdapter> FinanceReports<S> {
    pub fn new(store: S, utc_offset_minutes: i32) -> Self {
        Self {
            store,
            utc_offset_minutes,
        }
    }

    /// Revenue from tickets paid on shop-local days `[from, to)`
    pub async fn revenue(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RevenueReport, EngineError> {
        if from >= to {
            return Err(EngineError::invalid("to", "must be after from"));
        }
        let paid = self
            .store
            .list_tickets(&TicketQuery::status(TicketStatus::Paid))
            .await?;
        Ok(RevenueReport::build(&paid, from, to, self.utc_offset_minutes))
    }
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
