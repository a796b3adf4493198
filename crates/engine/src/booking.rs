// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Paid diagnosis bookings
//!
//! The customer pays a diagnosis fee through the gateway first; the ticket
//! is opened only once the gateway reports success.

use crate::desk::{NewTicket, TicketDesk};
use crate::error::EngineError;
use pit_adapters::{
    Customer, PaymentAdapter, PaymentRequest, PaymentSession, PaymentStatus, StoreAdapter,
};
use pit_core::{Clock, IdGen, IdKind, Ticket};
use std::time::Duration;

/// How long to wait for the gateway to settle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Payment-gated ticket intake
#[derive(Clone)]
pub struct DiagnosisBooking<S, P, C, I> {
    desk: TicketDesk<S, C, I>,
    payment: P,
    ids: I,
}

impl<S, P, C, I> DiagnosisBooking<S, P, C, I>
where
    S: StoreAdapter,
    P: PaymentAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn new(desk: TicketDesk<S, C, I>, payment: P, ids: I) -> Self {
        Self { desk, payment, ids }
    }

    /// Open a payment session for the diagnosis fee
    pub async fn start(
        &self,
        customer: Customer,
        amount: i64,
    ) -> Result<PaymentSession, EngineError> {
        if amount <= 0 {
            return Err(EngineError::invalid("amount", "must be positive"));
        }
        if customer.name.trim().is_empty() {
            return Err(EngineError::invalid("customer_name", "must not be empty"));
        }
        let request = PaymentRequest {
            order_id: self.ids.next(IdKind::Order),
            amount,
            customer,
        };
        let session = self.payment.create_session(&request).await?;
        tracing::info!(order_id = %session.order_id, amount, "diagnosis payment started");
        Ok(session)
    }

    /// Wait for the payment to settle, then open the ticket
    ///
    /// Gateway lookup errors while polling are logged and polling goes on
    /// until the timeout.
    pub async fn confirm(
        &self,
        order_id: &str,
        new: NewTicket,
        poll: PollPolicy,
    ) -> Result<Ticket, EngineError> {
        let waiting = self.wait_for_outcome(order_id, poll.interval);
        let outcome = tokio::time::timeout(poll.timeout, waiting)
            .await
            .map_err(|_| EngineError::PaymentTimeout(order_id.to_string()))?;

        match outcome {
            PaymentStatus::Success => {
                let ticket = self.desk.intake(new).await?;
                tracing::info!(order_id, ticket = %ticket.id, "diagnosis paid, ticket opened");
                Ok(ticket)
            }
            PaymentStatus::Failed(reason) => {
                tracing::warn!(order_id, %reason, "diagnosis payment failed");
                Err(EngineError::PaymentFailed {
                    order_id: order_id.to_string(),
                    reason,
                })
            }
            PaymentStatus::Pending => Err(EngineError::PaymentTimeout(order_id.to_string())),
        }
    }

    /// Poll until the status is no longer pending
    async fn wait_for_outcome(&self, order_id: &str, interval: Duration) -> PaymentStatus {
        loop {
            match self.payment.status(order_id).await {
                Ok(PaymentStatus::Pending) => {}
                Ok(outcome) => return outcome,
                Err(e) => tracing::warn!(order_id, error = %e, "payment status lookup failed"),
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
