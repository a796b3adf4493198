// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted payment gateway for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PaymentAdapter, PaymentError, PaymentRequest, PaymentSession, PaymentStatus};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded payment call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentCall {
    CreateSession { order_id: String, amount: i64 },
    Status { order_id: String },
}

#[derive(Default)]
struct State {
    calls: Vec<PaymentCall>,
    /// Status replies per order, replayed in order; the last one repeats
    outcomes: HashMap<String, VecDeque<Result<PaymentStatus, PaymentError>>>,
    reject_sessions: Option<PaymentError>,
}

/// Payment gateway double with scripted outcomes
///
/// Orders without a script stay pending.
#[derive(Clone, Default)]
pub struct FakePayment {
    state: Arc<Mutex<State>>,
}

impl FakePayment {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue the next status reply for an order
    pub fn outcome(&self, order_id: &str, outcome: Result<PaymentStatus, PaymentError>) -> &Self {
        self.lock()
            .outcomes
            .entry(order_id.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Make session creation fail
    pub fn reject_sessions(&self, error: PaymentError) {
        self.lock().reject_sessions = Some(error);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PaymentCall> {
        self.lock().calls.clone()
    }
}

#[async_trait]
impl PaymentAdapter for FakePayment {
    async fn create_session(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        let mut state = self.lock();
        state.calls.push(PaymentCall::CreateSession {
            order_id: request.order_id.clone(),
            amount: request.amount,
        });
        if let Some(error) = &state.reject_sessions {
            return Err(error.clone());
        }
        Ok(PaymentSession {
            order_id: request.order_id.clone(),
            token: format!("token-{}", request.order_id),
            redirect_url: None,
        })
    }

    async fn status(&self, order_id: &str) -> Result<PaymentStatus, PaymentError> {
        let mut state = self.lock();
        state.calls.push(PaymentCall::Status {
            order_id: order_id.to_string(),
        });
        let Some(script) = state.outcomes.get_mut(order_id) else {
            return Ok(PaymentStatus::Pending);
        };
        match script.len() {
            0 => Ok(PaymentStatus::Pending),
            1 => script.front().cloned().unwrap_or(Ok(PaymentStatus::Pending)),
            _ => script.pop_front().unwrap_or(Ok(PaymentStatus::Pending)),
        }
    }
}
