// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosted payment gateway adapters

mod noop;
mod snap;

pub use noop::NoOpPayment;
pub use snap::SnapGateway;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePayment, PaymentCall};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the payment gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("gateway returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("payment is not configured")]
    Disabled,
}

/// Who is paying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            email: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Caller-chosen, unique per attempt
    pub order_id: String,
    /// Minor currency units
    pub amount: i64,
    pub customer: Customer,
}

/// An opened checkout the customer completes on the gateway's side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentSession {
    pub order_id: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Outcome of a payment as reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Success,
    Pending,
    Failed(String),
}

/// Adapter for the hosted payment gateway
#[async_trait]
pub trait PaymentAdapter: Clone + Send + Sync + 'static {
    /// Open a payment session and return its opaque token
    async fn create_session(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentSession, PaymentError>;

    /// Current outcome of an order
    async fn status(&self, order_id: &str) -> Result<PaymentStatus, PaymentError>;
}
