// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payment adapter for deployments without a gateway

use super::{PaymentAdapter, PaymentError, PaymentRequest, PaymentSession, PaymentStatus};
use async_trait::async_trait;

/// Payment adapter that refuses every session
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpPayment;

impl NoOpPayment {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentAdapter for NoOpPayment {
    async fn create_session(
        &self,
        _request: &PaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        Err(PaymentError::Disabled)
    }

    async fn status(&self, _order_id: &str) -> Result<PaymentStatus, PaymentError> {
        Err(PaymentError::Disabled)
    }
}
