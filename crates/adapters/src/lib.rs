// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the hosted store, inference endpoint and payment gateway

mod http;
pub mod inference;
pub mod payment;
pub mod store;
pub mod traced;

pub use inference::{
    GeminiInference, ImageData, InferenceAdapter, InferenceError, InferenceRequest, NoOpInference,
    RetryPolicy,
};
pub use payment::{
    Customer, NoOpPayment, PaymentAdapter, PaymentError, PaymentRequest, PaymentSession,
    PaymentStatus, SnapGateway,
};
pub use store::{
    ChangeEvent, RestStore, SortOrder, StoreAdapter, StoreError, Table, TicketQuery,
};
pub use traced::{TracedInference, TracedPayment, TracedStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use inference::FakeInference;
#[cfg(any(test, feature = "test-support"))]
pub use payment::{FakePayment, PaymentCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
