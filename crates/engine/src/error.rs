// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine services

use pit_adapters::{InferenceError, PaymentError, StoreError};
use pit_core::{ExtractError, Permission, TransitionError};
use thiserror::Error;

/// Errors returned to whoever initiated an operation
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),
    #[error("could not read model reply: {0}")]
    Extract(#[from] ExtractError),
    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("ticket not found: {0}")]
    TicketNotFound(String),
    #[error("mechanic not found: {0}")]
    WorkerNotFound(String),
    #[error("inventory item not found: {0}")]
    ItemNotFound(String),
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("mechanic {0} is working on a ticket")]
    WorkerBusy(String),
    #[error("not enough stock for {item}: need {requested}, have {available}")]
    InsufficientStock {
        item: String,
        requested: i64,
        available: i64,
    },
    #[error("payment {order_id} failed: {reason}")]
    PaymentFailed { order_id: String, reason: String },
    #[error("payment {0} still pending after timeout")]
    PaymentTimeout(String),
    #[error("settlement of {ticket} failed and stock for {items} was not restored: {cause}")]
    SettlementIncomplete {
        ticket: String,
        items: String,
        cause: Box<EngineError>,
    },
    #[error("access denied: cannot {0}")]
    AccessDenied(Permission),
}

impl EngineError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
