// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted inference adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{InferenceAdapter, InferenceError, InferenceRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted replies in order and records every prompt
///
/// Once the script runs out every call fails with
/// [`InferenceError::EmptyReply`].
#[derive(Clone, Default)]
pub struct FakeInference {
    script: Arc<Mutex<VecDeque<Result<String, InferenceError>>>>,
    calls: Arc<Mutex<Vec<InferenceRequest>>>,
}

impl FakeInference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn reply(&self, text: impl Into<String>) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(text.into()));
        self
    }

    /// Queue a failure
    pub fn fail(&self, error: InferenceError) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
        self
    }

    /// Get all recorded prompts
    pub fn calls(&self) -> Vec<InferenceRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl InferenceAdapter for FakeInference {
    async fn generate(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(Err(InferenceError::EmptyReply))
    }
}
