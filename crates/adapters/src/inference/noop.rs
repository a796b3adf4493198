// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inference adapter for deployments without an LLM endpoint

use super::{InferenceAdapter, InferenceError, InferenceRequest};
use async_trait::async_trait;

/// Inference adapter that refuses every prompt
///
/// Callers treat [`InferenceError::Disabled`] like any other failure and
/// fall back to their safe default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpInference;

impl NoOpInference {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InferenceAdapter for NoOpInference {
    async fn generate(&self, _request: &InferenceRequest) -> Result<String, InferenceError> {
        Err(InferenceError::Disabled)
    }
}
