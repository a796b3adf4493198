// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosted LLM inference adapters

mod gemini;
mod noop;
mod retry;

pub use gemini::GeminiInference;
pub use noop::NoOpInference;
pub use retry::RetryPolicy;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeInference;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from inference calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
    #[error("endpoint returned no text")]
    EmptyReply,
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("inference is not configured")]
    Disabled,
}

impl InferenceError {
    /// Upstream overload worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, InferenceError::Status { status, .. } if is_retryable_status(*status))
    }
}

/// Rate limiting and gateway/server overload
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Inline image sent alongside the instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// A single prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub instruction: String,
    pub text: Option<String>,
    pub image: Option<ImageData>,
    /// Ask the endpoint for a JSON reply
    pub json: bool,
}

impl InferenceRequest {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            text: None,
            image: None,
            json: false,
        }
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..self
        }
    }

    pub fn with_image(self, image: ImageData) -> Self {
        Self {
            image: Some(image),
            ..self
        }
    }

    pub fn json(self) -> Self {
        Self { json: true, ..self }
    }
}

/// Adapter for the hosted inference endpoint
#[async_trait]
pub trait InferenceAdapter: Clone + Send + Sync + 'static {
    /// Run the prompt and return the raw reply text
    async fn generate(&self, request: &InferenceRequest) -> Result<String, InferenceError>;
}

#[cfg(test)]
#[path = "inference_tests.rs"]
mod tests;
