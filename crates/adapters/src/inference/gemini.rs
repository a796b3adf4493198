// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gemini `generateContent` adapter

use super::{InferenceAdapter, InferenceError, InferenceRequest, RetryPolicy};
use crate::http::{self, blocking, JoinFailed, Reply};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pit_core::config::{ConfigError, InferenceConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use ureq::Agent;

impl From<JoinFailed> for InferenceError {
    fn from(e: JoinFailed) -> Self {
        InferenceError::Transport(e.0)
    }
}

impl From<ureq::Error> for InferenceError {
    fn from(e: ureq::Error) -> Self {
        InferenceError::Transport(e.to_string())
    }
}

/// Inference over the Gemini REST API
#[derive(Clone)]
pub struct GeminiInference {
    inner: Arc<Inner>,
}

struct Inner {
    agent: Agent,
    endpoint: String,
    key: String,
    retry: RetryPolicy,
}

impl GeminiInference {
    pub fn new(
        url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                agent: http::agent(timeout),
                endpoint: endpoint(url, model),
                key: api_key.to_string(),
                retry,
            }),
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            &config.url,
            &config.model,
            config.api_key()?,
            config.timeout,
            RetryPolicy::new(config.max_retries, config.retry_backoff),
        ))
    }

    fn post_once(&self, body: &Value) -> Result<String, InferenceError> {
        let response = self
            .inner
            .agent
            .post(&self.inner.endpoint)
            .header("x-goog-api-key", self.inner.key.as_str())
            .send_json(body)?;
        let reply = Reply::read(response)?;
        if !reply.is_success() {
            return Err(InferenceError::Status {
                status: reply.status,
                body: http::snippet(&reply.body),
            });
        }
        Ok(reply.body)
    }
}

pub(crate) fn endpoint(url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        url.trim_end_matches('/'),
        model
    )
}

/// Wire body for one prompt
pub(crate) fn request_body(request: &InferenceRequest) -> Value {
    let mut parts = vec![json!({ "text": request.instruction })];
    if let Some(text) = &request.text {
        parts.push(json!({ "text": text }));
    }
    if let Some(image) = &request.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": STANDARD.encode(&image.bytes),
            }
        }));
    }

    let mut body = json!({ "contents": [{ "role": "user", "parts": parts }] });
    if request.json {
        body["generationConfig"] = json!({ "responseMimeType": "application/json" });
    }
    body
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text of the first candidate
pub(crate) fn reply_text(body: &str) -> Result<String, InferenceError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| InferenceError::Decode(e.to_string()))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(InferenceError::EmptyReply);
    }
    Ok(text)
}

#[async_trait]
impl InferenceAdapter for GeminiInference {
    async fn generate(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        let body = request_body(request);
        let raw = self
            .inner
            .retry
            .run(|| {
                let this = self.clone();
                let body = body.clone();
                async move { blocking(move || this.post_once(&body)).await }
            })
            .await?;
        reply_text(&raw)
    }
}

#[cfg(test)]
#[path = "gemini_tests.rs"]
mod tests;
