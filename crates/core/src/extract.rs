// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pulling structured data out of model replies
//!
//! Replies are asked to be bare JSON but regularly arrive wrapped in
//! Markdown fences or surrounded by prose. Extraction strips the fence,
//! then parses the outermost object or array span.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors from structured output extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("reply is empty")]
    Empty,
    #[error("no JSON object or array found in reply")]
    NotFound,
    #[error("invalid JSON in reply: {0}")]
    Invalid(#[from] serde_json::Error),
}

// Literal pattern, cannot fail to compile
#[allow(clippy::unwrap_used)]
fn fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*\n?(.*?)```").unwrap())
}

/// Extract the JSON payload from a raw reply
pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::Empty);
    }

    // Fast path: already clean
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() || value.is_array() {
            return Ok(value);
        }
    }

    let body = fence()
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed);

    let span = outer_span(body).ok_or(ExtractError::NotFound)?;
    Ok(serde_json::from_str(span)?)
}

/// Extract and deserialize a reply into `T`
pub fn extract_as<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    let value = extract_json(raw)?;
    Ok(serde_json::from_value(value)?)
}

/// Slice from the first `{` or `[` to its matching last closer
fn outer_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let closer = match text.as_bytes()[start] {
        b'{' => '}',
        _ => ']',
    };
    let end = text.rfind(closer)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
