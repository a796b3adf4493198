// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking HTTP plumbing shared by the hosted-service adapters
//!
//! `ureq` is synchronous, so every request runs on tokio's blocking pool.

use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body};

/// Build an agent that reports HTTP error statuses as plain responses
pub(crate) fn agent(timeout: Duration) -> Agent {
    Agent::new_with_config(
        Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build(),
    )
}

/// A response reduced to what the adapters look at
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn read(mut response: Response<Body>) -> Result<Self, ureq::Error> {
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok(Self { status, body })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The blocking task panicked or was cancelled
#[derive(Debug)]
pub(crate) struct JoinFailed(pub String);

/// Run blocking I/O off the async executor
pub(crate) async fn blocking<T, E, F>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<JoinFailed> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(E::from(JoinFailed(e.to_string()))),
    }
}

/// Trim a response body for error messages
pub(crate) fn snippet(body: &str) -> String {
    const MAX: usize = 300;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
