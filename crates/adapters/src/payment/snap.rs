// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snap-style payment gateway adapter

use super::{PaymentAdapter, PaymentError, PaymentRequest, PaymentSession, PaymentStatus};
use crate::http::{self, blocking, JoinFailed, Reply};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pit_core::config::{ConfigError, PaymentConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use ureq::Agent;

impl From<JoinFailed> for PaymentError {
    fn from(e: JoinFailed) -> Self {
        PaymentError::Transport(e.0)
    }
}

impl From<ureq::Error> for PaymentError {
    fn from(e: ureq::Error) -> Self {
        PaymentError::Transport(e.to_string())
    }
}

/// Gateway with a session API (`/snap/v1/transactions`) and a status API
/// (`/v2/<order>/status`), authenticated with the server key
#[derive(Clone)]
pub struct SnapGateway {
    inner: Arc<Inner>,
}

struct Inner {
    agent: Agent,
    url: String,
    status_url: String,
    authorization: String,
}

impl SnapGateway {
    pub fn new(url: &str, status_url: &str, server_key: &str, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                agent: http::agent(timeout),
                url: url.trim_end_matches('/').to_string(),
                status_url: status_url.trim_end_matches('/').to_string(),
                authorization: basic_auth(server_key),
            }),
        }
    }

    pub fn from_config(config: &PaymentConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            &config.url,
            config.status_url(),
            config.server_key()?,
            config.timeout,
        ))
    }
}

/// Server key as username, empty password
pub(crate) fn basic_auth(server_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", server_key)))
}

pub(crate) fn session_body(request: &PaymentRequest) -> Value {
    let mut customer = json!({ "first_name": request.customer.name });
    if let Some(phone) = &request.customer.phone {
        customer["phone"] = json!(phone);
    }
    if let Some(email) = &request.customer.email {
        customer["email"] = json!(email);
    }
    json!({
        "transaction_details": {
            "order_id": request.order_id,
            "gross_amount": request.amount,
        },
        "customer_details": customer,
    })
}

#[derive(Deserialize)]
struct SessionReply {
    token: String,
    #[serde(default)]
    redirect_url: Option<String>,
}

#[derive(Deserialize)]
struct StatusReply {
    #[serde(default)]
    status_code: Option<String>,
    #[serde(default)]
    transaction_status: Option<String>,
    #[serde(default)]
    fraud_status: Option<String>,
    #[serde(default)]
    status_message: Option<String>,
}

/// Map a status lookup reply onto an outcome
///
/// An unknown order (404) has not been paid yet and reads as pending.
pub(crate) fn parse_status(http_status: u16, body: &str) -> Result<PaymentStatus, PaymentError> {
    if http_status == 404 {
        return Ok(PaymentStatus::Pending);
    }
    if !(200..300).contains(&http_status) {
        return Err(PaymentError::Status {
            status: http_status,
            body: http::snippet(body),
        });
    }
    let reply: StatusReply =
        serde_json::from_str(body).map_err(|e| PaymentError::Decode(e.to_string()))?;
    if reply.status_code.as_deref() == Some("404") {
        return Ok(PaymentStatus::Pending);
    }

    let Some(status) = reply.transaction_status else {
        return Err(PaymentError::Decode(
            reply
                .status_message
                .unwrap_or_else(|| "missing transaction_status".to_string()),
        ));
    };
    Ok(match status.as_str() {
        "settlement" => PaymentStatus::Success,
        "capture" => match reply.fraud_status.as_deref() {
            Some("challenge") => PaymentStatus::Pending,
            Some("deny") => PaymentStatus::Failed("deny".to_string()),
            _ => PaymentStatus::Success,
        },
        "pending" | "authorize" => PaymentStatus::Pending,
        other => PaymentStatus::Failed(other.to_string()),
    })
}

#[async_trait]
impl PaymentAdapter for SnapGateway {
    async fn create_session(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        let gateway = self.clone();
        let body = session_body(request);
        let order_id = request.order_id.clone();
        blocking(move || {
            let response = gateway
                .inner
                .agent
                .post(format!("{}/snap/v1/transactions", gateway.inner.url))
                .header("Authorization", gateway.inner.authorization.as_str())
                .header("Accept", "application/json")
                .send_json(&body)?;
            let reply = Reply::read(response)?;
            if !reply.is_success() {
                return Err(PaymentError::Status {
                    status: reply.status,
                    body: http::snippet(&reply.body),
                });
            }
            let session: SessionReply = serde_json::from_str(&reply.body)
                .map_err(|e| PaymentError::Decode(e.to_string()))?;
            Ok(PaymentSession {
                order_id,
                token: session.token,
                redirect_url: session.redirect_url,
            })
        })
        .await
    }

    async fn status(&self, order_id: &str) -> Result<PaymentStatus, PaymentError> {
        let gateway = self.clone();
        let url = format!("{}/v2/{}/status", self.inner.status_url, order_id);
        blocking(move || {
            let response = gateway
                .inner
                .agent
                .get(url)
                .header("Authorization", gateway.inner.authorization.as_str())
                .header("Accept", "application/json")
                .call()?;
            let reply = Reply::read(response)?;
            parse_status(reply.status, &reply.body)
        })
        .await
    }
}

#[cfg(test)]
#[path = "snap_tests.rs"]
mod tests;
