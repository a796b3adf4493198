// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service factory for CLI commands

use anyhow::Result;
use async_trait::async_trait;
use pit_adapters::{
    GeminiInference, InferenceAdapter, InferenceError, InferenceRequest, NoOpInference, RestStore,
    SnapGateway, TracedInference, TracedPayment, TracedStore,
};
use pit_core::{Config, Permission, SystemClock, UuidIdGen};
use pit_engine::{AccessControl, EngineError, PollPolicy, TicketDesk};

use crate::error::{explain, PitError};

pub type Store = TracedStore<RestStore>;
pub type Payment = TracedPayment<SnapGateway>;

/// The configured model, or one that always reports itself disabled
#[derive(Clone)]
pub enum Inference {
    Gemini(TracedInference<GeminiInference>),
    Disabled(NoOpInference),
}

#[async_trait]
impl InferenceAdapter for Inference {
    async fn generate(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        match self {
            Inference::Gemini(inner) => inner.generate(request).await,
            Inference::Disabled(inner) => inner.generate(request).await,
        }
    }
}

/// Everything a command needs, built once from config
pub struct App {
    pub config: Config,
    pub store: Store,
    inference: Inference,
    payment: Option<Payment>,
    user: Option<String>,
}

impl App {
    pub fn new(config: Config, user: Option<String>) -> Result<Self> {
        let store = TracedStore::new(RestStore::from_config(&config.store)?);
        let inference = match &config.inference {
            Some(inference) => {
                Inference::Gemini(TracedInference::new(GeminiInference::from_config(inference)?))
            }
            None => Inference::Disabled(NoOpInference::new()),
        };
        let payment = match &config.payment {
            Some(payment) => Some(TracedPayment::new(SnapGateway::from_config(payment)?)),
            None => None,
        };
        Ok(Self {
            config,
            store,
            inference,
            payment,
            user,
        })
    }

    pub fn offset(&self) -> i32 {
        self.config.shop.utc_offset_minutes
    }

    pub fn desk(&self) -> TicketDesk<Store, SystemClock, UuidIdGen> {
        TicketDesk::new(self.store.clone(), SystemClock, UuidIdGen, self.offset())
    }

    pub fn inference(&self) -> Inference {
        self.inference.clone()
    }

    pub fn payment(&self) -> Result<Payment> {
        self.payment
            .clone()
            .ok_or_else(|| PitError::payment_not_configured().into())
    }

    /// Diagnosis fee and how long to wait for it to settle
    pub fn payment_terms(&self) -> Option<(i64, PollPolicy)> {
        self.config.payment.as_ref().map(|p| {
            (
                p.diagnosis_fee,
                PollPolicy {
                    interval: p.poll_interval,
                    timeout: p.poll_timeout,
                },
            )
        })
    }

    /// Check the acting user's role; without `--user` the service key is trusted
    pub async fn authorize(&self, permission: Permission) -> Result<()> {
        let Some(user) = &self.user else {
            return Ok(());
        };
        let role = AccessControl::new(self.store.clone())
            .authorize(user, permission)
            .await
            .map_err(|e| self.explain(e))?;
        tracing::debug!(%user, %role, %permission, "authorized");
        Ok(())
    }

    /// Map an engine failure to a user-facing error
    pub fn explain(&self, error: EngineError) -> anyhow::Error {
        explain(&self.config.store.url, self.user.as_deref(), error)
    }
}
