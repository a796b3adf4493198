// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use pit_adapters::StoreError;
use pit_core::ConfigError;
use pit_engine::EngineError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct PitError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl PitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for PitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for PitError {}

/// Common error builders for typical failure scenarios.
impl PitError {
    /// The config file could not be loaded
    pub fn config(path: &Path, error: &ConfigError) -> Self {
        let err = PitError::new(error.to_string())
            .with_context(format!("Config file: {}", path.display()));
        match error {
            ConfigError::Read(..) => err
                .with_suggestion("Create the file with at least a [store] section")
                .with_suggestion("Point at another file with --config or PIT_CONFIG"),
            ConfigError::MissingEnv { var, .. } => {
                err.with_suggestion(format!("Export {} before running pit", var))
            }
            _ => err,
        }
    }

    /// The store could not be reached at all
    pub fn store_unreachable(url: &str, error: &StoreError) -> Self {
        PitError::new("Could not reach the store")
            .with_context(format!("Store: {}", url))
            .with_context(error.to_string())
            .with_suggestion("Check [store] url and your network connection")
    }

    pub fn payment_not_configured() -> Self {
        PitError::new("Payment gateway is not configured")
            .with_context("Diagnosis bookings need the fee paid before a ticket is opened")
            .with_suggestion("Add a [payment] section with url and server_key_env")
    }

    pub fn access_denied(user: &str, error: &EngineError) -> Self {
        PitError::new(error.to_string())
            .with_context(format!("Acting as user {}", user))
            .with_suggestion("Ask an owner to update the role on your profile")
    }
}

/// Turn an engine failure into a friendlier error where one exists
pub fn explain(url: &str, user: Option<&str>, error: EngineError) -> anyhow::Error {
    match &error {
        EngineError::Store(e @ StoreError::Transport(_)) => {
            PitError::store_unreachable(url, e).into()
        }
        EngineError::AccessDenied(_) => {
            PitError::access_denied(user.unwrap_or("-"), &error).into()
        }
        _ => error.into(),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
