// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for the daemon and CLI
//!
//! Loaded from TOML. Secrets can be given inline or through an `*_env`
//! key naming the environment variable that holds them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "PIT_CONFIG";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("missing secret `{key}` (set it inline or via `{key}_env`)")]
    MissingSecret { key: &'static str },
    #[error("environment variable {var} for `{key}` is not set")]
    MissingEnv { key: &'static str, var: String },
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Full configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub inference: Option<InferenceConfig>,
    #[serde(default)]
    pub payment: Option<PaymentConfig>,
    #[serde(default)]
    pub assignment: AssignmentConfig,
    #[serde(default)]
    pub shop: ShopConfig,
}

/// Hosted REST store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub url: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(with = "humantime_serde", default = "default_store_timeout")]
    pub timeout: Duration,
    /// How often the change feed checks tables for modifications
    #[serde(with = "humantime_serde", default = "default_change_poll")]
    pub change_poll: Duration,
}

/// Hosted LLM endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(with = "humantime_serde", default = "default_inference_timeout")]
    pub timeout: Duration,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(with = "humantime_serde", default = "default_retry_backoff")]
    pub retry_backoff: Duration,
}

/// Hosted payment gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentConfig {
    /// Base URL for creating payment sessions
    pub url: String,
    /// Base URL for status lookups, when the gateway splits its APIs
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub server_key: Option<String>,
    #[serde(default)]
    pub server_key_env: Option<String>,
    #[serde(with = "humantime_serde", default = "default_store_timeout")]
    pub timeout: Duration,
    /// Fee charged before a diagnosis ticket is opened
    #[serde(default = "default_diagnosis_fee")]
    pub diagnosis_fee: i64,
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub poll_interval: Duration,
    #[serde(with = "humantime_serde", default = "default_poll_timeout")]
    pub poll_timeout: Duration,
}

/// Assignment loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(with = "humantime_serde", default = "default_interval")]
    pub interval: Duration,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: default_interval(),
        }
    }
}

impl StoreConfig {
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingSecret {
            key: "store.api_key",
        })
    }
}

impl InferenceConfig {
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingSecret {
            key: "inference.api_key",
        })
    }
}

impl PaymentConfig {
    pub fn status_url(&self) -> &str {
        self.status_url.as_deref().unwrap_or(&self.url)
    }

    pub fn server_key(&self) -> Result<&str, ConfigError> {
        self.server_key.as_deref().ok_or(ConfigError::MissingSecret {
            key: "payment.server_key",
        })
    }
}

/// Shop locale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShopConfig {
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_store_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_change_poll() -> Duration {
    Duration::from_secs(3)
}

fn default_inference_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_inference_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff() -> Duration {
    Duration::from_secs(2)
}

fn default_diagnosis_fee() -> i64 {
    50_000
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(3)
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Parse, resolve secrets from the process environment and validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let mut config = Self::from_toml(&content)?;
        config.resolve_secrets(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without touching the environment
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Replace every `*_env` indirection with the variable's value
    pub fn resolve_secrets(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        resolve_secret(
            "store.api_key",
            &mut self.store.api_key,
            self.store.api_key_env.as_deref(),
            &lookup,
        )?;
        if let Some(inference) = &mut self.inference {
            resolve_secret(
                "inference.api_key",
                &mut inference.api_key,
                inference.api_key_env.as_deref(),
                &lookup,
            )?;
        }
        if let Some(payment) = &mut self.payment {
            resolve_secret(
                "payment.server_key",
                &mut payment.server_key,
                payment.server_key_env.as_deref(),
                &lookup,
            )?;
        }
        Ok(())
    }

    /// Check values that parse fine but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("store.url", &self.store.url)?;
        if let Some(inference) = &self.inference {
            check_url("inference.url", &inference.url)?;
            if inference.model.trim().is_empty() {
                return Err(invalid("inference.model", "must not be empty"));
            }
        }
        if let Some(payment) = &self.payment {
            check_url("payment.url", &payment.url)?;
            if let Some(status_url) = &payment.status_url {
                check_url("payment.status_url", status_url)?;
            }
            if payment.diagnosis_fee <= 0 {
                return Err(invalid("payment.diagnosis_fee", "must be positive"));
            }
            if payment.poll_interval.is_zero() {
                return Err(invalid("payment.poll_interval", "must be non-zero"));
            }
        }
        if self.assignment.interval.is_zero() {
            return Err(invalid("assignment.interval", "must be non-zero"));
        }
        if self.store.change_poll.is_zero() {
            return Err(invalid("store.change_poll", "must be non-zero"));
        }
        if self.shop.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(invalid("shop.utc_offset_minutes", "must be within +/-24h"));
        }
        Ok(())
    }
}

/// Fill `value` from the environment when only the `_env` name is given
///
/// An inline value wins over the indirection. Having neither is an error.
fn resolve_secret(
    key: &'static str,
    value: &mut Option<String>,
    env_name: Option<&str>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if value.as_deref().is_some_and(|v| !v.is_empty()) {
        return Ok(());
    }
    let var = env_name.ok_or(ConfigError::MissingSecret { key })?;
    match lookup(var) {
        Some(secret) if !secret.is_empty() => {
            *value = Some(secret);
            Ok(())
        }
        _ => Err(ConfigError::MissingEnv {
            key,
            var: var.to_string(),
        }),
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

fn check_url(key: &'static str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(invalid(key, "must start with http:// or https://"))
    }
}

/// Default config location: `$PIT_CONFIG`, else `<config_dir>/pitstop/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("pitstop").join("config.toml"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
