// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

const MINIMAL: &str = r#"
[store]
url = "https://abc.supabase.co"
api_key = "anon"
"#;

const FULL: &str = r#"
[store]
url = "https://abc.supabase.co"
api_key_env = "PIT_STORE_KEY"
timeout = "5s"
change_poll = "1s"

[inference]
model = "gemini-1.5-pro"
api_key_env = "PIT_AI_KEY"
max_retries = 5
retry_backoff = "500ms"

[payment]
url = "https://app.sandbox.midtrans.com"
server_key = "SB-Mid-server-x"
diagnosis_fee = 25000
poll_timeout = "2m"

[assignment]
interval = "10s"

[shop]
utc_offset_minutes = 420
"#;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |var| map.get(var).cloned()
}

#[test]
fn minimal_config_uses_defaults() {
    let mut config = Config::from_toml(MINIMAL).unwrap();
    config.resolve_secrets(env(&[])).unwrap();
    config.validate().unwrap();

    assert_eq!(config.store.api_key().unwrap(), "anon");
    assert_eq!(config.store.timeout, Duration::from_secs(10));
    assert_eq!(config.store.change_poll, Duration::from_secs(3));
    assert!(config.inference.is_none());
    assert!(config.payment.is_none());
    assert!(config.assignment.enabled);
    assert_eq!(config.assignment.interval, Duration::from_secs(5));
    assert_eq!(config.shop.utc_offset_minutes, 0);
}

#[test]
fn full_config_parses_durations_and_env_secrets() {
    let mut config = Config::from_toml(FULL).unwrap();
    config
        .resolve_secrets(env(&[("PIT_STORE_KEY", "service"), ("PIT_AI_KEY", "ai")]))
        .unwrap();
    config.validate().unwrap();

    assert_eq!(config.store.api_key().unwrap(), "service");
    assert_eq!(config.store.timeout, Duration::from_secs(5));

    let inference = config.inference.as_ref().unwrap();
    assert_eq!(inference.api_key().unwrap(), "ai");
    assert_eq!(inference.model, "gemini-1.5-pro");
    assert_eq!(inference.url, "https://generativelanguage.googleapis.com/v1beta");
    assert_eq!(inference.max_retries, 5);
    assert_eq!(inference.retry_backoff, Duration::from_millis(500));

    let payment = config.payment.as_ref().unwrap();
    assert_eq!(payment.server_key().unwrap(), "SB-Mid-server-x");
    assert_eq!(payment.diagnosis_fee, 25_000);
    assert_eq!(payment.poll_interval, Duration::from_secs(3));
    assert_eq!(payment.poll_timeout, Duration::from_secs(120));

    assert_eq!(config.assignment.interval, Duration::from_secs(10));
    assert_eq!(config.shop.utc_offset_minutes, 420);
}

#[test]
fn missing_env_variable_is_reported() {
    let mut config = Config::from_toml(FULL).unwrap();
    let err = config
        .resolve_secrets(env(&[("PIT_STORE_KEY", "service")]))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingEnv { key: "inference.api_key", ref var } if var == "PIT_AI_KEY"
    ));
}

#[test]
fn missing_secret_without_indirection() {
    let mut config = Config::from_toml("[store]\nurl = \"https://x\"\n").unwrap();
    let err = config.resolve_secrets(env(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingSecret { key: "store.api_key" }));
}

#[test]
fn inline_secret_wins_over_env() {
    let toml = "[store]\nurl = \"https://x\"\napi_key = \"inline\"\napi_key_env = \"K\"\n";
    let mut config = Config::from_toml(toml).unwrap();
    config.resolve_secrets(env(&[("K", "from-env")])).unwrap();
    assert_eq!(config.store.api_key().unwrap(), "inline");
}

#[test]
fn unknown_keys_are_rejected() {
    let toml = format!("{}\n[assignment]\nintervall = \"5s\"\n", MINIMAL);
    assert!(matches!(Config::from_toml(&toml), Err(ConfigError::Parse(_))));
}

#[test]
fn validation_names_offending_key() {
    let bad_url = "[store]\nurl = \"abc.supabase.co\"\napi_key = \"k\"\n";
    let err = Config::from_toml(bad_url).unwrap().validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "store.url", .. }));

    let zero = format!("{}\n[assignment]\ninterval = \"0s\"\n", MINIMAL);
    let err = Config::from_toml(&zero).unwrap().validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "assignment.interval", .. }));

    let offset = format!("{}\n[shop]\nutc_offset_minutes = 1500\n", MINIMAL);
    let err = Config::from_toml(&offset).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("shop.utc_offset_minutes"));
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, MINIMAL).unwrap();
    let config = Config::load(&path).unwrap();
    assert_eq!(config.store.url, "https://abc.supabase.co");

    let missing = Config::load(&dir.path().join("nope.toml"));
    assert!(matches!(missing, Err(ConfigError::Read(..))));
}
