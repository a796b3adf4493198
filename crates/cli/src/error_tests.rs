// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pit_core::Permission;

#[test]
fn display_lists_context_and_numbered_suggestions() {
    let err = PitError::new("Something went wrong")
        .with_context("First context")
        .with_suggestion("Try this")
        .with_suggestion("Or this");

    let output = err.to_string();
    assert!(output.contains("error: Something went wrong"));
    assert!(output.contains("-> First context"));
    assert!(output.contains("1. Try this"));
    assert!(output.contains("2. Or this"));
}

#[test]
fn unreadable_config_suggests_where_to_put_it() {
    let error = ConfigError::Read(
        "/nowhere/config.toml".into(),
        std::io::Error::from(std::io::ErrorKind::NotFound),
    );
    let output = PitError::config(Path::new("/nowhere/config.toml"), &error).to_string();

    assert!(output.contains("/nowhere/config.toml"));
    assert!(output.contains("[store]"));
    assert!(output.contains("PIT_CONFIG"));
}

#[test]
fn transport_failures_become_unreachable_store() {
    let error = EngineError::Store(StoreError::Transport("connection refused".into()));
    let err = explain("http://127.0.0.1:9", None, error);

    let pit = err.downcast_ref::<PitError>().unwrap();
    assert_eq!(pit.message, "Could not reach the store");
    assert!(pit.context.iter().any(|c| c.contains("connection refused")));
}

#[test]
fn denied_access_names_the_user() {
    let error = EngineError::AccessDenied(Permission::ViewFinance);
    let err = explain("http://store", Some("user-7"), error);

    let output = err.downcast_ref::<PitError>().unwrap().to_string();
    assert!(output.contains("access denied: cannot view finance"));
    assert!(output.contains("user-7"));
}

#[test]
fn other_engine_errors_pass_through() {
    let err = explain("http://store", None, EngineError::TicketNotFound("tkt-9".into()));

    assert!(err.downcast_ref::<PitError>().is_none());
    assert_eq!(err.to_string(), "ticket not found: tkt-9");
}
