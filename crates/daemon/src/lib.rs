// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pit-daemon: the long-running assignment writer
//!
//! Holds the per-store lock and keeps the assignment loop fed from a timer
//! and the store's change feeds.

pub mod lifecycle;

pub use lifecycle::{
    start, startup, Daemon, DaemonPaths, DaemonStore, LifecycleError, Lock, STATE_DIR_ENV,
};
