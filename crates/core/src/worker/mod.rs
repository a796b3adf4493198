// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workshop mechanics

mod state;

pub use state::{busy_workers, Worker, WorkerId};
