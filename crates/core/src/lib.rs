// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pit-core: Core library for Pitstop, the workshop queue service
//!
//! This crate provides:
//! - Ticket and mechanic records with the operator status lifecycle
//! - Pure assignment planning (free mechanics to oldest eligible tickets)
//! - Typo-tolerant keyword search
//! - Inventory import planning, revenue reports and performance logs
//! - Role resolution, model-reply extraction and configuration

pub mod clock;
pub mod config;
pub mod id;

pub mod assignment;
pub mod extract;
pub mod finance;
pub mod fuzzy;
pub mod inventory;
pub mod performance;
pub mod roles;
pub mod ticket;
pub mod worker;

// Re-exports
pub use assignment::{plan_assignments, Assignment, AssignmentPlan};
pub use clock::{local_date, local_midnight, Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError};
pub use extract::{extract_as, extract_json, ExtractError};
pub use finance::{DailyRevenue, RevenueReport};
pub use id::{IdGen, IdKind, SequentialIdGen, UuidIdGen};
pub use inventory::{ImportPlan, InventoryItem, ItemId, ItemMatch, Restock, ScannedLine};
pub use performance::{JobRecord, PerformanceScore, WorkerLog};
pub use roles::{resolve_access, Access, Permission, Role};
pub use ticket::{Ticket, TicketAction, TicketId, TicketStatus, TransitionError};
pub use worker::{Worker, WorkerId};
