// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Pitstop services: the assignment loop and the operations built on the
//! store, inference and payment adapters

mod access;
mod assigner;
mod booking;
mod checkout;
mod desk;
mod error;
mod inventory;
mod reports;
mod runner;
mod scoring;
mod triage;

pub use access::AccessControl;
pub use assigner::{AssignmentLoop, PassReport};
pub use booking::{DiagnosisBooking, PollPolicy};
pub use checkout::{Checkout, PartLine, Receipt, ReceiptLine};
pub use desk::{NewTicket, QueueEntry, QueueView, TicketDesk};
pub use error::EngineError;
pub use inventory::{ImportSummary, InventoryImport};
pub use reports::FinanceReports;
pub use runner::{spawn_change_listener, spawn_interval, CoalescingRunner, Trigger};
pub use scoring::PerformanceReview;
pub use triage::{IssueAssessment, IssueTriage};
