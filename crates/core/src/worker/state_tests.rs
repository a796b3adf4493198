// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

fn ticket(id: &str, status: TicketStatus, worker: Option<&str>) -> Ticket {
    let mut t = Ticket::walk_in(id, "Customer", "B 1 A", Utc::now());
    t.status = status;
    t.worker_id = worker.map(WorkerId::from);
    t
}

#[test]
fn only_processing_tickets_make_a_worker_busy() {
    let tickets = vec![
        ticket("t1", TicketStatus::Processing, Some("w1")),
        ticket("t2", TicketStatus::Pending, Some("w2")),
        ticket("t3", TicketStatus::WaitingPart, Some("w3")),
        ticket("t4", TicketStatus::Done, Some("w4")),
        ticket("t5", TicketStatus::Processing, None),
    ];
    let busy = busy_workers(&tickets);
    assert_eq!(busy.len(), 1);
    assert!(busy.contains(&WorkerId::from("w1")));
}

#[test]
fn duplicate_references_collapse() {
    let tickets = vec![
        ticket("t1", TicketStatus::Processing, Some("w1")),
        ticket("t2", TicketStatus::Processing, Some("w1")),
    ];
    assert_eq!(busy_workers(&tickets).len(), 1);
}

#[test]
fn worker_row_defaults_to_active() {
    let w: Worker = serde_json::from_str(r#"{"id":"w1","name":"Andi"}"#).unwrap();
    assert!(w.active);
    assert!(!Worker::new("w2", "Rudi").inactive().active);
}
