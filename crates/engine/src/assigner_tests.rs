// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use pit_adapters::{FakeStore, StoreCall};
use pit_core::{FakeClock, WorkerId};

fn opening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

fn arrived(id: &str, minutes: i64) -> Ticket {
    Ticket::walk_in(id, "Customer", "B 1234", opening() + Duration::minutes(minutes))
}

fn setup() -> (FakeStore, AssignmentLoop<FakeStore, FakeClock>) {
    let store = FakeStore::new();
    let clock = FakeClock::at(opening() + Duration::hours(1));
    let assigner = AssignmentLoop::new(store.clone(), clock, 0);
    (store, assigner)
}

fn status_of(store: &FakeStore, id: &str) -> TicketStatus {
    store.ticket(id).unwrap().status
}

#[tokio::test]
async fn two_free_workers_take_the_two_oldest_tickets() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep"));
    store.add_worker(Worker::new("wrk-b", "Bayu"));
    store.add_ticket(arrived("tkt-3", 30));
    store.add_ticket(arrived("tkt-1", 10));
    store.add_ticket(arrived("tkt-2", 20));

    let report = assigner.run_pass().await;

    assert_eq!(report.claimed.len(), 2);
    assert_eq!(status_of(&store, "tkt-1"), TicketStatus::Processing);
    assert_eq!(status_of(&store, "tkt-2"), TicketStatus::Processing);
    assert_eq!(status_of(&store, "tkt-3"), TicketStatus::Waiting);

    let first = store.ticket("tkt-1").unwrap().worker_id.unwrap();
    let second = store.ticket("tkt-2").unwrap().worker_id.unwrap();
    assert_ne!(first, second);
    assert_eq!(first, WorkerId::from("wrk-a"));
}

#[tokio::test]
async fn second_pass_is_a_no_op() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep"));
    store.add_ticket(arrived("tkt-1", 0));
    store.add_ticket(arrived("tkt-2", 5));

    let first = assigner.run_pass().await;
    store.clear_calls();
    let second = assigner.run_pass().await;

    assert_eq!(first.claimed.len(), 1);
    assert!(second.is_idle());
    assert_eq!(second.free_workers, 0);
    assert!(store.claims().is_empty());
}

#[tokio::test]
async fn busy_worker_is_never_a_target() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep"));
    let mut busy = arrived("tkt-0", 0);
    busy.status = TicketStatus::Processing;
    busy.worker_id = Some("wrk-a".into());
    store.add_ticket(busy);
    store.add_ticket(arrived("tkt-1", 10));

    let report = assigner.run_pass().await;

    assert!(report.is_idle());
    assert_eq!(status_of(&store, "tkt-1"), TicketStatus::Waiting);
    assert!(store.claims().is_empty());
}

#[tokio::test]
async fn no_active_workers_leaves_queue_untouched() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep").inactive());
    store.add_ticket(arrived("tkt-1", 0));

    let report = assigner.run_pass().await;

    assert!(report.is_idle());
    assert!(!report.skipped);
    assert_eq!(status_of(&store, "tkt-1"), TicketStatus::Waiting);
}

#[tokio::test]
async fn future_booking_is_skipped_for_a_later_ticket() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep"));
    let tomorrow = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    store.add_ticket(arrived("tkt-1", 0).booked_for(tomorrow, None));
    store.add_ticket(arrived("tkt-2", 10));

    let report = assigner.run_pass().await;

    assert_eq!(report.claimed.len(), 1);
    assert_eq!(report.eligible, 1);
    assert_eq!(status_of(&store, "tkt-1"), TicketStatus::Waiting);
    assert_eq!(status_of(&store, "tkt-2"), TicketStatus::Processing);
}

#[tokio::test]
async fn booking_for_today_is_eligible() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep"));
    let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    store.add_ticket(arrived("tkt-1", 0).booked_for(today, None));

    let report = assigner.run_pass().await;

    assert_eq!(report.claimed.len(), 1);
}

#[tokio::test]
async fn snapshot_failure_skips_the_pass() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep"));
    store.add_ticket(arrived("tkt-1", 0));
    store.fail_reads(true);

    let report = assigner.run_pass().await;

    assert!(report.skipped);
    assert!(store.claims().is_empty());
}

#[tokio::test]
async fn failed_claim_only_affects_its_own_pair() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep"));
    store.add_worker(Worker::new("wrk-b", "Bayu"));
    store.add_ticket(arrived("tkt-1", 0));
    store.add_ticket(arrived("tkt-2", 10));
    store.fail_claim("tkt-1");

    let report = assigner.run_pass().await;

    assert_eq!(report.failed, vec![TicketId::from("tkt-1")]);
    assert_eq!(report.claimed.len(), 1);
    assert_eq!(report.claimed[0].ticket_id, TicketId::from("tkt-2"));
    assert_eq!(status_of(&store, "tkt-1"), TicketStatus::Waiting);
}

#[tokio::test]
async fn lost_claim_is_reported_not_failed() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-a", "Asep"));
    store.add_ticket(arrived("tkt-1", 0));
    store.steal_claim("tkt-1");

    let report = assigner.run_pass().await;

    assert_eq!(report.lost, vec![TicketId::from("tkt-1")]);
    assert!(report.claimed.is_empty());
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn parked_tickets_are_left_alone() {
    let (store, assigner) = setup();
    store.add_worker(Worker::new("wrk-b", "Bayu"));
    let mut parked = arrived("tkt-1", 0);
    parked.status = TicketStatus::Pending;
    parked.worker_id = Some("wrk-a".into());
    store.add_ticket(parked);

    let report = assigner.run_pass().await;

    assert_eq!(report.eligible, 0);
    assert_eq!(status_of(&store, "tkt-1"), TicketStatus::Pending);
}

#[tokio::test]
async fn pass_reads_only_active_workers_and_two_statuses() {
    let (store, assigner) = setup();
    assigner.run_pass().await;

    let calls = store.calls();
    assert!(calls.contains(&StoreCall::ListWorkers { active_only: true }));
    assert!(calls.contains(&StoreCall::ListTickets(TicketQuery::status(
        TicketStatus::Processing
    ))));
    assert!(calls.contains(&StoreCall::ListTickets(TicketQuery::status(
        TicketStatus::Waiting
    ))));
}
