// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ticket::TicketStatus;
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
}

fn waiting(id: &str, minute: i64) -> Ticket {
    Ticket::walk_in(id, "Customer", "B 1 A", base() + Duration::minutes(minute))
}

fn processing(id: &str, worker: &str) -> Ticket {
    let mut t = waiting(id, 0);
    t.status = TicketStatus::Processing;
    t.worker_id = Some(WorkerId::from(worker));
    t
}

fn pair(ticket: &str, worker: &str) -> Assignment {
    Assignment {
        ticket_id: TicketId::from(ticket),
        worker_id: WorkerId::from(worker),
    }
}

#[test]
fn two_free_workers_three_tickets() {
    let workers = vec![Worker::new("w1", "Andi"), Worker::new("w2", "Rudi")];
    let queue = vec![waiting("t1", 1), waiting("t2", 2), waiting("t3", 3)];

    let plan = plan_assignments(&workers, &[], &queue, today());

    assert_eq!(plan.pairs, vec![pair("t1", "w1"), pair("t2", "w2")]);
    assert_eq!(plan.free_workers, 2);
    assert_eq!(plan.eligible, 3);
}

#[test]
fn no_free_workers_is_a_no_op() {
    let workers = vec![Worker::new("w1", "Andi")];
    let busy = vec![processing("t0", "w1")];
    let queue = vec![waiting("t1", 1)];

    let plan = plan_assignments(&workers, &busy, &queue, today());

    assert!(plan.is_empty());
    assert_eq!(plan.free_workers, 0);
}

#[test]
fn oldest_ticket_wins_regardless_of_input_order() {
    let workers = vec![Worker::new("w1", "Andi")];
    let queue = vec![waiting("late", 30), waiting("early", 5)];

    let plan = plan_assignments(&workers, &[], &queue, today());

    assert_eq!(plan.pairs, vec![pair("early", "w1")]);
}

#[test]
fn future_booking_is_never_selected() {
    let workers = vec![Worker::new("w1", "Andi"), Worker::new("w2", "Rudi")];
    let tomorrow = today().succ_opt().unwrap();
    let queue = vec![
        waiting("booked", -600).booked_for(tomorrow, None),
        waiting("walk-in", 10),
    ];

    let plan = plan_assignments(&workers, &[], &queue, today());

    assert_eq!(plan.pairs, vec![pair("walk-in", "w1")]);
    assert_eq!(plan.eligible, 1);
}

#[test]
fn todays_and_overdue_bookings_are_eligible() {
    let workers = vec![Worker::new("w1", "Andi"), Worker::new("w2", "Rudi")];
    let yesterday = today().pred_opt().unwrap();
    let queue = vec![
        waiting("today", 2).booked_for(today(), None),
        waiting("overdue", 1).booked_for(yesterday, None),
    ];

    let plan = plan_assignments(&workers, &[], &queue, today());

    assert_eq!(plan.pairs, vec![pair("overdue", "w1"), pair("today", "w2")]);
}

#[test]
fn inactive_and_busy_workers_are_skipped() {
    let workers = vec![
        Worker::new("w1", "Andi").inactive(),
        Worker::new("w2", "Rudi"),
        Worker::new("w3", "Joko"),
    ];
    let busy = vec![processing("t0", "w2")];
    let queue = vec![waiting("t1", 1), waiting("t2", 2)];

    let plan = plan_assignments(&workers, &busy, &queue, today());

    assert_eq!(plan.pairs, vec![pair("t1", "w3")]);
}

#[test]
fn non_waiting_tickets_in_candidate_list_are_ignored() {
    let workers = vec![Worker::new("w1", "Andi")];
    let mut parked = waiting("parked", 0);
    parked.status = TicketStatus::Pending;
    let queue = vec![parked, waiting("t1", 5)];

    let plan = plan_assignments(&workers, &[], &queue, today());

    assert_eq!(plan.pairs, vec![pair("t1", "w1")]);
}

#[test]
fn duplicate_rows_do_not_double_assign() {
    let workers = vec![
        Worker::new("w1", "Andi"),
        Worker::new("w1", "Andi"),
        Worker::new("w2", "Rudi"),
    ];
    let queue = vec![waiting("t1", 1), waiting("t1", 1)];

    let plan = plan_assignments(&workers, &[], &queue, today());

    assert_eq!(plan.pairs, vec![pair("t1", "w1")]);
}

// =============================================================================
// Property tests
// =============================================================================

fn arb_world() -> impl Strategy<Value = (Vec<Worker>, Vec<Ticket>, Vec<Ticket>)> {
    let workers = proptest::collection::vec((any::<bool>(), any::<bool>()), 0..8);
    let tickets = proptest::collection::vec((0i64..500, -3i64..4, any::<bool>()), 0..12);
    (workers, tickets).prop_map(|(workers, tickets)| {
        let mut registry = Vec::new();
        let mut busy = Vec::new();
        for (i, (active, is_busy)) in workers.into_iter().enumerate() {
            let id = format!("w{}", i);
            let mut w = Worker::new(id.as_str(), "M");
            w.active = active;
            if is_busy {
                busy.push(processing(&format!("p{}", i), &id));
            }
            registry.push(w);
        }
        let queue = tickets
            .into_iter()
            .enumerate()
            .map(|(i, (minute, booking_offset, booked))| {
                let t = waiting(&format!("t{}", i), minute);
                if booked {
                    t.booked_for(today() + Duration::days(booking_offset), None)
                } else {
                    t
                }
            })
            .collect();
        (registry, busy, queue)
    })
}

proptest! {
    #[test]
    fn plan_pairs_min_of_free_and_eligible((workers, busy, queue) in arb_world()) {
        let plan = plan_assignments(&workers, &busy, &queue, today());
        prop_assert_eq!(plan.pairs.len(), plan.free_workers.min(plan.eligible));

        let tickets: HashSet<_> = plan.pairs.iter().map(|p| p.ticket_id.clone()).collect();
        let mechanics: HashSet<_> = plan.pairs.iter().map(|p| p.worker_id.clone()).collect();
        prop_assert_eq!(tickets.len(), plan.pairs.len());
        prop_assert_eq!(mechanics.len(), plan.pairs.len());
    }

    #[test]
    fn plan_never_uses_busy_inactive_or_future((workers, busy, queue) in arb_world()) {
        let plan = plan_assignments(&workers, &busy, &queue, today());
        let busy_ids = busy_workers(&busy);
        for p in &plan.pairs {
            prop_assert!(!busy_ids.contains(&p.worker_id));
            let worker = workers.iter().find(|w| w.id == p.worker_id).unwrap();
            prop_assert!(worker.active);
            let ticket = queue.iter().find(|t| t.id == p.ticket_id).unwrap();
            prop_assert!(!ticket.is_future_booking(today()));
        }
    }

    #[test]
    fn plan_takes_oldest_eligible_first((workers, busy, queue) in arb_world()) {
        let plan = plan_assignments(&workers, &busy, &queue, today());
        let chosen: HashSet<_> = plan.pairs.iter().map(|p| p.ticket_id.clone()).collect();
        let newest_chosen = queue
            .iter()
            .filter(|t| chosen.contains(&t.id))
            .map(|t| (t.created_at, t.id.clone()))
            .max();
        if let Some(newest) = newest_chosen {
            for t in queue.iter().filter(|t| t.is_eligible(today()) && !chosen.contains(&t.id)) {
                prop_assert!((t.created_at, t.id.clone()) > newest);
            }
        }
    }

    #[test]
    fn replanning_after_applying_is_a_no_op((workers, busy, queue) in arb_world()) {
        let plan = plan_assignments(&workers, &busy, &queue, today());

        let mut processing_now = busy.clone();
        let mut waiting_now = Vec::new();
        for t in queue {
            match plan.pairs.iter().find(|p| p.ticket_id == t.id) {
                Some(p) => {
                    let mut claimed = t.clone();
                    claimed.status = TicketStatus::Processing;
                    claimed.worker_id = Some(p.worker_id.clone());
                    processing_now.push(claimed);
                }
                None => waiting_now.push(t),
            }
        }

        let again = plan_assignments(&workers, &processing_now, &waiting_now, today());
        prop_assert!(again.is_empty());
    }
}
