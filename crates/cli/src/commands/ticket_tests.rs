// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;

#[derive(Parser)]
struct Harness {
    #[command(subcommand)]
    command: TicketCommand,
}

fn parse(args: &[&str]) -> Result<TicketCommand, clap::Error> {
    Harness::try_parse_from(std::iter::once("ticket").chain(args.iter().copied()))
        .map(|h| h.command)
}

#[yare::parameterized(
    short = { "09:30", 9, 30 },
    seconds = { "14:05:00", 14, 5 },
)]
fn parses_booking_times(input: &str, hour: u32, minute: u32) {
    assert_eq!(
        parse_time(input).unwrap(),
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    );
}

#[test]
fn rejects_malformed_time() {
    assert!(parse_time("half past nine").is_err());
}

#[test]
fn walk_in_intake_has_no_booking() {
    let TicketCommand::Add(intake) = parse(&[
        "add",
        "--name",
        "Budi",
        "--plate",
        "b 1234 xy",
        "--complaint",
        "rear brake squeals",
    ])
    .unwrap() else {
        panic!("expected add");
    };

    let new = intake.to_new_ticket();
    assert_eq!(new.customer_name, "Budi");
    assert_eq!(new.plate_number, "b 1234 xy");
    assert_eq!(new.complaint, "rear brake squeals");
    assert_eq!(new.booking_date, None);
    assert!(!intake.triage);
}

#[test]
fn booking_intake_carries_date_and_time() {
    let TicketCommand::Add(intake) = parse(&[
        "add",
        "--name",
        "Sari",
        "--plate",
        "D 55 AB",
        "--date",
        "2026-11-02",
        "--time",
        "10:00",
    ])
    .unwrap() else {
        panic!("expected add");
    };

    let new = intake.to_new_ticket();
    assert_eq!(new.booking_date, NaiveDate::from_ymd_opt(2026, 11, 2));
    assert_eq!(new.booking_time, NaiveTime::from_hms_opt(10, 0, 0));
}

#[test]
fn time_without_date_is_rejected() {
    assert!(parse(&["add", "--name", "Sari", "--plate", "D 55", "--time", "10:00"]).is_err());
}

#[yare::parameterized(
    finish = { "finish", TicketAction::Finish },
    park = { "park", TicketAction::Park },
    parts = { "parts", TicketAction::AwaitParts },
    resume = { "resume", TicketAction::Resume },
    cancel = { "cancel", TicketAction::Cancel },
)]
fn transition_commands_map_to_actions(name: &str, expected: TicketAction) {
    let command = parse(&[name, "tkt-1"]).unwrap();
    assert_eq!(action_for(&command), Some((expected, "tkt-1")));
}

#[test]
fn delete_is_not_a_transition() {
    let command = parse(&["delete", "tkt-1"]).unwrap();
    assert_eq!(action_for(&command), None);
}
