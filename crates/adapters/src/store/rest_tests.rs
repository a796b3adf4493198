// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn param<'a>(params: &'a Query, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

#[test]
fn all_tickets_oldest_first() {
    let params = ticket_params(&TicketQuery::all());
    assert_eq!(param(&params, "status"), None);
    assert_eq!(param(&params, "order"), Some("created_at.asc,id.asc"));
    assert_eq!(param(&params, "limit"), None);
}

#[test]
fn status_filter_uses_in_list() {
    let params = ticket_params(&TicketQuery::statuses([
        TicketStatus::Waiting,
        TicketStatus::Processing,
    ]));
    assert_eq!(param(&params, "status"), Some("in.(waiting,processing)"));
}

#[test]
fn newest_first_with_limit() {
    let params = ticket_params(&TicketQuery::status(TicketStatus::Paid).newest_first().limit(20));
    assert_eq!(param(&params, "order"), Some("created_at.desc,id.desc"));
    assert_eq!(param(&params, "limit"), Some("20"));
}

#[test]
fn endpoint_strips_trailing_slash() {
    let store = RestStore::new(
        "https://db.example.test/",
        "key",
        Duration::from_secs(1),
        Duration::from_secs(1),
    );
    assert_eq!(
        store.endpoint(Table::Workers),
        "https://db.example.test/rest/v1/mechanics"
    );
}

#[test]
fn error_status_is_rejected() {
    let reply = Reply {
        status: 409,
        body: "duplicate key".to_string(),
    };
    let err = checked(reply).unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 409, .. }));
}

#[test]
fn empty_representation_counts_zero_rows() {
    let reply = Reply {
        status: 200,
        body: "[]".to_string(),
    };
    assert_eq!(returned_rows(&reply).unwrap(), 0);

    let reply = Reply {
        status: 200,
        body: r#"[{"id":"tkt-1"}]"#.to_string(),
    };
    assert_eq!(returned_rows(&reply).unwrap(), 1);
}

#[tokio::test]
async fn unreachable_store_reports_transport_error() {
    let store = RestStore::new(
        "http://127.0.0.1:1",
        "key",
        Duration::from_millis(500),
        Duration::from_secs(1),
    );
    let err = store.list_workers(true).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)), "got {err:?}");
}
