// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use pit_adapters::{FakeInference, FakeStore, InferenceError};
use pit_core::{FakeClock, ItemId, SequentialIdGen};

type Import = InventoryImport<FakeStore, FakeInference, FakeClock, SequentialIdGen>;

fn setup() -> (FakeStore, FakeInference, Import) {
    let store = FakeStore::new();
    store.add_item(item("itm-oil", "Engine Oil 1L", 4));
    store.add_item(item("itm-pad", "Brake Pad Front", 2));
    let inference = FakeInference::new();
    let clock = FakeClock::at(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    let import =
        InventoryImport::new(store.clone(), inference.clone(), clock, SequentialIdGen::new());
    (store, inference, import)
}

fn item(id: &str, name: &str, stock: i64) -> InventoryItem {
    InventoryItem {
        id: id.into(),
        name: name.to_string(),
        sku: None,
        stock,
        price: 10_000,
        updated_at: None,
    }
}

fn line(name: &str, quantity: i64) -> ScannedLine {
    ScannedLine {
        name: name.to_string(),
        quantity,
        unit_price: Some(8_000),
    }
}

fn stock_of(store: &FakeStore, id: &str) -> i64 {
    store
        .items()
        .into_iter()
        .find(|i| i.id.0 == id)
        .map(|i| i.stock)
        .unwrap()
}

#[tokio::test]
async fn scan_reads_fenced_json() {
    let (_, inference, import) = setup();
    inference.reply(concat!(
        "Here you go:\n```json\n",
        r#"{"items":[{"name":" Oli Mesin ","quantity":3,"unit_price":45000},{"name":""}]}"#,
        "\n```",
    ));

    let lines = import
        .scan_invoice(ImageData::new("image/jpeg", vec![0xff, 0xd8]))
        .await
        .unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "Oli Mesin");
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(lines[0].unit_price, Some(45_000));
    let prompt = &inference.calls()[0];
    assert!(prompt.json);
    assert!(prompt.image.is_some());
}

#[tokio::test]
async fn scan_accepts_a_bare_array() {
    let (_, inference, import) = setup();
    inference.reply(r#"[{"name":"Spark plug"}]"#);

    let lines = import
        .scan_invoice(ImageData::new("image/png", vec![1]))
        .await
        .unwrap();

    assert_eq!(lines, vec![ScannedLine {
        name: "Spark plug".to_string(),
        quantity: 1,
        unit_price: None,
    }]);
}

#[tokio::test]
async fn scan_failure_is_returned() {
    let (_, inference, import) = setup();
    inference.fail(InferenceError::Exhausted {
        attempts: 4,
        last: "503".into(),
    });

    let err = import
        .scan_invoice(ImageData::new("image/png", vec![1]))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Inference(InferenceError::Exhausted { .. })));
}

#[tokio::test]
async fn import_restocks_matches_and_creates_the_rest() {
    let (store, inference, import) = setup();
    inference.reply(r#"{"matches":[{"scanned_index":0,"item_id":"itm-oil"}]}"#);

    let summary = import
        .import(&[line("oli mesin 1 liter", 6), line("Chain kit", 1)])
        .await
        .unwrap();

    assert_eq!(summary.restocked.len(), 1);
    assert_eq!(stock_of(&store, "itm-oil"), 10);
    assert_eq!(summary.created.len(), 1);
    assert_eq!(summary.created[0].name, "Chain kit");
    assert_eq!(summary.created[0].price, 8_000);
    assert_eq!(store.items().len(), 3);
}

#[tokio::test]
async fn overflowing_restock_is_rejected_before_any_write() {
    let (store, inference, import) = setup();
    inference.reply(concat!(
        r#"{"matches":[{"scanned_index":0,"item_id":"itm-pad"},"#,
        r#"{"scanned_index":1,"item_id":"itm-oil"}]}"#,
    ));

    let err = import
        .import(&[line("Brake pad", 1), line("Engine oil", i64::MAX)])
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput { field: "quantity", .. }));
    assert_eq!(stock_of(&store, "itm-pad"), 2);
    assert_eq!(stock_of(&store, "itm-oil"), 4);
    assert_eq!(store.items().len(), 2);
}

#[tokio::test]
async fn malformed_match_reply_imports_everything_as_new() {
    let (store, inference, import) = setup();
    inference.reply("I think the first one is oil?");

    let summary = import
        .import(&[line("Engine Oil 1L", 2), line("Brake pad", 1)])
        .await
        .unwrap();

    assert!(summary.restocked.is_empty());
    assert_eq!(summary.created.len(), 2);
    assert_eq!(stock_of(&store, "itm-oil"), 4);
    assert_eq!(store.items().len(), 4);
}

#[tokio::test]
async fn match_failure_yields_no_matches() {
    let (_, inference, import) = setup();
    inference.fail(InferenceError::Disabled);
    let existing = vec![item("itm-oil", "Engine Oil 1L", 4)];

    let matches = import.match_lines(&[line("oil", 1)], &existing).await;

    assert!(matches.is_empty());
}

#[tokio::test]
async fn match_skips_the_endpoint_for_an_empty_inventory() {
    let (_, inference, import) = setup();

    let matches = import.match_lines(&[line("oil", 1)], &[]).await;

    assert!(matches.is_empty());
    assert!(inference.calls().is_empty());
}

#[tokio::test]
async fn match_prompt_lists_indexes_and_ids() {
    let (_, inference, import) = setup();
    inference.reply(r#"[{"scanned_index":0,"item_id":"itm-pad"}]"#);
    let existing = vec![item("itm-pad", "Brake Pad Front", 2)];

    let matches = import.match_lines(&[line("kampas rem depan", 1)], &existing).await;

    assert_eq!(matches, vec![ItemMatch {
        scanned_index: 0,
        item_id: ItemId::from("itm-pad"),
    }]);
    let prompt = inference.calls()[0].text.clone().unwrap();
    assert!(prompt.contains("\"item_id\":\"itm-pad\""));
    assert!(prompt.contains("kampas rem depan"));
}

#[tokio::test]
async fn search_tolerates_typos() {
    let (_, _, import) = setup();

    let found = import.search("brake pdd").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id.0, "itm-pad");
}

#[tokio::test]
async fn empty_search_lists_everything() {
    let (_, _, import) = setup();
    assert_eq!(import.search("").await.unwrap().len(), 2);
}
