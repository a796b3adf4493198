//! CLI error specs
//!
//! Config problems and unreachable services produce readable errors and a
//! non-zero exit.

use crate::prelude::*;

#[test]
fn missing_config_explains_where_to_put_it() {
    Project::empty()
        .pit()
        .args(&["queue"])
        .fails()
        .stderr_has("could not read config")
        .stderr_has("[store]");
}

#[test]
fn config_path_can_come_from_the_environment() {
    let project = Project::with_config("[store]\nurl = \"localhost\"\napi_key = \"k\"\n");
    project
        .pit_bare()
        .env("PIT_CONFIG", project.config_path())
        .args(&["queue"])
        .fails()
        .stderr_has("store.url");
}

#[test]
fn invalid_value_names_the_key() {
    Project::with_config(
        r#"
[store]
url = "http://127.0.0.1:9"
api_key = "k"

[shop]
utc_offset_minutes = 5000
"#,
    )
    .pit()
    .args(&["queue"])
    .fails()
    .stderr_has("shop.utc_offset_minutes");
}

#[test]
fn unknown_keys_are_rejected() {
    Project::with_config(
        "[store]\nurl = \"http://127.0.0.1:9\"\napi_key = \"k\"\ncolour = \"red\"\n",
    )
    .pit()
    .args(&["queue"])
    .fails()
    .stderr_has("colour");
}

#[test]
fn unset_secret_variable_is_named() {
    Project::with_config(
        "[store]\nurl = \"http://127.0.0.1:9\"\napi_key_env = \"PIT_SPEC_UNSET_KEY\"\n",
    )
    .pit()
    .env("PIT_SPEC_UNSET_KEY", "")
    .args(&["queue"])
    .fails()
    .stderr_has("PIT_SPEC_UNSET_KEY");
}

#[test]
fn unreachable_store_is_reported() {
    Project::with_config(&minimal_config())
        .pit()
        .args(&["queue"])
        .fails()
        .stderr_has("Could not reach the store")
        .stderr_has(DEAD_STORE);
}

#[test]
fn assign_against_unreachable_store_is_skipped() {
    Project::with_config(&minimal_config())
        .pit()
        .args(&["assign"])
        .fails()
        .stdout_has("Pass skipped");
}

#[test]
fn booking_without_payment_gateway_is_refused() {
    Project::with_config(&minimal_config())
        .pit()
        .args(&["book", "--name", "Budi", "--plate", "B 1234 XY"])
        .fails()
        .stderr_has("Payment gateway is not configured");
}

#[test]
fn invoice_must_be_an_image() {
    let project = Project::with_config(&minimal_config());
    project.file("invoice.pdf", "%PDF-1.4");
    project
        .pit()
        .args(&["inventory", "import", "invoice.pdf"])
        .fails()
        .stderr_has("unsupported image type");
}

#[test]
fn malformed_part_is_a_usage_error() {
    Project::with_config(&minimal_config())
        .pit()
        .args(&["checkout", "tkt-1", "--part", "brake-pad"])
        .fails()
        .stderr_has("ITEM_ID=QUANTITY");
}

#[test]
fn booking_time_needs_a_date() {
    Project::with_config(&minimal_config())
        .pit()
        .args(&["ticket", "add", "--name", "Budi", "--plate", "B 1", "--time", "09:00"])
        .fails()
        .stderr_has("--date");
}
