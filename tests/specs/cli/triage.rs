//! Triage specs
//!
//! Without an [inference] section the complaint is accepted as written.

use crate::prelude::*;

#[test]
fn triage_without_model_accepts_complaint() {
    Project::with_config(&minimal_config())
        .pit()
        .args(&["triage", "engine", "knocks", "at", "idle"])
        .passes()
        .stdout_has("Valid: yes")
        .stdout_has("Summary: engine knocks at idle")
        .stdout_lacks("Category");
}

#[test]
fn triage_json_output() {
    Project::with_config(&minimal_config())
        .pit()
        .args(&["--format", "json", "triage", "rear brake squeals"])
        .passes()
        .stdout_has("\"valid\": true")
        .stdout_has("\"summary\": \"rear brake squeals\"");
}

#[test]
fn blank_complaint_is_invalid() {
    Project::with_config(&minimal_config())
        .pit()
        .args(&["triage", "   "])
        .fails()
        .stderr_has("complaint");
}
