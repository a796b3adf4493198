//! Help and completion specs
//!
//! None of these need a config file.

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let project = Project::empty();
    let mut outcome = project.pit_bare().args(&["--help"]).passes();
    for command in [
        "assign",
        "queue",
        "ticket",
        "book",
        "worker",
        "inventory",
        "checkout",
        "report",
        "score",
        "triage",
        "access",
        "completions",
    ] {
        outcome = outcome.stdout_has(command);
    }
}

#[test]
fn ticket_help_lists_transitions() {
    Project::empty()
        .pit_bare()
        .args(&["ticket", "--help"])
        .passes()
        .stdout_has("finish")
        .stdout_has("park")
        .stdout_has("parts")
        .stdout_has("resume")
        .stdout_has("cancel")
        .stdout_has("delete");
}

#[test]
fn worker_help_lists_registry_commands() {
    Project::empty()
        .pit_bare()
        .args(&["worker", "--help"])
        .passes()
        .stdout_has("activate")
        .stdout_has("deactivate")
        .stdout_has("remove");
}

#[test]
fn completions_need_no_config() {
    Project::empty()
        .pit_bare()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("pit");
}

#[test]
fn version_is_printed() {
    Project::empty()
        .pit_bare()
        .args(&["--version"])
        .passes()
        .stdout_has("pit ");
}
