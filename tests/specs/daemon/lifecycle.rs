//! Daemon lifecycle specs
//!
//! Verify pitd startup, its log file, and the single-writer lock.

use crate::prelude::*;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command as StdCommand, Stdio};

/// A running pitd, killed on drop
struct Running(Child);

impl Drop for Running {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn spawn_ready(project: &Project) -> Running {
    let mut child = StdCommand::new(assert_cmd::cargo::cargo_bin("pitd"))
        .arg("--config")
        .arg(project.config_path())
        .env("HOME", project.path())
        .env("PIT_STATE_DIR", project.state_dir())
        .env_remove("PIT_CONFIG")
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let mut line = String::new();
    BufReader::new(stdout).read_line(&mut line).unwrap();
    assert_eq!(line.trim(), "READY");
    Running(child)
}

fn log(project: &Project) -> String {
    std::fs::read_to_string(project.state_dir().join("pitd.log")).unwrap_or_default()
}

#[test]
fn missing_config_fails_before_starting() {
    Project::empty()
        .pitd()
        .args(&["--config", "nowhere.toml"])
        .fails()
        .stderr_has("could not read config");
}

#[test]
fn unknown_argument_is_rejected() {
    Project::empty()
        .pitd()
        .args(&["--verbose"])
        .fails()
        .stderr_has("unexpected argument");
}

#[test]
fn startup_writes_marker_and_lock() {
    let project = Project::with_config(&minimal_config());
    let _daemon = spawn_ready(&project);

    assert!(log(&project).contains("--- pitd: starting (pid: "));
    let locks: Vec<_> = std::fs::read_dir(project.state_dir())
        .unwrap()
        .flatten()
        .filter(|e| e.path().extension().is_some_and(|x| x == "lock"))
        .collect();
    assert_eq!(locks.len(), 1);
}

#[test]
fn second_daemon_for_the_same_store_is_refused() {
    let project = Project::with_config(&minimal_config());
    let _first = spawn_ready(&project);

    project
        .pitd()
        .args(&["--config", "config.toml"])
        .fails();

    assert!(log(&project).contains("Failed to acquire lock"));
}
