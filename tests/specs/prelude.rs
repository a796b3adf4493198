//! Shared helpers for black-box specs
//!
//! Every spec runs in its own temp directory with a scrubbed environment so
//! a developer's real config and state are never touched.

pub use predicates::prelude::*;

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Store URL nothing listens on
pub const DEAD_STORE: &str = "http://127.0.0.1:9";

/// Config with only an unreachable store
pub fn minimal_config() -> String {
    format!(
        r#"
[store]
url = "{DEAD_STORE}"
api_key = "anon"
timeout = "2s"
"#
    )
}

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Project with `config.toml` holding `content`
    pub fn with_config(content: &str) -> Self {
        let project = Self::empty();
        project.file("config.toml", content);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path().join("state")
    }

    pub fn file(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn command(&self, bin: &str) -> Command {
        let mut cmd = Command::cargo_bin(bin).unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env("PIT_STATE_DIR", self.state_dir())
            .env_remove("PIT_CONFIG")
            .env_remove("PIT_USER")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `pit --config <project>/config.toml`
    pub fn pit(&self) -> Cli {
        let mut cmd = self.command("pit");
        cmd.arg("--config").arg(self.config_path());
        Cli(cmd)
    }

    /// `pit` with no config flag
    pub fn pit_bare(&self) -> Cli {
        Cli(self.command("pit"))
    }

    pub fn pitd(&self) -> Cli {
        Cli(self.command("pitd"))
    }
}

pub struct Cli(Command);

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.0.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.0.env(key, value);
        self
    }

    pub fn passes(mut self) -> Outcome {
        Outcome(self.0.assert().success())
    }

    pub fn fails(mut self) -> Outcome {
        Outcome(self.0.assert().failure())
    }
}

pub struct Outcome(Assert);

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(needle)))
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(needle).not()))
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        Self(self.0.stderr(predicate::str::contains(needle)))
    }
}
