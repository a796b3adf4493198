// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: paths, the single-writer lock, startup and
//! shutdown of the assignment runner.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use pit_adapters::{RestStore, StoreAdapter, Table, TracedStore};
use pit_core::{Clock, Config, ConfigError};
use pit_engine::{spawn_change_listener, spawn_interval, AssignmentLoop, CoalescingRunner};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Environment variable overriding the state directory
pub const STATE_DIR_ENV: &str = "PIT_STATE_DIR";

/// Store adapter the daemon runs against
pub type DaemonStore = TracedStore<RestStore>;

/// Files owned by one daemon instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonPaths {
    pub state_dir: PathBuf,
    /// Lock/PID file; one per store URL
    pub lock_path: PathBuf,
    pub log_path: PathBuf,
}

impl DaemonPaths {
    /// Paths under `state_dir` for the store at `store_url`
    pub fn for_store(state_dir: &Path, store_url: &str) -> Self {
        let hash = store_hash(store_url);
        Self {
            state_dir: state_dir.to_path_buf(),
            lock_path: state_dir.join(format!("{}.lock", hash)),
            log_path: state_dir.join("pitd.log"),
        }
    }

    /// Paths under the default state directory
    pub fn resolve(store_url: &str) -> Result<Self, LifecycleError> {
        Ok(Self::for_store(&state_dir()?, store_url))
    }
}

/// Exclusive hold on the lock file
///
/// Released when dropped; [`Lock::release`] also removes the file.
#[derive(Debug)]
pub struct Lock {
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    file: File,
    path: PathBuf,
}

impl Lock {
    /// Take the lock or fail if another process holds it
    pub fn acquire(path: &Path) -> Result<Self, LifecycleError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        file.try_lock_exclusive()
            .map_err(LifecycleError::LockFailed)?;

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the lock file and drop the lock
    pub fn release(self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove lock file: {}", e);
        }
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to unlock: {}", e);
        }
    }
}

/// A running daemon: the coalesced assignment runner and whatever feeds it
pub struct Daemon {
    lock: Lock,
    runner: CoalescingRunner,
    feeders: Vec<JoinHandle<()>>,
}

impl Daemon {
    /// Passes completed so far
    pub fn passes(&self) -> u64 {
        self.runner.passes()
    }

    /// Request a pass outside the usual triggers
    pub fn fire(&self) {
        self.runner.fire();
    }

    /// Stop the feeders, let a running pass finish, remove the lock file
    ///
    /// Returns the number of completed passes.
    pub async fn shutdown(self) -> u64 {
        info!("Shutting down daemon...");
        for feeder in &self.feeders {
            feeder.abort();
        }
        let passes = self.runner.shutdown().await;
        self.lock.release();
        info!(passes, "Daemon shutdown complete");
        passes
    }
}

/// Build the store from config and start
///
/// The lock is released if the store cannot be built.
pub async fn startup(config: &Config, lock: Lock) -> Result<Daemon, LifecycleError> {
    let store = match RestStore::from_config(&config.store) {
        Ok(store) => TracedStore::new(store),
        Err(e) => {
            lock.release();
            return Err(e.into());
        }
    };
    info!(store = %config.store.url, "Daemon starting");
    Ok(start(store, pit_core::SystemClock, config, lock).await)
}

/// Wire the assignment loop to its triggers
///
/// Every source (timer, ticket changes, worker changes, the initial kick)
/// only fires the runner's trigger. A change feed that cannot be opened is
/// logged; the timer still drives passes.
pub async fn start<S, C>(store: S, clock: C, config: &Config, lock: Lock) -> Daemon
where
    S: StoreAdapter,
    C: Clock,
{
    let assigner = AssignmentLoop::new(store.clone(), clock, config.shop.utc_offset_minutes);
    let runner = CoalescingRunner::spawn(move || {
        let assigner = assigner.clone();
        async move {
            let report = assigner.run_pass().await;
            if !report.is_idle() {
                tracing::debug!(?report, "pass report");
            }
        }
    });

    let mut feeders = Vec::new();
    if config.assignment.enabled {
        feeders.push(spawn_interval(runner.trigger(), config.assignment.interval));
        for table in [Table::Tickets, Table::Workers] {
            match store.subscribe(table).await {
                Ok(changes) => feeders.push(spawn_change_listener(runner.trigger(), changes)),
                Err(e) => warn!(%table, error = %e, "change feed unavailable, relying on timer"),
            }
        }
        runner.fire();
        info!(
            interval = ?config.assignment.interval,
            "assignment loop started"
        );
    } else {
        info!("assignment disabled by config");
    }

    Daemon {
        lock,
        runner,
        feeders,
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Get the state directory for pitd
fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var(STATE_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("pitstop"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/pitstop"))
}

fn store_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.trim_end_matches('/').as_bytes());
    let result = hasher.finalize();
    // First 16 chars of hex digest
    hex_encode(&result[..8])
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
