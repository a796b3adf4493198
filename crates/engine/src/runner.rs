// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coalescing single-concurrency runner
//!
//! Triggers from any source collapse into a single pending request. One
//! pass runs at a time; triggers that arrive while a pass is running cause
//! exactly one follow-up pass, however many there were.

use pit_adapters::ChangeEvent;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;

/// Cheap handle for requesting a pass
#[derive(Clone, Default)]
pub struct Trigger {
    pending: Arc<Notify>,
}

impl Trigger {
    /// Request a pass; never blocks
    pub fn fire(&self) {
        // notify_one keeps at most one permit when nobody is waiting
        self.pending.notify_one();
    }
}

/// Runs passes one at a time in a background task
pub struct CoalescingRunner {
    trigger: Trigger,
    stop: watch::Sender<bool>,
    passes: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl CoalescingRunner {
    /// Spawn the runner; `pass` is invoked once per coalesced request
    pub fn spawn<F, Fut>(mut pass: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let trigger = Trigger::default();
        let (stop, mut stopped) = watch::channel(false);
        let passes = Arc::new(AtomicU64::new(0));

        let pending = Arc::clone(&trigger.pending);
        let counter = Arc::clone(&passes);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = stopped.changed() => break,
                    _ = pending.notified() => {
                        pass().await;
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
            tracing::debug!("runner stopped");
        });

        Self {
            trigger,
            stop,
            passes,
            handle,
        }
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger.clone()
    }

    /// Request a pass
    pub fn fire(&self) {
        self.trigger.fire();
    }

    /// Passes completed so far
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::SeqCst)
    }

    /// Stop after the running pass, if any, completes
    ///
    /// A pending request that has not started yet is dropped. Returns the
    /// number of completed passes.
    pub async fn shutdown(self) -> u64 {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "runner task failed");
        }
        self.passes.load(Ordering::SeqCst)
    }
}

/// Fire `trigger` every `period`, starting one period from now
pub fn spawn_interval(trigger: Trigger, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            trigger.fire();
        }
    })
}

/// Fire `trigger` for every change event until the feed closes
pub fn spawn_change_listener(
    trigger: Trigger,
    mut changes: mpsc::Receiver<ChangeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = changes.recv().await {
            tracing::debug!(table = %event.table, "change received");
            trigger.fire();
        }
        tracing::info!("change feed closed");
    })
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
