//! Per-target in-flight guard.
//!
//! When enabled, two triggers for the same (project, environment) run one
//! after the other. Different targets never wait on each other.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lazily created lock per (project, environment).
#[derive(Debug, Default)]
pub struct TargetLocks {
    locks: DashMap<(String, String), Arc<Mutex<()>>>,
}

impl TargetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other deploy of this target is running.
    /// The target is released when the guard is dropped.
    pub async fn acquire(&self, project: &str, environment: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry((project.to_string(), environment.to_string()))
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Number of targets seen so far.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
