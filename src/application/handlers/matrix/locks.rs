//! Per-matrix write serialization.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::MatrixKey;

/// Idle entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// One async mutex per (parent, evaluator) so concurrent writes to the same
/// matrix cannot lose updates, while different matrices proceed in parallel.
#[derive(Debug, Clone, Default)]
pub struct MatrixLocks {
    locks: Arc<Mutex<HashMap<MatrixKey, Arc<Mutex<()>>>>>,
}

impl MatrixLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`; released when the guard drops.
    pub async fn acquire(&self, key: MatrixKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() > PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(key).or_default().clone()
        };
        lock.lock_owned().await
    }
}
