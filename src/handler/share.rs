//! Process-wide registry of per-table shared state
//!
//! Every open handler on a table holds a `ShareGuard` on the same
//! `TableShare`. Guards are counted under the registry lock; the entry is
//! removed when the last guard is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::observability::BridgeMetrics;

type ShareMap = HashMap<String, Arc<TableShare>>;

static GLOBAL: OnceLock<ShareRegistry> = OnceLock::new();

/// State shared by all handlers open on one table
#[derive(Debug)]
pub struct TableShare {
    name: String,
    metrics: BridgeMetrics,
    /// Live guards; only changed under the registry lock
    guards: AtomicUsize,
}

impl TableShare {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metrics: BridgeMetrics::new(),
            guards: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }
}

/// Table name -> share map behind a single mutex
#[derive(Debug, Clone, Default)]
pub struct ShareRegistry {
    shares: Arc<Mutex<ShareMap>>,
}

impl ShareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static ShareRegistry {
        GLOBAL.get_or_init(ShareRegistry::new)
    }

    fn lock(&self) -> MutexGuard<'_, ShareMap> {
        lock_shares(&self.shares)
    }

    /// Returns the share for `name`, creating it on first use
    pub fn acquire(&self, name: &str) -> ShareGuard {
        let mut shares = self.lock();
        let share = shares
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(TableShare::new(name)))
            .clone();
        share.guards.fetch_add(1, Ordering::Relaxed);
        ShareGuard {
            shares: Arc::clone(&self.shares),
            share,
        }
    }

    /// Number of live guards on `name`
    pub fn open_count(&self, name: &str) -> usize {
        self.lock()
            .get(name)
            .map_or(0, |share| share.guards.load(Ordering::Relaxed))
    }

    /// Number of tables with at least one live guard
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn lock_shares(shares: &Mutex<ShareMap>) -> MutexGuard<'_, ShareMap> {
    shares.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A handle on a table share; releases it on drop
#[derive(Debug)]
pub struct ShareGuard {
    shares: Arc<Mutex<ShareMap>>,
    share: Arc<TableShare>,
}

impl ShareGuard {
    pub fn share(&self) -> &TableShare {
        &self.share
    }

    pub fn metrics(&self) -> &BridgeMetrics {
        self.share.metrics()
    }
}

impl Drop for ShareGuard {
    fn drop(&mut self) {
        let mut shares = lock_shares(&self.shares);
        if self.share.guards.fetch_sub(1, Ordering::Relaxed) == 1 {
            shares.remove(self.share.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_acquire_shares_state() {
        let registry = ShareRegistry::new();
        let a = registry.acquire("users");
        let b = registry.acquire("users");
        assert_eq!(registry.open_count("users"), 2);
        assert_eq!(registry.len(), 1);

        a.metrics().increment_rows_encoded();
        assert_eq!(b.metrics().snapshot().rows_encoded, 1);
    }

    #[test]
    fn test_last_release_removes_entry() {
        let registry = ShareRegistry::new();
        let a = registry.acquire("users");
        let b = registry.acquire("users");
        drop(a);
        assert_eq!(registry.open_count("users"), 1);
        drop(b);
        assert_eq!(registry.open_count("users"), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reacquire_starts_fresh() {
        let registry = ShareRegistry::new();
        {
            let guard = registry.acquire("t");
            guard.metrics().increment_rows_decoded();
        }
        let guard = registry.acquire("t");
        assert_eq!(guard.metrics().snapshot().rows_decoded, 0);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let registry = ShareRegistry::new();
        let mut handles = vec![];
        for _ in 0..8 {
            let reg = registry.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let guard = reg.acquire("hot");
                    guard.metrics().increment_rows_encoded();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_global_is_singleton() {
        assert!(std::ptr::eq(ShareRegistry::global(), ShareRegistry::global()));
    }
}
