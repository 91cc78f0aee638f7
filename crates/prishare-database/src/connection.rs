//! Shared handle to the backing store.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use prishare_core::result::AppResult;
use prishare_core::traits::store::KeyValueStore;
use prishare_store::{StoreKeys, StoreManager};

/// Store handle shared by every repository.
///
/// Collections are whole JSON arrays rewritten with a compare-and-set, so
/// writers in different processes never lose each other's updates. Within
/// one process, every repository clone built from the same `Database` also
/// shares a write lock, which keeps local writers from racing each other's
/// swaps and keeps a document delete and its link cascade together.
#[derive(Debug, Clone)]
pub struct Database {
    store: Arc<dyn KeyValueStore>,
    keys: StoreKeys,
    write_lock: Arc<Mutex<()>>,
}

impl Database {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StoreKeys) -> Self {
        Self {
            store,
            keys,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build from the configured store manager.
    pub fn from_manager(manager: &StoreManager) -> Self {
        info!("Opening repositories on configured store");
        Self::new(manager.store(), manager.keys().clone())
    }

    /// The backing store.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Collection keys.
    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Acquire the single-writer lock. Hold the guard for the whole
    /// read-modify-write sequence.
    pub async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Check that the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }
}
