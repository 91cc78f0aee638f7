//! In-memory store implementation using the dashmap crate.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use prishare_core::result::AppResult;
use prishare_core::traits::store::KeyValueStore;

/// In-memory key-value store.
///
/// Clones share the same map, so a test can hand one clone to the
/// repositories and inspect the raw values through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        debug!(key, bytes = value.len(), "Memory store set");
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> AppResult<bool> {
        // The entry holds its shard lock until it is dropped.
        let swapped = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut entry) if expected == Some(entry.get().as_str()) => {
                entry.insert(value.to_string());
                true
            }
            Entry::Vacant(entry) if expected.is_none() => {
                entry.insert(value.to_string());
                true
            }
            _ => false,
        };
        Ok(swapped)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.contains_key(key))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
