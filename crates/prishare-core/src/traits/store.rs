//! Key-value store trait for pluggable persistence backends.

use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::result::AppResult;

/// Trait for key-value store backends (in-memory, JSON files, Redis).
///
/// Values are JSON documents stored as strings. A single `get` or `set` is
/// atomic for its key. Read-modify-write sequences go through
/// [`KeyValueStore::compare_and_set`], which every backend makes atomic
/// for all processes sharing the store, not just the calling one.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Replace the value under `key` only if it still equals `expected`
    /// (`None`: the key must be absent).
    ///
    /// Returns `false` and leaves the key untouched when the stored value
    /// differs.
    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> AppResult<bool>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Typed JSON helpers available on every [`KeyValueStore`], including
/// trait objects.
pub trait KeyValueStoreExt: KeyValueStore {
    /// Get a typed value by deserializing from JSON.
    fn get_json<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl Future<Output = AppResult<Option<T>>> + Send;

    /// Set a typed value by serializing to JSON.
    fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> impl Future<Output = AppResult<()>> + Send;
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get(key).await? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json).await
    }
}
