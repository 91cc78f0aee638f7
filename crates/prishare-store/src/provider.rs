//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use prishare_core::config::store::StoreConfig;
use prishare_core::error::AppError;
use prishare_core::result::AppResult;
use prishare_core::traits::store::KeyValueStore;

use crate::keys::StoreKeys;

/// Store manager that wraps the configured key-value store.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store.
    inner: Arc<dyn KeyValueStore>,
    /// Keys for every collection, under the configured prefix.
    keys: StoreKeys,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisStore::new(client))
            }
            #[cfg(feature = "file")]
            "file" => {
                info!(directory = %config.file.directory, "Initializing JSON-file store");
                Arc::new(crate::file::FileStore::new(&config.file.directory).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, file, redis"
                )));
            }
        };

        Ok(Self {
            inner,
            keys: StoreKeys::new(config.key_prefix.clone()),
        })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn KeyValueStore>, keys: StoreKeys) -> Self {
        Self { inner: store, keys }
    }

    /// A shared handle to the inner store.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner)
    }

    /// Collection keys.
    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }
}

#[async_trait]
impl KeyValueStore for StoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> AppResult<bool> {
        self.inner.compare_and_set(key, expected, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
