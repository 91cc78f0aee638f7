//! Key-value store configuration.

use serde::{Deserialize, Serialize};

/// Top-level store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider type: `"memory"`, `"file"`, or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Prefix applied to every key written by PriShare.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// JSON-file backend configuration.
    #[serde(default)]
    pub file: FileStoreConfig,
    /// Redis backend configuration.
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            key_prefix: default_key_prefix(),
            file: FileStoreConfig::default(),
            redis: RedisStoreConfig::default(),
        }
    }
}

/// JSON-file store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Directory holding one JSON document per key.
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

/// Redis store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

fn default_provider() -> String {
    "file".to_string()
}

fn default_key_prefix() -> String {
    "prishare_".to_string()
}

fn default_directory() -> String {
    "data/store".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}
