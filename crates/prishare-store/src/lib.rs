//! # prishare-store
//!
//! Key-value store implementations for PriShare. Supports three modes:
//!
//! - **memory**: process-local map using [dashmap](https://crates.io/crates/dashmap)
//! - **file**: one JSON document per key in a directory, replaced atomically
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration.

#[cfg(feature = "file")]
pub mod file;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use keys::StoreKeys;
pub use provider::StoreManager;
