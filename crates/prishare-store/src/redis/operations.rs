//! Redis store implementation.

use async_trait::async_trait;
use redis::AsyncCommands;

use prishare_core::error::{AppError, ErrorKind};
use prishare_core::result::AppResult;
use prishare_core::traits::store::KeyValueStore;

use super::client::RedisClient;

/// Lua script for an atomic compare-and-set.
///
/// KEYS[1] = key
/// ARGV[1] = "1" if a current value is expected, "0" if the key must be absent
/// ARGV[2] = expected value (ignored when ARGV[1] is "0")
/// ARGV[3] = new value
///
/// Returns 1 when the value was written, 0 otherwise.
const COMPARE_AND_SET_SCRIPT: &str = r#"
    local current = redis.call('GET', KEYS[1])

    if ARGV[1] == '0' then
        if current then
            return 0
        end
    elseif current ~= ARGV[2] then
        return 0
    end

    redis.call('SET', KEYS[1], ARGV[3])
    return 1
"#;

/// Redis-backed key-value store.
///
/// Keys are used as given; the collection prefix is already part of every
/// key built by [`crate::keys::StoreKeys`].
#[derive(Debug, Clone)]
pub struct RedisStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisStore {
    /// Create a new Redis store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Storage, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn.set(key, value).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let written: i64 = redis::Script::new(COMPARE_AND_SET_SCRIPT)
            .key(key)
            .arg(if expected.is_some() { "1" } else { "0" })
            .arg(expected.unwrap_or_default())
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(written == 1)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let result: bool = conn.exists(key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
