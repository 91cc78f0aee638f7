//! JSON-file store implementation.
//!
//! Each key is one file under the configured directory. Writes go to a
//! temporary sibling and are renamed into place, so a reader never sees a
//! half-written value. Every write takes an exclusive lock on the key's
//! `.lock` file, which serialises writers across processes sharing the
//! directory.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use prishare_core::error::{AppError, ErrorKind};
use prishare_core::result::AppResult;
use prishare_core::traits::store::KeyValueStore;

/// Directory-backed key-value store.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding one file per key.
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `directory`.
    pub async fn new(directory: impl AsRef<Path>) -> AppResult<Self> {
        let root = directory.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create store directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Map a key to its file path.
    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }

    /// Run `op` on the key's file while holding its exclusive lock.
    async fn with_key_lock<R, F>(&self, key: &str, op: F) -> AppResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&Path) -> io::Result<R> + Send + 'static,
    {
        let path = self.path_for(key);
        let lock_path = path.with_extension("lock");

        let result = tokio::task::spawn_blocking(move || {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;
            let mut lock = fd_lock::RwLock::new(file);
            let _guard = lock.write()?;
            op(&path)
        })
        .await
        .map_err(|e| AppError::internal(format!("Store task failed: {e}")))?;

        result.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write key: {key}"), e)
        })
    }
}

/// Encode a key as a file name.
///
/// `[A-Za-z0-9_-]` pass through; every other byte becomes `%XX`. The
/// encoding is injective and never yields a path separator, so distinct
/// keys get distinct files and no key escapes the root.
fn encode_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            name.push(char::from(byte));
        } else {
            let _ = write!(name, "%{byte:02X}");
        }
    }
    name
}

fn read_current(path: &Path) -> io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn write_replacing(path: &Path, value: &str) -> io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, value)?;
    std::fs::rename(&tmp, path)
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read key: {key}"),
                e,
            )),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let owned = value.to_string();
        self.with_key_lock(key, move |path| write_replacing(path, &owned))
            .await?;

        debug!(key, bytes = value.len(), "Wrote store file");
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> AppResult<bool> {
        let expected = expected.map(str::to_owned);
        let owned = value.to_string();
        let swapped = self
            .with_key_lock(key, move |path| {
                if read_current(path)? != expected {
                    return Ok(false);
                }
                write_replacing(path, &owned)?;
                Ok(true)
            })
            .await?;

        debug!(key, swapped, "Compare-and-set on store file");
        Ok(swapped)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.with_key_lock(key, |path| match std::fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        })
        .await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(fs::try_exists(self.path_for(key)).await?)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }
}
