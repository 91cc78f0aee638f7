//! Whole-collection load and read-modify-write helpers.
//!
//! A collection is a JSON array stored under one key. A missing key reads
//! as an empty collection.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use prishare_core::error::AppError;
use prishare_core::result::AppResult;
use prishare_core::traits::store::{KeyValueStore, KeyValueStoreExt};

/// Attempts before a contended collection write gives up.
const MAX_SWAP_ATTEMPTS: usize = 16;

/// Read every record held under `key`.
pub async fn load<T>(store: &dyn KeyValueStore, key: &str) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Send,
{
    Ok(store.get_json::<Vec<T>>(key).await?.unwrap_or_default())
}

/// Read-modify-write the records held under `key`.
///
/// `apply` edits the records and returns its result; an `Err` aborts the
/// sequence without writing. The write is a compare-and-set against the
/// exact value that was read, so if any writer (in this process or
/// another) changed the key in between, `apply` runs again on fresh
/// records. Nothing is written when `apply` leaves the records as they
/// were.
pub async fn modify<T, R, F>(store: &dyn KeyValueStore, key: &str, mut apply: F) -> AppResult<R>
where
    T: Serialize + DeserializeOwned + Send,
    R: Send,
    F: FnMut(&mut Vec<T>) -> AppResult<R> + Send,
{
    for attempt in 1..=MAX_SWAP_ATTEMPTS {
        let current = store.get(key).await?;
        let mut records: Vec<T> = match current.as_deref() {
            Some(json) => serde_json::from_str(json)?,
            None => Vec::new(),
        };

        let result = apply(&mut records)?;

        let next = serde_json::to_string(&records)?;
        let unchanged = match current.as_deref() {
            Some(json) => json == next,
            None => records.is_empty(),
        };
        if unchanged {
            return Ok(result);
        }

        if store.compare_and_set(key, current.as_deref(), &next).await? {
            debug!(key, count = records.len(), "Persisted collection");
            return Ok(result);
        }
        debug!(key, attempt, "Collection changed while writing, retrying");
    }

    Err(AppError::conflict(format!(
        "Gave up writing {key} after {MAX_SWAP_ATTEMPTS} contended attempts"
    )))
}

/// Replace the record matching `same`, or append `record` when none does.
///
/// Leaves at most one matching record in `records`.
pub fn upsert<T, F>(records: &mut Vec<T>, record: T, same: F)
where
    F: Fn(&T) -> bool,
{
    match records.iter().position(&same) {
        Some(index) => {
            records[index] = record;
            records.retain({
                let mut seen = false;
                move |r| {
                    if same(r) {
                        let keep = !seen;
                        seen = true;
                        keep
                    } else {
                        true
                    }
                }
            });
        }
        None => records.push(record),
    }
}
