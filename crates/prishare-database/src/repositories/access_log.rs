//! Access log repository implementation.

use tracing::debug;

use prishare_core::result::AppResult;
use prishare_core::types::LinkId;
use prishare_entity::access::AccessLog;

use crate::collection::{load, modify};
use crate::connection::Database;

/// Append-only log of access attempts, keyed by link.
#[derive(Debug, Clone)]
pub struct AccessLogRepository {
    db: Database,
}

impl AccessLogRepository {
    /// Create a new access log repository.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn load(&self) -> AppResult<Vec<AccessLog>> {
        load(self.db.store(), &self.db.keys().access_logs()).await
    }

    /// Record an access attempt.
    pub async fn append(&self, entry: &AccessLog) -> AppResult<()> {
        let _guard = self.db.write_lock().await;
        modify(
            self.db.store(),
            &self.db.keys().access_logs(),
            |entries: &mut Vec<AccessLog>| {
                entries.push(entry.clone());
                Ok(())
            },
        )
        .await?;

        debug!(
            link_id = %entry.shared_link_id,
            access_type = %entry.access_type,
            success = entry.success,
            "Access logged"
        );
        Ok(())
    }

    /// Entries for one link, oldest first.
    pub async fn list_for_link(&self, link_id: LinkId) -> AppResult<Vec<AccessLog>> {
        let mut entries: Vec<AccessLog> = self
            .load()
            .await?
            .into_iter()
            .filter(|e| e.shared_link_id == link_id)
            .collect();
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    /// Remove every entry for a link. Returns the number removed.
    pub async fn delete_for_link(&self, link_id: LinkId) -> AppResult<usize> {
        let _guard = self.db.write_lock().await;
        modify(
            self.db.store(),
            &self.db.keys().access_logs(),
            |entries: &mut Vec<AccessLog>| {
                let before = entries.len();
                entries.retain(|e| e.shared_link_id != link_id);
                Ok(before - entries.len())
            },
        )
        .await
    }
}
