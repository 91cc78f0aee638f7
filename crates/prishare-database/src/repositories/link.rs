//! Shared link repository implementation.

use async_trait::async_trait;
use tracing::{debug, warn};

use prishare_core::error::AppError;
use prishare_core::result::AppResult;
use prishare_core::traits::repository::Repository;
use prishare_core::types::{DocumentId, LinkId};
use prishare_entity::link::SharedLink;

use crate::collection::{load, modify, upsert};
use crate::connection::Database;

/// Repository for shared links.
///
/// Every write bumps the stored `version`; [`LinkRepository::update`]
/// refuses to overwrite a record that changed since the caller read it.
#[derive(Debug, Clone)]
pub struct LinkRepository {
    db: Database,
}

impl LinkRepository {
    /// Create a new link repository.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn load(&self) -> AppResult<Vec<SharedLink>> {
        load(self.db.store(), &self.db.keys().shared_links()).await
    }

    /// All links, newest-created first.
    pub async fn list(&self) -> AppResult<Vec<SharedLink>> {
        let mut links = self.load().await?;
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    /// Find a link by ID.
    pub async fn find_by_id(&self, id: LinkId) -> AppResult<Option<SharedLink>> {
        Ok(self.load().await?.into_iter().find(|l| l.id == id))
    }

    /// Links that reference a document.
    pub async fn find_by_document(&self, document_id: DocumentId) -> AppResult<Vec<SharedLink>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|l| l.document_id == document_id)
            .collect())
    }

    /// Insert a link or replace the record with the same ID.
    ///
    /// Unconditional: the stored version becomes one more than whatever
    /// was there before (or the link's own version for a new record).
    pub async fn put(&self, link: &SharedLink) -> AppResult<SharedLink> {
        let _guard = self.db.write_lock().await;
        let key = self.db.keys().shared_links();

        let stored = modify(self.db.store(), &key, |links: &mut Vec<SharedLink>| {
            let mut stored = link.clone();
            if let Some(existing) = links.iter().find(|l| l.id == link.id) {
                stored.version = existing.version + 1;
            }
            upsert(links, stored.clone(), |l| l.id == stored.id);
            Ok(stored)
        })
        .await?;

        debug!(link_id = %stored.id, version = stored.version, "Link stored");
        Ok(stored)
    }

    /// Replace an existing link, provided nobody else wrote it since
    /// `link.version` was read.
    ///
    /// The version check and the write are one compare-and-set on the
    /// store, so this holds across processes sharing it. Fails with
    /// `NotFound` if the link is gone and `Conflict` if the stored version
    /// differs.
    pub async fn update(&self, link: &SharedLink) -> AppResult<SharedLink> {
        let _guard = self.db.write_lock().await;
        let key = self.db.keys().shared_links();

        let stored = modify(self.db.store(), &key, |links: &mut Vec<SharedLink>| {
            let Some(existing) = links.iter_mut().find(|l| l.id == link.id) else {
                return Err(AppError::not_found(format!("Link {} not found", link.id)));
            };

            if existing.version != link.version {
                warn!(
                    link_id = %link.id,
                    expected = link.version,
                    found = existing.version,
                    "Stale link update rejected"
                );
                return Err(AppError::conflict(format!(
                    "Link {} was modified concurrently",
                    link.id
                )));
            }

            let mut stored = link.clone();
            stored.version = existing.version + 1;
            *existing = stored.clone();
            Ok(stored)
        })
        .await?;

        debug!(link_id = %stored.id, version = stored.version, status = %stored.status, "Link updated");
        Ok(stored)
    }

    /// Delete a link. Returns `true` if a record was removed.
    pub async fn delete(&self, id: LinkId) -> AppResult<bool> {
        let _guard = self.db.write_lock().await;
        let key = self.db.keys().shared_links();

        modify(self.db.store(), &key, |links: &mut Vec<SharedLink>| {
            let before = links.len();
            links.retain(|l| l.id != id);
            Ok(links.len() != before)
        })
        .await
    }

    /// Delete every link referencing `document_id`. Returns the number removed.
    pub async fn delete_by_document(&self, document_id: DocumentId) -> AppResult<usize> {
        let _guard = self.db.write_lock().await;
        delete_links_for_document(&self.db, document_id).await
    }
}

/// Remove every link referencing `document_id`. The caller holds the write lock.
pub(crate) async fn delete_links_for_document(
    db: &Database,
    document_id: DocumentId,
) -> AppResult<usize> {
    let key = db.keys().shared_links();
    modify(db.store(), &key, |links: &mut Vec<SharedLink>| {
        let before = links.len();
        links.retain(|l| l.document_id != document_id);
        Ok(before - links.len())
    })
    .await
}

#[async_trait]
impl Repository<SharedLink, LinkId> for LinkRepository {
    async fn find_by_id(&self, id: &LinkId) -> AppResult<Option<SharedLink>> {
        LinkRepository::find_by_id(self, *id).await
    }

    async fn find_all(&self) -> AppResult<Vec<SharedLink>> {
        self.list().await
    }

    async fn save(&self, entity: &SharedLink) -> AppResult<SharedLink> {
        self.put(entity).await
    }

    async fn delete(&self, id: &LinkId) -> AppResult<bool> {
        LinkRepository::delete(self, *id).await
    }
}
