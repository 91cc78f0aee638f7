//! Document repository implementation.

use async_trait::async_trait;
use tracing::info;

use prishare_core::result::AppResult;
use prishare_core::traits::repository::Repository;
use prishare_core::types::DocumentId;
use prishare_entity::document::Document;

use super::link::delete_links_for_document;
use crate::collection::{load, modify, upsert};
use crate::connection::Database;

/// Repository for uploaded documents.
///
/// Owns referential cleanup: deleting a document removes every link that
/// points at it in the same locked write sequence.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: Database,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn load(&self) -> AppResult<Vec<Document>> {
        load(self.db.store(), &self.db.keys().documents()).await
    }

    /// All documents in insertion order.
    pub async fn list(&self) -> AppResult<Vec<Document>> {
        self.load().await
    }

    /// Find a document by ID.
    pub async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>> {
        Ok(self.load().await?.into_iter().find(|d| d.id == id))
    }

    /// Insert a document or replace the record with the same ID.
    pub async fn put(&self, document: &Document) -> AppResult<Document> {
        let _guard = self.db.write_lock().await;
        let key = self.db.keys().documents();
        modify(self.db.store(), &key, |documents: &mut Vec<Document>| {
            upsert(documents, document.clone(), |d| d.id == document.id);
            Ok(())
        })
        .await?;
        Ok(document.clone())
    }

    /// Delete a document and every link referencing it.
    ///
    /// Returns `true` if the document record existed. Links are removed
    /// either way, so a half-finished earlier delete is completed.
    pub async fn delete(&self, id: DocumentId) -> AppResult<bool> {
        let _guard = self.db.write_lock().await;
        let key = self.db.keys().documents();
        let removed = modify(self.db.store(), &key, |documents: &mut Vec<Document>| {
            let before = documents.len();
            documents.retain(|d| d.id != id);
            Ok(documents.len() != before)
        })
        .await?;
        let links = delete_links_for_document(&self.db, id).await?;

        if removed || links > 0 {
            info!(document_id = %id, links_removed = links, "Document deleted");
        }
        Ok(removed)
    }
}

#[async_trait]
impl Repository<Document, DocumentId> for DocumentRepository {
    async fn find_by_id(&self, id: &DocumentId) -> AppResult<Option<Document>> {
        DocumentRepository::find_by_id(self, *id).await
    }

    async fn find_all(&self) -> AppResult<Vec<Document>> {
        self.list().await
    }

    async fn save(&self, entity: &Document) -> AppResult<Document> {
        self.put(entity).await
    }

    async fn delete(&self, id: &DocumentId) -> AppResult<bool> {
        DocumentRepository::delete(self, *id).await
    }
}
