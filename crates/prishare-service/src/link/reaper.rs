//! Auto-delete of documents and their links.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use prishare_core::error::AppError;
use prishare_core::result::AppResult;
use prishare_core::types::{DocumentId, LinkId};
use prishare_database::repositories::{AccessLogRepository, DocumentRepository, LinkRepository};

/// Removes a document, its link, and the link's access log.
///
/// [`Reaper::ensure_deleted`] is idempotent: running it twice, late, or
/// after someone else already deleted the records is not an error. That
/// is what makes a delayed deletion safe without cancellation.
#[derive(Debug, Clone)]
pub struct Reaper {
    links: LinkRepository,
    documents: DocumentRepository,
    access_logs: AccessLogRepository,
}

impl Reaper {
    /// Create a reaper over the given repositories.
    pub fn new(
        links: LinkRepository,
        documents: DocumentRepository,
        access_logs: AccessLogRepository,
    ) -> Self {
        Self {
            links,
            documents,
            access_logs,
        }
    }

    /// Make sure neither the document nor the link exists any more.
    pub async fn ensure_deleted(&self, document_id: DocumentId, link_id: LinkId) -> AppResult<()> {
        let document_removed = self.documents.delete(document_id).await?;
        let link_removed = self.links.delete(link_id).await?;
        self.access_logs.delete_for_link(link_id).await?;

        if document_removed || link_removed {
            info!(%document_id, %link_id, "Document and link deleted");
        }
        Ok(())
    }

    /// Run [`Reaper::ensure_deleted`] after `delay`.
    ///
    /// A zero delay deletes before returning. Otherwise the deletion runs
    /// on a spawned task that nothing needs to cancel; the handle only
    /// lets a caller wait for it.
    pub async fn schedule(
        &self,
        document_id: DocumentId,
        link_id: LinkId,
        delay: Duration,
    ) -> DeletionHandle {
        if delay.is_zero() {
            let result = self.ensure_deleted(document_id, link_id).await;
            if let Err(e) = &result {
                error!(%document_id, %link_id, error = %e, "Auto-delete failed");
            }
            return DeletionHandle::Done(result);
        }

        let reaper = self.clone();
        DeletionHandle::Pending(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = reaper.ensure_deleted(document_id, link_id).await;
            if let Err(e) = &result {
                error!(%document_id, %link_id, error = %e, "Delayed auto-delete failed");
            }
            result
        }))
    }
}

/// Outcome of a scheduled deletion.
#[derive(Debug)]
pub enum DeletionHandle {
    /// The deletion already ran.
    Done(AppResult<()>),
    /// The deletion is waiting for its delay on a background task.
    Pending(JoinHandle<AppResult<()>>),
}

impl DeletionHandle {
    /// Whether the deletion has already run.
    pub fn is_done(&self) -> bool {
        match self {
            Self::Done(_) => true,
            Self::Pending(handle) => handle.is_finished(),
        }
    }

    /// Wait for the deletion to finish.
    pub async fn wait(self) -> AppResult<()> {
        match self {
            Self::Done(result) => result,
            Self::Pending(handle) => handle
                .await
                .map_err(|e| AppError::internal(format!("Auto-delete task failed: {e}")))?,
        }
    }
}
