//! Link lifecycle state machine.
//!
//! The transition rules are pure functions of `(link, now)`. [`LinkLifecycle`]
//! applies them against the repository: every link it hands out has had
//! expiry reconciled and persisted, and every transition is written with
//! a version check so two writers cannot both leave `Active`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use prishare_core::error::ErrorKind;
use prishare_core::result::AppResult;
use prishare_core::traits::clock::Clock;
use prishare_core::types::{LinkId, is_expired};
use prishare_database::repositories::{DocumentRepository, LinkRepository};
use prishare_entity::link::{LinkStatus, SharedLink};

use crate::error::AccessError;

/// Attempts at a read-reconcile-write cycle before reporting a conflict.
const MAX_ATTEMPTS: usize = 3;

/// Move an active link whose document has expired to `Expired`.
///
/// Returns the link and whether its status changed. Links without a
/// document snapshot, or already terminal, are returned untouched.
pub fn reconcile(mut link: SharedLink, now: DateTime<Utc>) -> (SharedLink, bool) {
    let expired = link
        .expires_at()
        .is_some_and(|expires_at| is_expired(expires_at, now));

    if link.status == LinkStatus::Active && expired {
        link.status = LinkStatus::Expired;
        return (link, true);
    }
    (link, false)
}

/// Apply a successful print: `Active -> Printed`, stamp `printed_at`, and
/// count the use. A link whose uses are already spent is refused even if
/// its status was never moved on.
pub fn mark_printed(mut link: SharedLink, now: DateTime<Utc>) -> Result<SharedLink, AccessError> {
    ensure_transition(&link, LinkStatus::Printed)?;
    if link.uses_exhausted() {
        return Err(AccessError::LinkNotActive(LinkStatus::Printed));
    }
    link.status = LinkStatus::Printed;
    link.printed_at = Some(now);
    link.use_count += 1;
    Ok(link)
}

/// Withdraw a link: `Active -> Revoked`.
pub fn revoke(mut link: SharedLink, now: DateTime<Utc>) -> Result<SharedLink, AccessError> {
    ensure_transition(&link, LinkStatus::Revoked)?;
    link.status = LinkStatus::Revoked;
    link.revoked_at = Some(now);
    Ok(link)
}

/// Record a granted view on an active link.
pub fn mark_viewed(mut link: SharedLink, now: DateTime<Utc>) -> Result<SharedLink, AccessError> {
    if !link.is_active() {
        return Err(AccessError::LinkNotActive(link.status));
    }
    link.last_accessed_at = Some(now);
    Ok(link)
}

fn ensure_transition(link: &SharedLink, next: LinkStatus) -> Result<(), AccessError> {
    if link.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AccessError::LinkNotActive(link.status))
    }
}

/// Repository-backed driver for the lifecycle rules.
#[derive(Debug, Clone)]
pub struct LinkLifecycle {
    links: LinkRepository,
    documents: DocumentRepository,
    clock: Arc<dyn Clock>,
}

impl LinkLifecycle {
    /// Create a lifecycle driver.
    pub fn new(links: LinkRepository, documents: DocumentRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            links,
            documents,
            clock,
        }
    }

    /// The clock transitions are stamped with.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Load a link with expiry reconciled.
    ///
    /// If the link has just expired the new status is persisted before
    /// this returns.
    pub async fn load(&self, id: LinkId) -> Result<SharedLink, AccessError> {
        for _ in 0..MAX_ATTEMPTS {
            let link = self.links.find_by_id(id).await?.ok_or(AccessError::LinkNotFound)?;
            let link = self.with_snapshot(link).await?;

            let (link, changed) = reconcile(link, self.clock.now());
            if !changed {
                return Ok(link);
            }

            match self.links.update(&link).await {
                Ok(stored) => {
                    info!(link_id = %id, "Link expired");
                    return Ok(stored);
                }
                Err(e) if e.is(ErrorKind::Conflict) => {
                    warn!(link_id = %id, "Expiry write raced another writer, re-reading");
                }
                Err(e) if e.is(ErrorKind::NotFound) => return Err(AccessError::LinkNotFound),
                Err(e) => return Err(e.into()),
            }
        }
        Err(AccessError::Conflict)
    }

    /// Every link, newest first, each reconciled.
    pub async fn list(&self) -> AppResult<Vec<SharedLink>> {
        let mut reconciled = Vec::new();
        for link in self.links.list().await? {
            if !link.is_active() {
                reconciled.push(link);
                continue;
            }
            match self.load(link.id).await {
                Ok(link) => reconciled.push(link),
                Err(AccessError::LinkNotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(reconciled)
    }

    /// Print an active link. Re-reads the link so a print that already
    /// happened (or a revocation) is seen.
    pub async fn print(&self, id: LinkId) -> Result<SharedLink, AccessError> {
        let link = self.modify(id, mark_printed).await?;
        info!(link_id = %id, use_count = link.use_count, "Link printed");
        Ok(link)
    }

    /// Revoke an active link.
    pub async fn revoke(&self, id: LinkId) -> Result<SharedLink, AccessError> {
        let link = self.modify(id, revoke).await?;
        info!(link_id = %id, "Link revoked");
        Ok(link)
    }

    /// Stamp `last_accessed_at` on an active link.
    pub async fn touch(&self, id: LinkId) -> Result<SharedLink, AccessError> {
        self.modify(id, mark_viewed).await
    }

    async fn modify<F>(&self, id: LinkId, apply: F) -> Result<SharedLink, AccessError>
    where
        F: Fn(SharedLink, DateTime<Utc>) -> Result<SharedLink, AccessError> + Send + Sync,
    {
        for _ in 0..MAX_ATTEMPTS {
            let link = self.load(id).await?;
            let next = apply(link, self.clock.now())?;

            match self.links.update(&next).await {
                Ok(stored) => return Ok(stored),
                Err(e) if e.is(ErrorKind::Conflict) => {
                    warn!(link_id = %id, "Link update raced another writer, re-reading");
                }
                Err(e) if e.is(ErrorKind::NotFound) => return Err(AccessError::LinkNotFound),
                Err(e) => return Err(e.into()),
            }
        }
        Err(AccessError::Conflict)
    }

    /// Attach the document snapshot to links stored without one, so expiry
    /// can be derived.
    async fn with_snapshot(&self, mut link: SharedLink) -> AppResult<SharedLink> {
        if link.document.is_none() {
            link.document = self.documents.find_by_id(link.document_id).await?;
        }
        Ok(link)
    }
}
