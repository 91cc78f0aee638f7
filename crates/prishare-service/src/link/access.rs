//! Access gate: decides whether a recipient may view or print a link.
//!
//! A recipient opens a link into an [`AccessSession`]. The session carries
//! the PIN sub-state, which lives only as long as the session does; opening
//! the link again always starts unverified.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use prishare_auth::PinHasher;
use prishare_core::config::ShareConfig;
use prishare_core::traits::clock::Clock;
use prishare_core::types::LinkId;
use prishare_database::repositories::{AccessLogRepository, DocumentRepository};
use prishare_entity::access::{AccessLog, AccessType};
use prishare_entity::document::Document;
use prishare_entity::link::SharedLink;

use super::lifecycle::LinkLifecycle;
use super::reaper::{DeletionHandle, Reaper};
use crate::error::AccessError;

/// PIN verification state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    /// A PIN is required and has not been verified.
    Unverified,
    /// The PIN was verified, or none is required.
    Verified,
}

/// One recipient's visit to a link.
#[derive(Debug, Clone)]
pub struct AccessSession {
    link: SharedLink,
    document: Document,
    pin: PinState,
    viewed: bool,
    printed: bool,
    deletion_scheduled: bool,
}

impl AccessSession {
    /// The link as last read.
    pub fn link(&self) -> &SharedLink {
        &self.link
    }

    /// The document behind the link.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current PIN state.
    pub fn pin_state(&self) -> PinState {
        self.pin
    }

    /// Whether view access can be granted without another PIN check.
    pub fn is_verified(&self) -> bool {
        self.pin == PinState::Verified
    }

    /// Whether a view was granted in this session.
    pub fn has_viewed(&self) -> bool {
        self.viewed
    }

    /// Whether a print was granted in this session.
    pub fn has_printed(&self) -> bool {
        self.printed
    }
}

/// A granted view.
#[derive(Debug)]
pub struct ViewGrant {
    /// The link after `last_accessed_at` was stamped.
    pub link: SharedLink,
    /// The document to render.
    pub document: Document,
    /// Pending auto-delete, when the document deletes itself after viewing.
    pub deletion: Option<DeletionHandle>,
}

impl ViewGrant {
    /// Address the recipient can write to about this document.
    pub fn sender_contact(&self) -> Option<&str> {
        self.link.sender_email.as_deref()
    }
}

/// A granted print.
#[derive(Debug)]
pub struct PrintReceipt {
    /// The link, now `Printed`.
    pub link: SharedLink,
    /// Pending auto-delete, when the document deletes itself after printing.
    pub deletion: Option<DeletionHandle>,
}

/// Evaluates view and print requests against a link's state.
#[derive(Debug, Clone)]
pub struct AccessGate {
    lifecycle: LinkLifecycle,
    documents: DocumentRepository,
    access_logs: AccessLogRepository,
    reaper: Reaper,
    hasher: Arc<PinHasher>,
    config: ShareConfig,
}

impl AccessGate {
    /// Create an access gate.
    pub fn new(
        lifecycle: LinkLifecycle,
        documents: DocumentRepository,
        access_logs: AccessLogRepository,
        reaper: Reaper,
        hasher: Arc<PinHasher>,
        config: ShareConfig,
    ) -> Self {
        Self {
            lifecycle,
            documents,
            access_logs,
            reaper,
            hasher,
            config,
        }
    }

    fn clock(&self) -> &Arc<dyn Clock> {
        self.lifecycle.clock()
    }

    /// Resolve a link and check it is usable.
    ///
    /// In order: the link must exist, be `Active` once expiry is
    /// reconciled, and still have its document.
    pub async fn open(&self, link_id: LinkId) -> Result<AccessSession, AccessError> {
        let link = self.lifecycle.load(link_id).await?;

        if !link.is_active() {
            info!(%link_id, status = %link.status, "Access refused for inactive link");
            return Err(AccessError::LinkNotActive(link.status));
        }

        let document = self
            .documents
            .find_by_id(link.document_id)
            .await?
            .ok_or(AccessError::DocumentMissing)?;

        let pin = if link.pin_required {
            PinState::Unverified
        } else {
            PinState::Verified
        };

        Ok(AccessSession {
            link,
            document,
            pin,
            viewed: false,
            printed: false,
            deletion_scheduled: false,
        })
    }

    /// Check a PIN attempt. A wrong PIN changes nothing on the link and
    /// may be retried without limit.
    pub async fn verify_pin(
        &self,
        session: &mut AccessSession,
        pin: &str,
    ) -> Result<(), AccessError> {
        if session.is_verified() {
            return Ok(());
        }

        let hash = session.link.pin_hash.as_deref().ok_or_else(|| {
            AccessError::Internal(prishare_core::AppError::internal(
                "PIN-protected link has no stored PIN hash",
            ))
        })?;

        if self.hasher.verify_pin(pin, hash)? {
            session.pin = PinState::Verified;
            return Ok(());
        }

        warn!(link_id = %session.link.id, "Incorrect PIN");
        self.record(session.link.id, AccessType::View, false).await;
        Err(AccessError::PinIncorrect)
    }

    /// Grant view access.
    ///
    /// Stamps `last_accessed_at`. For an unprotected document that deletes
    /// itself after viewing, the deletion is scheduled here.
    pub async fn view(&self, session: &mut AccessSession) -> Result<ViewGrant, AccessError> {
        if !session.is_verified() {
            return Err(AccessError::PinRequired);
        }

        let link = self.lifecycle.touch(session.link.id).await?;
        session.link = link.clone();
        session.viewed = true;
        self.record(link.id, AccessType::View, true).await;
        info!(link_id = %link.id, "View granted");

        let deletion = if session.document.auto_delete_after_view
            && !link.pin_required
            && !session.deletion_scheduled
        {
            session.deletion_scheduled = true;
            Some(
                self.reaper
                    .schedule(
                        link.document_id,
                        link.id,
                        Duration::from_millis(self.config.view_auto_delete_delay_ms),
                    )
                    .await,
            )
        } else {
            None
        };

        Ok(ViewGrant {
            link,
            document: session.document.clone(),
            deletion,
        })
    }

    /// Grant the single print.
    ///
    /// The link is re-read first, so a second print from the same or another
    /// session is refused with `LinkNotActive(Printed)`.
    pub async fn print(&self, session: &mut AccessSession) -> Result<PrintReceipt, AccessError> {
        if !session.is_verified() {
            return Err(AccessError::PinRequired);
        }

        let link = self.lifecycle.print(session.link.id).await?;
        session.link = link.clone();
        session.printed = true;
        self.record(link.id, AccessType::Print, true).await;

        let deletion = if session.document.auto_delete_after_print && !session.deletion_scheduled {
            session.deletion_scheduled = true;
            Some(
                self.reaper
                    .schedule(
                        link.document_id,
                        link.id,
                        Duration::from_millis(self.config.print_auto_delete_delay_ms),
                    )
                    .await,
            )
        } else {
            None
        };

        Ok(PrintReceipt { link, deletion })
    }

    /// End the session, as when the recipient leaves the page.
    ///
    /// A document that deletes itself after viewing, viewed but not
    /// printed, is deleted now.
    pub async fn close(&self, session: AccessSession) -> Result<(), AccessError> {
        if session.document.auto_delete_after_view && session.has_viewed() && !session.has_printed()
        {
            self.reaper
                .ensure_deleted(session.document.id, session.link.id)
                .await?;
        }
        Ok(())
    }

    /// Append to the access log. Runs after the link change it describes
    /// is persisted, so a failed write is logged and otherwise ignored.
    async fn record(&self, link_id: LinkId, access_type: AccessType, success: bool) {
        let entry = AccessLog::new(link_id, access_type, success, self.clock().now());
        if let Err(e) = self.access_logs.append(&entry).await {
            warn!(%link_id, %access_type, error = %e, "Failed to write access log");
        }
    }
}
