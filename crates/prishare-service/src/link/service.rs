//! Share creation and link management.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::info;
use validator::Validate;

use prishare_auth::{PinHasher, PinValidator};
use prishare_core::config::ShareConfig;
use prishare_core::error::AppError;
use prishare_core::result::AppResult;
use prishare_core::types::{LinkId, share_url};
use prishare_database::repositories::{AccessLogRepository, DocumentRepository, LinkRepository};
use prishare_entity::access::AccessLog;
use prishare_entity::document::{Document, NewDocument};
use prishare_entity::link::{ColorMode, PrintSettings, SharedLink};

use super::lifecycle::LinkLifecycle;
use super::reaper::Reaper;
use crate::error::AccessError;
use crate::settings::SettingsService;

/// Request to share a file. Unset options fall back to the user settings.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateShareRequest {
    /// Original file name.
    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,
    /// MIME type of the file.
    pub file_type: String,
    /// File bytes.
    pub content: Vec<u8>,
    /// Colour mode.
    pub color: Option<ColorMode>,
    /// Copies to print.
    pub copies: Option<u32>,
    /// Page selection, `"all"` by default.
    pub pages: Option<String>,
    /// Watermark text.
    pub watermark_text: Option<String>,
    /// PIN; setting one makes the link PIN-protected.
    pub pin: Option<String>,
    /// Delete after print (default on).
    pub auto_delete_after_print: Option<bool>,
    /// Delete after view (default off).
    pub auto_delete_after_view: Option<bool>,
    /// Link lifetime in hours.
    pub expiry_hours: Option<u32>,
    /// Sender contact address.
    #[validate(email(message = "Please enter a valid email address"))]
    pub sender_email: Option<String>,
}

/// A newly created share.
#[derive(Debug, Clone)]
pub struct ShareCreated {
    /// The stored link.
    pub link: SharedLink,
    /// The stored document.
    pub document: Document,
    /// URL to hand to the recipient.
    pub url: String,
}

/// Sender-side operations: create, list, revoke, delete.
#[derive(Debug, Clone)]
pub struct ShareService {
    lifecycle: LinkLifecycle,
    links: LinkRepository,
    documents: DocumentRepository,
    access_logs: AccessLogRepository,
    reaper: Reaper,
    settings: SettingsService,
    hasher: Arc<PinHasher>,
    pin_validator: PinValidator,
    config: ShareConfig,
}

impl ShareService {
    /// Creates a new share service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lifecycle: LinkLifecycle,
        links: LinkRepository,
        documents: DocumentRepository,
        access_logs: AccessLogRepository,
        reaper: Reaper,
        settings: SettingsService,
        hasher: Arc<PinHasher>,
        pin_validator: PinValidator,
        config: ShareConfig,
    ) -> Self {
        Self {
            lifecycle,
            links,
            documents,
            access_logs,
            reaper,
            settings,
            hasher,
            pin_validator,
            config,
        }
    }

    /// Store a document and a fresh single-print link to it.
    pub async fn create_share(&self, req: CreateShareRequest) -> AppResult<ShareCreated> {
        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid share request: {e}")))?;

        if !self.config.accepts(&req.file_type) {
            return Err(AppError::validation(format!(
                "File type not supported: {}",
                req.file_type
            )));
        }
        if req.content.is_empty() {
            return Err(AppError::validation("File is empty"));
        }

        let defaults = self.settings.get().await?;

        let copies = req.copies.unwrap_or(defaults.default_copies);
        if copies == 0 || copies > self.config.max_copies {
            return Err(AppError::validation(format!(
                "Copies must be between 1 and {}",
                self.config.max_copies
            )));
        }

        let expiry_hours = req.expiry_hours.unwrap_or(defaults.default_expiry_hours);
        if !self.config.allowed_expiry_hours.contains(&expiry_hours) {
            return Err(AppError::validation(format!(
                "Expiry of {expiry_hours} hours is not allowed"
            )));
        }

        let watermark_text = req
            .watermark_text
            .or(defaults.default_watermark)
            .filter(|w| !w.is_empty());
        if let Some(w) = &watermark_text
            && w.chars().count() > self.config.max_watermark_length
        {
            return Err(AppError::validation(format!(
                "Watermark must be at most {} characters",
                self.config.max_watermark_length
            )));
        }

        let pin_hash = match req.pin.as_deref() {
            Some(pin) => {
                self.pin_validator.validate(pin)?;
                Some(self.hasher.hash_pin(pin)?)
            }
            None => None,
        };

        let now = self.lifecycle.clock().now();
        let document = NewDocument {
            storage_path: format!("data:{};base64,{}", req.file_type, STANDARD.encode(&req.content)),
            file_size: req.content.len() as u64,
            file_name: req.file_name,
            file_type: req.file_type,
            watermark_text,
            auto_delete_after_print: req.auto_delete_after_print.unwrap_or(true),
            auto_delete_after_view: req.auto_delete_after_view.unwrap_or(false),
            expiry_hours,
        }
        .into_document(now);

        let print_settings = PrintSettings {
            color: req.color.unwrap_or(defaults.default_print_mode),
            copies,
            pages: req.pages.unwrap_or_else(|| "all".to_string()),
        };
        let sender_email = req
            .sender_email
            .or(defaults.notification_email)
            .filter(|e| !e.is_empty());

        let document = self.documents.put(&document).await?;
        let link = SharedLink::new(&document, pin_hash, print_settings, sender_email, now);
        let link = self.links.put(&link).await?;

        info!(
            link_id = %link.id,
            document_id = %document.id,
            file_type = %document.file_type,
            pin_required = link.pin_required,
            expiry_hours,
            "Share created"
        );

        Ok(ShareCreated {
            url: self.share_url(link.id),
            link,
            document,
        })
    }

    /// Every link, newest first, with expiry reconciled.
    pub async fn list_links(&self) -> AppResult<Vec<SharedLink>> {
        self.lifecycle.list().await
    }

    /// One link, with expiry reconciled.
    pub async fn get_link(&self, id: LinkId) -> AppResult<SharedLink> {
        self.lifecycle.load(id).await.map_err(|e| match e {
            AccessError::LinkNotFound => AppError::not_found(format!("Link {id} not found")),
            other => other.into(),
        })
    }

    /// Withdraw an active link.
    pub async fn revoke_link(&self, id: LinkId) -> AppResult<SharedLink> {
        self.lifecycle.revoke(id).await.map_err(|e| match e {
            AccessError::LinkNotFound => AppError::not_found(format!("Link {id} not found")),
            other => other.into(),
        })
    }

    /// Delete a link together with its document.
    pub async fn delete_link(&self, id: LinkId) -> AppResult<()> {
        let link = self
            .links
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Link {id} not found")))?;
        self.reaper.ensure_deleted(link.document_id, link.id).await
    }

    /// Delete every link and document. Returns the number of links removed.
    pub async fn clear_history(&self) -> AppResult<usize> {
        let links = self.links.list().await?;
        for link in &links {
            self.reaper.ensure_deleted(link.document_id, link.id).await?;
        }
        for document in self.documents.list().await? {
            self.documents.delete(document.id).await?;
        }

        info!(links_removed = links.len(), "History cleared");
        Ok(links.len())
    }

    /// Access attempts recorded for a link, oldest first.
    pub async fn access_log(&self, id: LinkId) -> AppResult<Vec<AccessLog>> {
        self.access_logs.list_for_link(id).await
    }

    /// Recipient URL for a link.
    pub fn share_url(&self, id: LinkId) -> String {
        share_url(&self.config.origin, id)
    }
}
