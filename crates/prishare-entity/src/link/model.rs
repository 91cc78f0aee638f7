//! Shared link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prishare_core::types::{DocumentId, LinkId};

use super::print::PrintSettings;
use super::status::LinkStatus;
use crate::document::Document;

/// A shareable, access-gated reference to a document.
///
/// `pin_hash` is present exactly when `pin_required` is set; use
/// [`SharedLink::new`] to build one so the pairing holds. `version` is the
/// optimistic-concurrency counter the link repository checks on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLink {
    /// Unique link identifier; also the recipient's only credential.
    pub id: LinkId,
    /// The document this link grants access to.
    pub document_id: DocumentId,
    /// Whether a PIN must be verified before viewing.
    pub pin_required: bool,
    /// Salted one-way hash of the PIN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_hash: Option<String>,
    /// Maximum number of prints.
    pub max_uses: u32,
    /// Prints performed so far.
    pub use_count: u32,
    /// Lifecycle status.
    pub status: LinkStatus,
    /// Requested print settings.
    pub print_settings: PrintSettings,
    /// Sender contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// Last successful view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// When the link was printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printed_at: Option<DateTime<Utc>>,
    /// When the link was revoked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    /// Snapshot of the document taken at share time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    /// Optimistic concurrency version, bumped on every stored update.
    #[serde(default)]
    pub version: u64,
}

impl SharedLink {
    /// Create an active, unused, single-print link for `document`.
    pub fn new(
        document: &Document,
        pin_hash: Option<String>,
        print_settings: PrintSettings,
        sender_email: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LinkId::new(),
            document_id: document.id,
            pin_required: pin_hash.is_some(),
            pin_hash,
            max_uses: 1,
            use_count: 0,
            status: LinkStatus::Active,
            print_settings,
            sender_email,
            created_at: now,
            last_accessed_at: None,
            printed_at: None,
            revoked_at: None,
            document: Some(document.clone()),
            version: 0,
        }
    }

    /// Whether the link is still usable.
    pub fn is_active(&self) -> bool {
        self.status == LinkStatus::Active
    }

    /// Expiry instant, taken from the embedded document snapshot.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.document.as_ref().map(|d| d.expires_at)
    }

    /// Whether every permitted print has been used.
    pub fn uses_exhausted(&self) -> bool {
        self.use_count >= self.max_uses
    }

    /// Display name of the linked file.
    pub fn file_name(&self) -> &str {
        self.document
            .as_ref()
            .map(|d| d.file_name.as_str())
            .unwrap_or("Unknown file")
    }
}
