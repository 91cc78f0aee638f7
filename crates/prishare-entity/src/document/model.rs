//! Document entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use prishare_core::types::{DocumentId, is_expired};

/// How a viewer can present a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Rendered inline as an image.
    Image,
    /// Embedded as a PDF.
    Pdf,
    /// No preview; print only.
    Other,
}

/// An uploaded document.
///
/// Never mutated after creation: `expires_at` is fixed when the document
/// is stored and expiry is derived from it on every access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Original file name.
    pub file_name: String,
    /// MIME type of the file.
    pub file_type: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Opaque content handle (a `data:` URI for inlined content).
    pub storage_path: String,
    /// Watermark overlaid on the rendered document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_text: Option<String>,
    /// Delete the document and its link once it has been printed.
    pub auto_delete_after_print: bool,
    /// Delete the document and its link once it has been viewed.
    pub auto_delete_after_view: bool,
    /// Lifetime of the share in hours.
    pub expiry_hours: u32,
    /// When the document was stored.
    pub created_at: DateTime<Utc>,
    /// When links to this document stop working.
    pub expires_at: DateTime<Utc>,
}

impl Document {
    /// Whether the document's expiry instant has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.expires_at, now)
    }

    /// Classify the document for preview purposes.
    pub fn kind(&self) -> DocumentKind {
        if self.file_type.starts_with("image/") {
            DocumentKind::Image
        } else if self.file_type == "application/pdf" {
            DocumentKind::Pdf
        } else {
            DocumentKind::Other
        }
    }
}

/// Data required to create a new document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub file_type: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Opaque content handle.
    pub storage_path: String,
    /// Optional watermark.
    pub watermark_text: Option<String>,
    /// Auto-delete after print.
    pub auto_delete_after_print: bool,
    /// Auto-delete after view.
    pub auto_delete_after_view: bool,
    /// Lifetime in hours.
    pub expiry_hours: u32,
}

impl NewDocument {
    /// Materialise the document at `now`, fixing its expiry instant.
    pub fn into_document(self, now: DateTime<Utc>) -> Document {
        Document {
            id: DocumentId::new(),
            file_name: self.file_name,
            file_type: self.file_type,
            file_size: self.file_size,
            storage_path: self.storage_path,
            watermark_text: self.watermark_text,
            auto_delete_after_print: self.auto_delete_after_print,
            auto_delete_after_view: self.auto_delete_after_view,
            expiry_hours: self.expiry_hours,
            created_at: now,
            expires_at: now + Duration::hours(i64::from(self.expiry_hours)),
        }
    }
}
