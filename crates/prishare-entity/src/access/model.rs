//! Access log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use prishare_core::types::{AccessLogId, LinkId};

/// Kind of access attempted on a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// Viewing the document (including PIN attempts).
    View,
    /// Printing the document.
    Print,
    /// An attempt to obtain the raw file.
    DownloadAttempt,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Print => write!(f, "print"),
            Self::DownloadAttempt => write!(f, "download_attempt"),
        }
    }
}

/// One recorded access attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLog {
    /// Unique entry identifier.
    pub id: AccessLogId,
    /// The link that was accessed.
    pub shared_link_id: LinkId,
    /// What was attempted.
    pub access_type: AccessType,
    /// Client address, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Client user agent, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Whether the attempt was granted.
    pub success: bool,
    /// When the attempt happened.
    pub created_at: DateTime<Utc>,
}

impl AccessLog {
    /// Record an attempt of `access_type` on `link_id`.
    pub fn new(link_id: LinkId, access_type: AccessType, success: bool, now: DateTime<Utc>) -> Self {
        Self {
            id: AccessLogId::new(),
            shared_link_id: link_id,
            access_type,
            ip_address: None,
            user_agent: None,
            success,
            created_at: now,
        }
    }
}
