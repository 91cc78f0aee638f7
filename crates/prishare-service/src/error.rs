//! Access gate outcomes.
//!
//! Every way a recipient's request can be refused is an explicit variant
//! the caller branches on. None of them is fatal.

use thiserror::Error;

use prishare_core::error::{AppError, ErrorKind};
use prishare_entity::link::LinkStatus;

/// Reasons an access attempt on a link is refused.
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    /// No link with the requested ID exists.
    #[error("Link not found")]
    LinkNotFound,
    /// The link is in a terminal state.
    #[error("This link is {0}")]
    LinkNotActive(LinkStatus),
    /// The link exists but its document has been deleted.
    #[error("Document not found")]
    DocumentMissing,
    /// The link is PIN-protected and no PIN has been verified yet.
    #[error("A PIN is required to view this document")]
    PinRequired,
    /// The supplied PIN did not match. Retrying is always allowed.
    #[error("Incorrect PIN. Please try again.")]
    PinIncorrect,
    /// The link kept changing underneath the request.
    #[error("Link was modified concurrently, try again")]
    Conflict,
    /// Store or hashing failure.
    #[error("{0}")]
    Internal(AppError),
}

impl AccessError {
    /// The general error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LinkNotFound | Self::DocumentMissing => ErrorKind::NotFound,
            Self::LinkNotActive(LinkStatus::Expired) => ErrorKind::Expired,
            Self::LinkNotActive(_) => ErrorKind::InvalidState,
            Self::PinRequired | Self::PinIncorrect => ErrorKind::Authentication,
            Self::Conflict => ErrorKind::Conflict,
            Self::Internal(e) => e.kind,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PinIncorrect | Self::Conflict)
    }
}

impl From<AppError> for AccessError {
    fn from(err: AppError) -> Self {
        match err.kind {
            ErrorKind::Conflict => Self::Conflict,
            _ => Self::Internal(err),
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Internal(inner) => inner,
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}
