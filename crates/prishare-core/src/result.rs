//! Convenience result type alias for PriShare.

use crate::error::AppError;

/// A specialized `Result` type for PriShare operations.
pub type AppResult<T> = Result<T, AppError>;
