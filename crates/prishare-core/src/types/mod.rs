//! Shared value types: typed identifiers and display/expiry helpers.

pub mod format;
pub mod id;

pub use format::{format_file_size, format_relative_time, is_expired, share_url};
pub use id::{AccessLogId, DocumentId, LinkId};
