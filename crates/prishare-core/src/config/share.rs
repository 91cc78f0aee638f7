//! Share creation and auto-delete configuration.

use serde::{Deserialize, Serialize};

/// Share link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Origin used to build share URLs (`{origin}/view/{linkId}`).
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Delay before a printed document with auto-delete is removed.
    #[serde(default = "default_print_delay")]
    pub print_auto_delete_delay_ms: u64,
    /// Delay before a viewed document with auto-delete-after-view is removed.
    #[serde(default = "default_view_delay")]
    pub view_auto_delete_delay_ms: u64,
    /// Upper bound for requested print copies.
    #[serde(default = "default_max_copies")]
    pub max_copies: u32,
    /// Maximum watermark text length in characters.
    #[serde(default = "default_max_watermark")]
    pub max_watermark_length: usize,
    /// Expiry windows a share may choose from, in hours.
    #[serde(default = "default_expiry_hours")]
    pub allowed_expiry_hours: Vec<u32>,
    /// MIME types accepted for upload.
    #[serde(default = "default_file_types")]
    pub accepted_file_types: Vec<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            print_auto_delete_delay_ms: default_print_delay(),
            view_auto_delete_delay_ms: default_view_delay(),
            max_copies: default_max_copies(),
            max_watermark_length: default_max_watermark(),
            allowed_expiry_hours: default_expiry_hours(),
            accepted_file_types: default_file_types(),
        }
    }
}

impl ShareConfig {
    /// Whether the given MIME type may be shared.
    pub fn accepts(&self, mime_type: &str) -> bool {
        self.accepted_file_types.iter().any(|t| t == mime_type)
    }
}

fn default_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_print_delay() -> u64 {
    2000
}

fn default_view_delay() -> u64 {
    1000
}

fn default_max_copies() -> u32 {
    10
}

fn default_max_watermark() -> usize {
    50
}

fn default_expiry_hours() -> Vec<u32> {
    vec![1, 6, 24, 72, 168]
}

fn default_file_types() -> Vec<String> {
    [
        "application/pdf",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "application/vnd.ms-powerpoint",
        "application/msword",
        "image/png",
        "image/jpeg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
