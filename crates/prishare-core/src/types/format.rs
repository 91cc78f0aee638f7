//! Formatting and expiry helpers shared by services and the CLI.

use chrono::{DateTime, Utc};

use super::id::LinkId;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable file size in base-1024 units, rounded to two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

/// Coarse "time ago" label for `then` as seen from `now`.
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else if minutes > 0 {
        format!("{minutes}m ago")
    } else {
        "Just now".to_string()
    }
}

/// Whether an expiry instant lies strictly before `now`.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at < now
}

/// The recipient-facing URL for a link: `{origin}/view/{linkId}`.
pub fn share_url(origin: &str, link_id: LinkId) -> String {
    format!("{}/view/{link_id}", origin.trim_end_matches('/'))
}
