//! User settings entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::link::ColorMode;

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme.
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

/// Defaults used to seed new shares.
///
/// A singleton record: there is exactly one per store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Owner identifier; always `"default"` for a single-user store.
    pub user_id: String,
    /// Default colour mode.
    pub default_print_mode: ColorMode,
    /// Default number of copies. The upper bound is deployment config.
    #[validate(range(min = 1, message = "Copies must be at least 1"))]
    pub default_copies: u32,
    /// Default link lifetime in hours.
    #[validate(range(min = 1, message = "Expiry must be at least one hour"))]
    pub default_expiry_hours: u32,
    /// Default watermark text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_watermark: Option<String>,
    /// Address recipients can contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Notification email is not a valid address"))]
    pub notification_email: Option<String>,
    /// UI theme.
    pub theme: Theme,
    /// When the settings were first written.
    pub created_at: DateTime<Utc>,
    /// When the settings were last saved.
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Factory defaults: black & white, one copy, 24 hours, light theme.
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            user_id: "default".to_string(),
            default_print_mode: ColorMode::Bw,
            default_copies: 1,
            default_expiry_hours: 24,
            default_watermark: None,
            notification_email: None,
            theme: Theme::Light,
            created_at: now,
            updated_at: now,
        }
    }
}
