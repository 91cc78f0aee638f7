//! Settings read, update, and reset.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use prishare_core::config::share::ShareConfig;
use prishare_core::error::AppError;
use prishare_core::result::AppResult;
use prishare_core::traits::clock::Clock;
use prishare_database::repositories::SettingsRepository;
use prishare_entity::link::ColorMode;
use prishare_entity::settings::{Theme, UserSettings};

/// Partial update of the user settings. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UpdateSettingsRequest {
    /// Default colour mode.
    pub default_print_mode: Option<ColorMode>,
    /// Default copies.
    pub default_copies: Option<u32>,
    /// Default expiry in hours.
    pub default_expiry_hours: Option<u32>,
    /// Default watermark; `Some(None)` clears it.
    pub default_watermark: Option<Option<String>>,
    /// Contact address; `Some(None)` clears it.
    pub notification_email: Option<Option<String>>,
    /// UI theme.
    pub theme: Option<Theme>,
}

/// Reads and writes the singleton settings record.
///
/// Saved defaults must be values a share could be created with, so the
/// share limits are checked here as well as at share time.
#[derive(Debug, Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    clock: Arc<dyn Clock>,
    limits: ShareConfig,
}

impl SettingsService {
    /// Create a settings service.
    pub fn new(repo: SettingsRepository, clock: Arc<dyn Clock>, limits: ShareConfig) -> Self {
        Self {
            repo,
            clock,
            limits,
        }
    }

    /// Stored settings, or the factory defaults if none were saved.
    pub async fn get(&self) -> AppResult<UserSettings> {
        Ok(self
            .repo
            .find()
            .await?
            .unwrap_or_else(|| UserSettings::defaults(self.clock.now())))
    }

    /// Apply a partial update and save.
    pub async fn update(&self, req: UpdateSettingsRequest) -> AppResult<UserSettings> {
        let mut settings = self.get().await?;

        if let Some(mode) = req.default_print_mode {
            settings.default_print_mode = mode;
        }
        if let Some(copies) = req.default_copies {
            settings.default_copies = copies;
        }
        if let Some(hours) = req.default_expiry_hours {
            settings.default_expiry_hours = hours;
        }
        if let Some(watermark) = req.default_watermark {
            settings.default_watermark = watermark.filter(|w| !w.is_empty());
        }
        if let Some(email) = req.notification_email {
            settings.notification_email = email.filter(|e| !e.is_empty());
        }
        if let Some(theme) = req.theme {
            settings.theme = theme;
        }

        settings
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid settings: {e}")))?;
        self.check_limits(&settings)?;
        settings.updated_at = self.clock.now();

        let saved = self.repo.save(&settings).await?;
        info!("Settings updated");
        Ok(saved)
    }

    fn check_limits(&self, settings: &UserSettings) -> AppResult<()> {
        if settings.default_copies > self.limits.max_copies {
            return Err(AppError::validation(format!(
                "Default copies must be between 1 and {}",
                self.limits.max_copies
            )));
        }
        if !self
            .limits
            .allowed_expiry_hours
            .contains(&settings.default_expiry_hours)
        {
            return Err(AppError::validation(format!(
                "Default expiry of {} hours is not one of {:?}",
                settings.default_expiry_hours, self.limits.allowed_expiry_hours
            )));
        }
        if let Some(w) = &settings.default_watermark
            && w.chars().count() > self.limits.max_watermark_length
        {
            return Err(AppError::validation(format!(
                "Default watermark must be at most {} characters",
                self.limits.max_watermark_length
            )));
        }
        Ok(())
    }

    /// Restore and save the factory defaults.
    pub async fn reset(&self) -> AppResult<UserSettings> {
        let defaults = UserSettings::defaults(self.clock.now());
        let saved = self.repo.save(&defaults).await?;
        info!("Settings reset to defaults");
        Ok(saved)
    }
}
