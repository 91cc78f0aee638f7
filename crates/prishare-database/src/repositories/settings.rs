//! User settings repository implementation.

use prishare_core::result::AppResult;
use prishare_core::traits::store::KeyValueStoreExt;
use prishare_entity::settings::UserSettings;

use crate::connection::Database;

/// Repository for the singleton user settings record.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: Database,
}

impl SettingsRepository {
    /// Create a new settings repository.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The stored settings, if any were ever saved.
    pub async fn find(&self) -> AppResult<Option<UserSettings>> {
        self.db.store().get_json(&self.db.keys().user_settings()).await
    }

    /// Replace the stored settings.
    pub async fn save(&self, settings: &UserSettings) -> AppResult<UserSettings> {
        let _guard = self.db.write_lock().await;
        self.db
            .store()
            .set_json(&self.db.keys().user_settings(), settings)
            .await?;
        Ok(settings.clone())
    }

    /// Remove the stored settings.
    pub async fn clear(&self) -> AppResult<()> {
        let _guard = self.db.write_lock().await;
        self.db.store().delete(&self.db.keys().user_settings()).await
    }
}
