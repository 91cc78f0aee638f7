//! Service wiring.

use std::sync::Arc;

use prishare_auth::{PinHasher, PinValidator};
use prishare_core::config::AppConfig;
use prishare_core::traits::clock::Clock;
use prishare_database::Database;
use prishare_database::repositories::{
    AccessLogRepository, DocumentRepository, LinkRepository, SettingsRepository,
};

use crate::link::{AccessGate, LinkLifecycle, Reaper, ShareService};
use crate::settings::SettingsService;

/// Every service, built over one [`Database`] so they share its write lock.
#[derive(Debug, Clone)]
pub struct AppServices {
    /// Sender-side share management.
    pub shares: ShareService,
    /// Recipient-side access gate.
    pub gate: AccessGate,
    /// User settings.
    pub settings: SettingsService,
    /// Lifecycle driver, for callers that need raw transitions.
    pub lifecycle: LinkLifecycle,
}

impl AppServices {
    /// Wire up services from configuration.
    pub fn new(db: Database, config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let links = LinkRepository::new(db.clone());
        let documents = DocumentRepository::new(db.clone());
        let access_logs = AccessLogRepository::new(db.clone());
        let settings_repo = SettingsRepository::new(db);

        let hasher = Arc::new(PinHasher::new());
        let lifecycle = LinkLifecycle::new(links.clone(), documents.clone(), clock.clone());
        let reaper = Reaper::new(links.clone(), documents.clone(), access_logs.clone());
        let settings = SettingsService::new(settings_repo, clock, config.share.clone());

        let gate = AccessGate::new(
            lifecycle.clone(),
            documents.clone(),
            access_logs.clone(),
            reaper.clone(),
            hasher.clone(),
            config.share.clone(),
        );
        let shares = ShareService::new(
            lifecycle.clone(),
            links,
            documents,
            access_logs,
            reaper,
            settings.clone(),
            hasher,
            PinValidator::new(&config.security),
            config.share.clone(),
        );

        Self {
            shares,
            gate,
            settings,
            lifecycle,
        }
    }
}
