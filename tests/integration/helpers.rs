//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use prishare_core::config::AppConfig;
use prishare_core::traits::clock::{Clock, ManualClock};
use prishare_database::Database;
use prishare_database::repositories::{AccessLogRepository, DocumentRepository, LinkRepository};
use prishare_service::{AppServices, CreateShareRequest, ShareCreated};
use prishare_store::StoreKeys;
use prishare_store::file::FileStore;
use prishare_store::memory::MemoryStore;

/// Test application context
pub struct TestApp {
    /// Wired services under test
    pub services: AppServices,
    /// Clock every service reads
    pub clock: Arc<ManualClock>,
    /// Raw store behind the repositories
    pub store: MemoryStore,
    /// Link repository for direct inspection
    pub links: LinkRepository,
    /// Document repository for direct inspection
    pub documents: DocumentRepository,
    /// Access log repository for direct inspection
    pub access_logs: AccessLogRepository,
    /// Application config
    pub config: AppConfig,
}

/// Fixed start instant for every test.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

impl TestApp {
    /// Create a test application with auto-delete running immediately
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.store.provider = "memory".into();
        config.share.print_auto_delete_delay_ms = 0;
        config.share.view_auto_delete_delay_ms = 0;
        Self::with_config(config)
    }

    /// Create a test application with an explicit config
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        let clock = Arc::new(ManualClock::new(t0()));
        let db = Database::new(Arc::new(store.clone()), StoreKeys::new(config.store.key_prefix.clone()));

        Self {
            services: AppServices::new(db.clone(), &config, clock.clone()),
            links: LinkRepository::new(db.clone()),
            documents: DocumentRepository::new(db.clone()),
            access_logs: AccessLogRepository::new(db),
            clock,
            store,
            config,
        }
    }

    /// Move the shared clock forward
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Current test time
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Share with the given request
    pub async fn share(&self, req: CreateShareRequest) -> ShareCreated {
        self.services
            .shares
            .create_share(req)
            .await
            .expect("Failed to create share")
    }
}

/// A valid one-hour, print-once PDF share request with no PIN
pub fn pdf_request() -> CreateShareRequest {
    CreateShareRequest {
        file_name: "contract.pdf".into(),
        file_type: "application/pdf".into(),
        content: b"%PDF-1.7 test".to_vec(),
        expiry_hours: Some(1),
        auto_delete_after_print: Some(true),
        auto_delete_after_view: Some(false),
        ..Default::default()
    }
}

/// The same request protected by `pin`
pub fn pin_request(pin: &str) -> CreateShareRequest {
    CreateShareRequest {
        pin: Some(pin.into()),
        ..pdf_request()
    }
}

/// Services over a JSON-file store in `dir`, with their own store handle
/// and write lock, the way a separate CLI process would open them
pub async fn file_services(dir: &Path, config: &AppConfig, clock: Arc<ManualClock>) -> AppServices {
    let store = FileStore::new(dir).await.expect("Failed to open file store");
    let db = Database::new(Arc::new(store), StoreKeys::new(config.store.key_prefix.clone()));
    AppServices::new(db, config, clock)
}
