//! Integration tests for the access gate: PIN flow, view, print, and
//! auto-delete after view.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;

use prishare_core::error::{AppError, ErrorKind};
use prishare_core::result::AppResult;
use prishare_core::traits::clock::ManualClock;
use prishare_core::traits::store::KeyValueStore;
use prishare_core::types::LinkId;
use prishare_database::Database;
use prishare_entity::access::AccessType;
use prishare_entity::document::NewDocument;
use prishare_entity::link::{LinkStatus, PrintSettings, SharedLink};
use prishare_service::{AccessError, AppServices, CreateShareRequest, PinState};
use prishare_store::StoreKeys;
use prishare_store::memory::MemoryStore;

use helpers::{TestApp, pdf_request, pin_request, t0};

#[tokio::test]
async fn test_unknown_link_is_not_found() {
    let app = TestApp::new();
    let err = app.services.gate.open(LinkId::new()).await.unwrap_err();
    assert!(matches!(err, AccessError::LinkNotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_link_without_document_is_document_missing() {
    let app = TestApp::new();
    let orphan = NewDocument {
        file_name: "gone.pdf".into(),
        file_type: "application/pdf".into(),
        file_size: 1,
        storage_path: "data:application/pdf;base64,AA==".into(),
        watermark_text: None,
        auto_delete_after_print: true,
        auto_delete_after_view: false,
        expiry_hours: 24,
    }
    .into_document(app.now());
    let link = SharedLink::new(&orphan, None, PrintSettings::default(), None, app.now());
    app.links.put(&link).await.unwrap();

    let err = app.services.gate.open(link.id).await.unwrap_err();
    assert!(matches!(err, AccessError::DocumentMissing));
}

#[tokio::test]
async fn test_wrong_pin_then_right_pin() {
    let app = TestApp::new();
    let created = app.share(pin_request("1234")).await;
    let gate = &app.services.gate;

    let mut session = gate.open(created.link.id).await.unwrap();
    assert_eq!(session.pin_state(), PinState::Unverified);
    assert!(matches!(
        gate.view(&mut session).await.unwrap_err(),
        AccessError::PinRequired
    ));

    let err = gate.verify_pin(&mut session, "0000").await.unwrap_err();
    assert!(matches!(err, AccessError::PinIncorrect));
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(err.is_retryable());

    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.status, LinkStatus::Active);
    assert_eq!(stored.use_count, 0);
    assert!(stored.printed_at.is_none());

    gate.verify_pin(&mut session, "1234").await.unwrap();
    let grant = gate.view(&mut session).await.unwrap();
    assert_eq!(grant.link.status, LinkStatus::Active);
    assert_eq!(grant.link.use_count, 0);
}

#[tokio::test]
async fn test_pin_retries_are_unlimited() {
    let app = TestApp::new();
    let created = app.share(pin_request("482913")).await;
    let gate = &app.services.gate;
    let mut session = gate.open(created.link.id).await.unwrap();

    for _ in 0..10 {
        assert!(gate.verify_pin(&mut session, "000000").await.is_err());
    }
    gate.verify_pin(&mut session, "482913").await.unwrap();
    assert!(session.is_verified());

    let failures = app
        .access_logs
        .list_for_link(created.link.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|e| !e.success)
        .count();
    assert_eq!(failures, 10);
}

#[tokio::test]
async fn test_verification_does_not_survive_reopen() {
    let app = TestApp::new();
    let created = app.share(pin_request("1234")).await;
    let gate = &app.services.gate;

    let mut first = gate.open(created.link.id).await.unwrap();
    gate.verify_pin(&mut first, "1234").await.unwrap();
    gate.view(&mut first).await.unwrap();

    let mut second = gate.open(created.link.id).await.unwrap();
    assert!(!second.is_verified());
    assert!(matches!(
        gate.print(&mut second).await.unwrap_err(),
        AccessError::PinRequired
    ));
}

#[tokio::test]
async fn test_unprotected_link_is_verified_on_open() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;
    let session = app.services.gate.open(created.link.id).await.unwrap();
    assert_eq!(session.pin_state(), PinState::Verified);
}

#[tokio::test]
async fn test_view_stamps_last_accessed_and_logs() {
    let app = TestApp::new();
    let created = app.share(CreateShareRequest {
        sender_email: Some("sender@example.com".into()),
        auto_delete_after_print: Some(false),
        ..pdf_request()
    })
    .await;
    let gate = &app.services.gate;

    app.advance(chrono::Duration::minutes(10));
    let mut session = gate.open(created.link.id).await.unwrap();
    let grant = gate.view(&mut session).await.unwrap();
    assert_eq!(grant.link.last_accessed_at, Some(app.now()));
    assert_eq!(grant.sender_contact(), Some("sender@example.com"));
    assert_eq!(grant.document.file_name, "contract.pdf");

    gate.print(&mut session).await.unwrap();

    let entries = app.access_logs.list_for_link(created.link.id).await.unwrap();
    let kinds: Vec<_> = entries.iter().map(|e| (e.access_type, e.success)).collect();
    assert_eq!(kinds, vec![(AccessType::View, true), (AccessType::Print, true)]);
}

#[tokio::test]
async fn test_no_contact_when_sender_email_absent() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;
    let mut session = app.services.gate.open(created.link.id).await.unwrap();
    let grant = app.services.gate.view(&mut session).await.unwrap();
    assert_eq!(grant.sender_contact(), None);
}

#[tokio::test]
async fn test_second_print_in_same_session_is_refused() {
    let app = TestApp::new();
    let created = app.share(CreateShareRequest {
        auto_delete_after_print: Some(false),
        ..pdf_request()
    })
    .await;
    let gate = &app.services.gate;
    let mut session = gate.open(created.link.id).await.unwrap();

    gate.print(&mut session).await.unwrap();
    let err = gate.print(&mut session).await.unwrap_err();
    assert!(matches!(err, AccessError::LinkNotActive(LinkStatus::Printed)));

    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.use_count, 1);
}

#[tokio::test]
async fn test_auto_delete_after_view_without_pin() {
    let app = TestApp::new();
    let created = app.share(CreateShareRequest {
        auto_delete_after_view: Some(true),
        ..pdf_request()
    })
    .await;

    let mut session = app.services.gate.open(created.link.id).await.unwrap();
    let grant = app.services.gate.view(&mut session).await.unwrap();
    grant.deletion.expect("auto-delete scheduled").wait().await.unwrap();

    assert!(app.links.find_by_id(created.link.id).await.unwrap().is_none());
    assert!(app.documents.find_by_id(created.document.id).await.unwrap().is_none());
    app.services.gate.close(session).await.unwrap();
}

#[tokio::test]
async fn test_auto_delete_after_view_with_pin_waits_for_close() {
    let app = TestApp::new();
    let created = app.share(CreateShareRequest {
        auto_delete_after_view: Some(true),
        ..pin_request("1234")
    })
    .await;
    let gate = &app.services.gate;

    let mut session = gate.open(created.link.id).await.unwrap();
    gate.verify_pin(&mut session, "1234").await.unwrap();
    let grant = gate.view(&mut session).await.unwrap();
    assert!(grant.deletion.is_none());
    assert!(app.links.find_by_id(created.link.id).await.unwrap().is_some());

    gate.close(session).await.unwrap();
    assert!(app.links.find_by_id(created.link.id).await.unwrap().is_none());
    assert!(app.documents.find_by_id(created.document.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_close_without_view_keeps_document() {
    let app = TestApp::new();
    let created = app.share(CreateShareRequest {
        auto_delete_after_view: Some(true),
        ..pin_request("1234")
    })
    .await;

    let session = app.services.gate.open(created.link.id).await.unwrap();
    app.services.gate.close(session).await.unwrap();
    assert!(app.links.find_by_id(created.link.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_close_after_print_does_not_delete_for_view_policy() {
    let app = TestApp::new();
    let created = app.share(CreateShareRequest {
        auto_delete_after_view: Some(true),
        auto_delete_after_print: Some(false),
        ..pin_request("1234")
    })
    .await;
    let gate = &app.services.gate;

    let mut session = gate.open(created.link.id).await.unwrap();
    gate.verify_pin(&mut session, "1234").await.unwrap();
    gate.view(&mut session).await.unwrap();
    gate.print(&mut session).await.unwrap();
    gate.close(session).await.unwrap();

    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.status, LinkStatus::Printed);
}

/// Memory store that refuses every write to the access log key.
#[derive(Debug, Default)]
struct BrokenLogStore {
    inner: MemoryStore,
}

impl BrokenLogStore {
    fn check(key: &str) -> AppResult<()> {
        if key.ends_with("access_logs") {
            return Err(AppError::storage("access log volume is full"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for BrokenLogStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        Self::check(key)?;
        self.inner.set(key, value).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> AppResult<bool> {
        Self::check(key)?;
        self.inner.compare_and_set(key, expected, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        Self::check(key)?;
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

fn services_without_access_log() -> AppServices {
    let config = TestApp::new().config;
    let db = Database::new(
        Arc::new(BrokenLogStore::default()),
        StoreKeys::new(config.store.key_prefix.clone()),
    );
    AppServices::new(db, &config, Arc::new(ManualClock::new(t0())))
}

#[tokio::test]
async fn test_print_auto_delete_survives_access_log_failure() {
    let services = services_without_access_log();
    let created = services.shares.create_share(pdf_request()).await.unwrap();

    let mut session = services.gate.open(created.link.id).await.unwrap();
    let receipt = services.gate.print(&mut session).await.unwrap();
    assert_eq!(receipt.link.status, LinkStatus::Printed);
    receipt
        .deletion
        .expect("auto-delete scheduled")
        .wait()
        .await
        .unwrap();

    let err = services.shares.get_link(created.link.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_view_auto_delete_survives_access_log_failure() {
    let services = services_without_access_log();
    let created = services
        .shares
        .create_share(CreateShareRequest {
            auto_delete_after_print: Some(false),
            auto_delete_after_view: Some(true),
            ..pdf_request()
        })
        .await
        .unwrap();

    let mut session = services.gate.open(created.link.id).await.unwrap();
    let grant = services.gate.view(&mut session).await.unwrap();
    grant
        .deletion
        .expect("auto-delete scheduled")
        .wait()
        .await
        .unwrap();

    let err = services.gate.open(created.link.id).await.unwrap_err();
    assert!(matches!(err, AccessError::LinkNotFound));
}

#[tokio::test]
async fn test_wrong_pin_is_still_reported_when_log_fails() {
    let services = services_without_access_log();
    let created = services.shares.create_share(pin_request("2468")).await.unwrap();

    let mut session = services.gate.open(created.link.id).await.unwrap();
    let err = services.gate.verify_pin(&mut session, "1111").await.unwrap_err();
    assert!(matches!(err, AccessError::PinIncorrect));
    services.gate.verify_pin(&mut session, "2468").await.unwrap();
    assert!(session.is_verified());
}
