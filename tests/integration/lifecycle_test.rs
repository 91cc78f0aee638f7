//! Integration tests for the link lifecycle: expiry, print, revoke, and
//! concurrent transitions.

mod helpers;

use std::sync::Arc;

use chrono::Duration;

use prishare_core::error::ErrorKind;
use prishare_core::traits::clock::ManualClock;
use prishare_entity::link::LinkStatus;
use prishare_service::AccessError;

use helpers::{TestApp, file_services, pdf_request, t0};

#[tokio::test]
async fn test_view_then_print_then_auto_delete() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;
    let link_id = created.link.id;

    app.advance(Duration::minutes(30));
    let mut session = app.services.gate.open(link_id).await.unwrap();
    let grant = app.services.gate.view(&mut session).await.unwrap();
    assert_eq!(grant.link.status, LinkStatus::Active);
    assert!(grant.deletion.is_none());

    app.advance(Duration::minutes(1));
    let receipt = app.services.gate.print(&mut session).await.unwrap();
    assert_eq!(receipt.link.status, LinkStatus::Printed);
    assert_eq!(receipt.link.use_count, 1);
    assert_eq!(receipt.link.printed_at, Some(app.now()));
    receipt.deletion.expect("auto-delete scheduled").wait().await.unwrap();

    let err = app.services.gate.open(link_id).await.unwrap_err();
    assert!(matches!(err, AccessError::LinkNotFound));
    assert!(app.documents.find_by_id(created.document.id).await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_printed_state_is_persisted_before_delayed_delete() {
    let mut config = TestApp::new().config;
    config.share.print_auto_delete_delay_ms = 2000;
    let app = TestApp::with_config(config);
    let created = app.share(pdf_request()).await;

    let mut session = app.services.gate.open(created.link.id).await.unwrap();
    let receipt = app.services.gate.print(&mut session).await.unwrap();
    let handle = receipt.deletion.expect("auto-delete scheduled");
    assert!(!handle.is_done());

    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.status, LinkStatus::Printed);
    assert_eq!(stored.use_count, 1);

    handle.wait().await.unwrap();
    assert!(app.links.find_by_id(created.link.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_link_is_reconciled_and_persisted() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;

    app.advance(Duration::hours(2));
    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.status, LinkStatus::Active);

    let err = app.services.gate.open(created.link.id).await.unwrap_err();
    assert!(matches!(err, AccessError::LinkNotActive(LinkStatus::Expired)));
    assert_eq!(err.kind(), ErrorKind::Expired);

    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.status, LinkStatus::Expired);
}

#[tokio::test]
async fn test_listing_reconciles_expiry() {
    let app = TestApp::new();
    let short = app.share(pdf_request()).await;
    let long = app
        .share(prishare_service::CreateShareRequest {
            expiry_hours: Some(24),
            ..pdf_request()
        })
        .await;

    app.advance(Duration::hours(2));
    let links = app.services.shares.list_links().await.unwrap();
    let status_of = |id| links.iter().find(|l| l.id == id).unwrap().status;
    assert_eq!(status_of(short.link.id), LinkStatus::Expired);
    assert_eq!(status_of(long.link.id), LinkStatus::Active);

    let stored = app.links.find_by_id(short.link.id).await.unwrap().unwrap();
    assert_eq!(stored.status, LinkStatus::Expired);
}

#[tokio::test]
async fn test_print_after_expiry_in_open_session_is_refused() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;
    let mut session = app.services.gate.open(created.link.id).await.unwrap();

    app.advance(Duration::minutes(61));
    let err = app.services.gate.print(&mut session).await.unwrap_err();
    assert!(matches!(err, AccessError::LinkNotActive(LinkStatus::Expired)));

    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.use_count, 0);
    assert!(stored.printed_at.is_none());
}

#[tokio::test]
async fn test_revoked_link_cannot_be_printed() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;
    let mut session = app.services.gate.open(created.link.id).await.unwrap();

    let revoked = app.services.shares.revoke_link(created.link.id).await.unwrap();
    assert_eq!(revoked.status, LinkStatus::Revoked);
    assert!(revoked.revoked_at.is_some());

    let err = app.services.gate.print(&mut session).await.unwrap_err();
    assert!(matches!(err, AccessError::LinkNotActive(LinkStatus::Revoked)));
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.use_count, 0);
    assert_eq!(stored.status, LinkStatus::Revoked);
}

#[tokio::test]
async fn test_status_never_returns_to_active() {
    let app = TestApp::new();
    let created = app.share(prishare_service::CreateShareRequest {
        auto_delete_after_print: Some(false),
        ..pdf_request()
    })
    .await;
    let id = created.link.id;

    let mut session = app.services.gate.open(id).await.unwrap();
    app.services.gate.print(&mut session).await.unwrap();

    // Every further operation leaves the terminal status in place.
    assert!(app.services.shares.revoke_link(id).await.is_err());
    assert!(app.services.gate.print(&mut session).await.is_err());
    assert!(app.services.gate.open(id).await.is_err());
    app.advance(Duration::hours(5));
    assert_eq!(
        app.services.shares.get_link(id).await.unwrap().status,
        LinkStatus::Printed
    );

    let stored = app.links.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status, LinkStatus::Printed);
    assert_eq!(stored.use_count, 1);
}

#[tokio::test]
async fn test_revoke_twice_is_invalid_state() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;
    app.services.shares.revoke_link(created.link.id).await.unwrap();

    let err = app.services.shares.revoke_link(created.link.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_prints_grant_exactly_one() {
    let app = TestApp::new();
    let created = app.share(prishare_service::CreateShareRequest {
        auto_delete_after_print: Some(false),
        ..pdf_request()
    })
    .await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let gate = app.services.gate.clone();
        let mut session = gate.open(created.link.id).await.unwrap();
        tasks.push(tokio::spawn(async move { gate.print(&mut session).await }));
    }

    let mut granted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => granted += 1,
            Err(AccessError::LinkNotActive(LinkStatus::Printed)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(granted, 1);

    let stored = app.links.find_by_id(created.link.id).await.unwrap().unwrap();
    assert_eq!(stored.use_count, 1);
}

#[tokio::test]
async fn test_stale_update_is_conflict() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;
    let read = app.links.find_by_id(created.link.id).await.unwrap().unwrap();

    app.services.shares.revoke_link(created.link.id).await.unwrap();

    let mut stale = read.clone();
    stale.status = LinkStatus::Printed;
    let err = app.links.update(&stale).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_prints_through_separate_store_handles_grant_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = TestApp::new().config;
    let clock = Arc::new(ManualClock::new(t0()));

    let sender = file_services(dir.path(), &config, clock.clone()).await;
    let created = sender
        .shares
        .create_share(prishare_service::CreateShareRequest {
            auto_delete_after_print: Some(false),
            ..pdf_request()
        })
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for _ in 0..6 {
        let recipient = file_services(dir.path(), &config, clock.clone()).await;
        let gate = recipient.gate.clone();
        let mut session = gate.open(created.link.id).await.unwrap();
        tasks.push(tokio::spawn(async move { gate.print(&mut session).await }));
    }

    let mut granted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => granted += 1,
            Err(AccessError::LinkNotActive(LinkStatus::Printed)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(granted, 1);

    let stored = sender.shares.get_link(created.link.id).await.unwrap();
    assert_eq!(stored.status, LinkStatus::Printed);
    assert_eq!(stored.use_count, 1);
}
