//! Integration tests for share creation, link management, and settings.

mod helpers;

use chrono::Duration;

use prishare_core::error::ErrorKind;
use prishare_core::types::LinkId;
use prishare_entity::link::{ColorMode, LinkStatus};
use prishare_service::{CreateShareRequest, UpdateSettingsRequest};

use helpers::{TestApp, pdf_request, pin_request};

#[tokio::test]
async fn test_create_share_stores_document_and_link() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;

    let doc = &created.document;
    assert_eq!(doc.file_name, "contract.pdf");
    assert_eq!(doc.file_size, 13);
    assert_eq!(doc.storage_path, "data:application/pdf;base64,JVBERi0xLjcgdGVzdA==");
    assert_eq!(doc.created_at, app.now());
    assert_eq!(doc.expires_at, app.now() + Duration::hours(1));
    assert!(doc.auto_delete_after_print);
    assert!(!doc.auto_delete_after_view);

    let link = &created.link;
    assert_eq!(link.document_id, doc.id);
    assert_eq!(link.status, LinkStatus::Active);
    assert_eq!(link.max_uses, 1);
    assert_eq!(link.use_count, 0);
    assert!(!link.pin_required);
    assert!(link.pin_hash.is_none());
    assert_eq!(link.document.as_ref(), Some(doc));

    assert_eq!(created.url, format!("http://localhost:5173/view/{}", link.id));
    assert!(app.documents.find_by_id(doc.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_pin_is_stored_as_salted_hash() {
    let app = TestApp::new();
    let a = app.share(pin_request("1234")).await;
    let b = app.share(pin_request("1234")).await;

    let hash_a = a.link.pin_hash.clone().unwrap();
    let hash_b = b.link.pin_hash.clone().unwrap();
    assert!(a.link.pin_required);
    assert!(hash_a.starts_with("$argon2"));
    assert!(!hash_a.contains("1234"));
    assert_ne!(hash_a, hash_b);
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let app = TestApp::new();
    let cases = vec![
        CreateShareRequest {
            file_type: "text/plain".into(),
            ..pdf_request()
        },
        CreateShareRequest {
            content: Vec::new(),
            ..pdf_request()
        },
        CreateShareRequest {
            file_name: String::new(),
            ..pdf_request()
        },
        CreateShareRequest {
            copies: Some(0),
            ..pdf_request()
        },
        CreateShareRequest {
            copies: Some(11),
            ..pdf_request()
        },
        CreateShareRequest {
            expiry_hours: Some(5),
            ..pdf_request()
        },
        CreateShareRequest {
            watermark_text: Some("x".repeat(51)),
            ..pdf_request()
        },
        pin_request("123"),
        pin_request("1234567"),
        pin_request("12a4"),
        CreateShareRequest {
            sender_email: Some("not-an-address".into()),
            ..pdf_request()
        },
    ];

    for req in cases {
        let err = app.services.shares.create_share(req.clone()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{req:?}");
    }
    assert!(app.links.list().await.unwrap().is_empty());
    assert!(app.documents.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_boundary_values_are_accepted() {
    let app = TestApp::new();
    app.share(CreateShareRequest {
        copies: Some(10),
        expiry_hours: Some(168),
        watermark_text: Some("x".repeat(50)),
        ..pin_request("123456")
    })
    .await;
}

#[tokio::test]
async fn test_defaults_come_from_settings() {
    let app = TestApp::new();
    app.services
        .settings
        .update(UpdateSettingsRequest {
            default_print_mode: Some(ColorMode::Color),
            default_copies: Some(3),
            default_expiry_hours: Some(72),
            default_watermark: Some(Some("INTERNAL".into())),
            notification_email: Some(Some("owner@example.com".into())),
            ..Default::default()
        })
        .await
        .unwrap();

    let created = app
        .share(CreateShareRequest {
            expiry_hours: None,
            ..pdf_request()
        })
        .await;

    assert_eq!(created.link.print_settings.color, ColorMode::Color);
    assert_eq!(created.link.print_settings.copies, 3);
    assert_eq!(created.link.print_settings.pages, "all");
    assert_eq!(created.document.expiry_hours, 72);
    assert_eq!(created.document.watermark_text.as_deref(), Some("INTERNAL"));
    assert_eq!(created.link.sender_email.as_deref(), Some("owner@example.com"));
}

#[tokio::test]
async fn test_explicit_options_override_settings() {
    let app = TestApp::new();
    let created = app
        .share(CreateShareRequest {
            color: Some(ColorMode::Color),
            copies: Some(2),
            pages: Some("1-3".into()),
            ..pdf_request()
        })
        .await;

    assert_eq!(created.link.print_settings.describe(), "Color, 2 copies");
    assert_eq!(created.link.print_settings.pages, "1-3");
}

#[tokio::test]
async fn test_get_link_not_found() {
    let app = TestApp::new();
    let err = app.services.shares.get_link(LinkId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_link_removes_document_and_log() {
    let app = TestApp::new();
    let created = app.share(pdf_request()).await;
    let mut session = app.services.gate.open(created.link.id).await.unwrap();
    app.services.gate.view(&mut session).await.unwrap();

    app.services.shares.delete_link(created.link.id).await.unwrap();
    assert!(app.links.find_by_id(created.link.id).await.unwrap().is_none());
    assert!(app.documents.find_by_id(created.document.id).await.unwrap().is_none());
    assert!(app
        .services
        .shares
        .access_log(created.link.id)
        .await
        .unwrap()
        .is_empty());

    let err = app.services.shares.delete_link(created.link.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_clear_history_removes_everything() {
    let app = TestApp::new();
    for _ in 0..3 {
        app.share(pdf_request()).await;
    }

    assert_eq!(app.services.shares.clear_history().await.unwrap(), 3);
    assert!(app.services.shares.list_links().await.unwrap().is_empty());
    assert!(app.documents.list().await.unwrap().is_empty());
    assert_eq!(app.services.shares.clear_history().await.unwrap(), 0);
}

#[tokio::test]
async fn test_settings_reset() {
    let app = TestApp::new();
    app.services
        .settings
        .update(UpdateSettingsRequest {
            default_copies: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();

    let reset = app.services.settings.reset().await.unwrap();
    assert_eq!(reset.default_copies, 1);
    assert_eq!(app.services.settings.get().await.unwrap().default_copies, 1);
}

#[tokio::test]
async fn test_saved_defaults_always_produce_a_valid_share() {
    let app = TestApp::new();
    let err = app
        .services
        .settings
        .update(UpdateSettingsRequest {
            default_expiry_hours: Some(12),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    app.services
        .settings
        .update(UpdateSettingsRequest {
            default_expiry_hours: Some(168),
            default_copies: Some(app.config.share.max_copies),
            ..Default::default()
        })
        .await
        .unwrap();

    let created = app
        .share(CreateShareRequest {
            expiry_hours: None,
            copies: None,
            ..pdf_request()
        })
        .await;
    assert_eq!(
        created.document.expires_at,
        created.document.created_at + Duration::hours(168)
    );
    assert_eq!(created.link.print_settings.copies, app.config.share.max_copies);
}
