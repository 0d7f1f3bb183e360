//! End-to-end tests against a mock catalog server
//!
//! Exercises the orchestrator and the intro marker editor over real HTTP
//! through the catalog client.

mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use common::*;
use marquee_catalog_client::{CatalogClient, IntroMarker, MediaType};
use marquee_core::{
    ActivityLog, BulkImportOrchestrator, CoreError, ImportSettings, IntroMarkerEditor,
    MarkerStore, PlaybackSnapshot,
};
use marquee_shared_config::CatalogConfig;
use marquee_test_utils::{ImportStatusFixture, MockCatalogServer};

fn client_for(server: &MockCatalogServer) -> CatalogClient {
    let config = CatalogConfig::new(server.url()).with_token(server.token());
    CatalogClient::new(&config)
        .expect("client builds")
        .with_retry_config(1, 1)
}

fn fast_settings() -> ImportSettings {
    ImportSettings {
        poll_interval: Duration::from_millis(20),
        default_size: 10,
    }
}

#[tokio::test]
async fn test_import_all_over_http() {
    let server = MockCatalogServer::start().await;
    server.mock_start_expected("movie", 10, 1).await;
    server.mock_start_expected("series", 10, 1).await;
    server
        .mock_status_sequence(vec![
            ImportStatusFixture::running("movie", 1, 2),
            ImportStatusFixture::finished("movie", 3, 0, 0),
            ImportStatusFixture::running("series", 1, 1),
            ImportStatusFixture::finished("series", 1, 1, 0),
        ])
        .await;

    let log = ActivityLog::default();
    let orchestrator = BulkImportOrchestrator::new(client_for(&server), log.clone(), fast_settings());

    orchestrator.start_all(None).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), orchestrator.wait_idle())
        .await
        .expect("chain finishes");

    let status = orchestrator.last_status().await.unwrap();
    assert!(!status.running);
    assert_eq!(status.media_type, MediaType::Series);
    assert!(log
        .entries()
        .iter()
        .any(|e| e.message == "Import of series finished: 1 imported, 1 skipped, 0 errors"));
}

#[tokio::test]
async fn test_rejection_reason_reaches_caller() {
    let server = MockCatalogServer::start().await;
    server
        .mock_start_rejected("TMDB API key is not configured")
        .await;

    let orchestrator = BulkImportOrchestrator::new(
        client_for(&server),
        ActivityLog::default(),
        fast_settings(),
    );

    let result = orchestrator.start(MediaType::Movie, None).await;
    assert_matches!(result, Err(CoreError::ImportRejected(ref reason)) if reason == "TMDB API key is not configured");
    assert!(!orchestrator.is_polling().await);
}

#[tokio::test]
async fn test_poll_survives_server_errors() {
    let server = MockCatalogServer::start().await;
    server.mock_start_accepted().await;
    // Failures are mounted first so they answer before the sequence
    server.mock_status_failures(2).await;
    server
        .mock_status_sequence(vec![ImportStatusFixture::finished("book", 4, 0, 1)])
        .await;

    let log = ActivityLog::default();
    let orchestrator = BulkImportOrchestrator::new(client_for(&server), log.clone(), fast_settings());

    orchestrator.start(MediaType::Book, None).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), orchestrator.wait_idle())
        .await
        .expect("loop ends after recovery");

    let errors = log
        .entries()
        .iter()
        .filter(|e| e.message.starts_with("Failed to fetch import status"))
        .count();
    assert_eq!(errors, 2);
    assert_eq!(orchestrator.last_status().await.unwrap().imported_count, 4);
}

#[tokio::test]
async fn test_marker_editor_saves_over_http() {
    let server = MockCatalogServer::start().await;
    server.mock_intro_marker_saved().await;
    let client = client_for(&server);

    let mut editor = IntroMarkerEditor::new();
    editor.mark_start(&PlaybackSnapshot::at(31.5, 1300.0));
    editor.mark_end(&PlaybackSnapshot::at(88.0, 1300.0));

    let saved = editor.save(&client, "s01e01").await.unwrap();
    assert_eq!(saved, IntroMarker::new(31.5, 88.0));

    let requests = server.inner().received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!({ "start": 31.5, "end": 88.0 }));
}

#[tokio::test]
async fn test_invalid_marker_is_rejected_before_network() {
    let server = MockCatalogServer::start().await;
    server.mock_intro_marker_saved().await;
    let client = client_for(&server);

    let mut editor = IntroMarkerEditor::new();
    editor.mark_start(&PlaybackSnapshot::at(88.0, 1300.0));
    editor.mark_end(&PlaybackSnapshot::at(31.5, 1300.0));

    assert_matches!(
        editor.save(&client, "s01e01").await,
        Err(CoreError::InvalidMarker { .. })
    );
    assert!(server.inner().received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetched_marker_drives_session() {
    let server = MockCatalogServer::start().await;
    server.mock_intro_marker("s01e01", Some((30.0, 90.0))).await;
    let client = client_for(&server);

    let marker = MarkerStore::intro_marker(&client, "s01e01").await.unwrap();
    let mut session = session();
    session.set_intro_marker(marker);

    for ms in (30_000..=31_600).step_by(100) {
        tick_at(&mut session, ms);
    }
    assert!(session.skip_state().armed);
}
