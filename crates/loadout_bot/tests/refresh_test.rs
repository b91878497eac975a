//! Refresh loop tests against a local axum upstream.

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use loadout_bot::{AppContext, RefreshLoop, ResourceOutcome};
use loadout_core::CosmeticType;
use loadout_social::{Dispatcher, HttpWebhookSender, InMemoryGuildStore};
use loadout_storage::{InMemorySnapshots, SnapshotKey, SnapshotStorage};
use loadout_upstream::{FetchSource, UpstreamConfig};
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn cosmetics_payload() -> JsonValue {
    json!({
        "status": 200,
        "data": [
            {
                "id": "CID_028_Athena_Commando_F",
                "name": "Renegade Raider",
                "type": {"value": "outfit"},
                "rarity": {"value": "rare", "displayValue": "Rare"},
                "images": {"icon": "https://example.test/cid_028.png"}
            },
            {
                "id": "MusicPack_001",
                "name": "Lobby Music",
                "type": {"value": "music"},
                "rarity": {"value": "common", "displayValue": "Common"},
                "images": {}
            }
        ]
    })
}

fn playlists_payload() -> JsonValue {
    json!({
        "status": 200,
        "data": [{"id": "Playlist_DefaultSolo", "name": "Solo", "subName": null}]
    })
}

/// Upstream that serves English but fails every other language.
async fn english_only_cosmetics(Query(query): Query<HashMap<String, String>>) -> Response {
    match query.get("language").map(String::as_str) {
        Some("en") => Json(cosmetics_payload()).into_response(),
        _ => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn playlists() -> Json<JsonValue> {
    Json(playlists_payload())
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn context(base_url: &str, snapshots: Arc<InMemorySnapshots>, languages: &[&str]) -> Arc<AppContext> {
    let upstream = UpstreamConfig::builder()
        .base_url(base_url)
        .api_key("test-key")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(
        Arc::new(InMemoryGuildStore::new()),
        Arc::new(HttpWebhookSender::new(Duration::from_secs(5)).unwrap()),
    );
    Arc::new(
        AppContext::new(upstream, snapshots, dispatcher)
            .with_languages(languages.iter().map(|l| l.to_string()).collect()),
    )
}

#[tokio::test]
async fn test_live_refresh_fills_catalog_and_snapshots() {
    let base_url = serve(
        Router::new()
            .route("/v2/cosmetics/br", get(english_only_cosmetics))
            .route("/v1/playlists", get(playlists)),
    )
    .await;
    let snapshots = Arc::new(InMemorySnapshots::new());
    let context = context(&base_url, snapshots.clone(), &["en"]);

    let report = RefreshLoop::new(Arc::clone(&context)).run_once().await;

    assert!(report.is_success());
    let catalog = context.catalog("en");
    assert!(catalog.is_cosmetics_loaded());
    assert!(catalog.is_playlists_loaded());
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.bucket_len(CosmeticType::Outfit), 1);
    assert_eq!(catalog.playlist_len(), 1);
    assert_eq!(snapshots.writes(&SnapshotKey::Cosmetics("en".into())), 1);
    assert_eq!(snapshots.writes(&SnapshotKey::Playlists("en".into())), 1);
}

#[tokio::test]
async fn test_second_refresh_adds_nothing_new() {
    let base_url = serve(
        Router::new()
            .route("/v2/cosmetics/br", get(english_only_cosmetics))
            .route("/v1/playlists", get(playlists)),
    )
    .await;
    let context = context(&base_url, Arc::new(InMemorySnapshots::new()), &["en"]);
    let refresh = RefreshLoop::new(Arc::clone(&context));

    refresh.run_once().await;
    let report = refresh.run_once().await;

    assert_eq!(
        report.language("en").unwrap().cosmetics(),
        &ResourceOutcome::Refreshed {
            parsed: 2,
            added: 0,
            source: FetchSource::Live
        }
    );
    assert_eq!(context.catalog("en").len(), 2);
}

#[tokio::test]
async fn test_outage_falls_back_to_snapshot_and_marks_loaded() {
    let base_url = serve(
        Router::new()
            .route("/v2/cosmetics/br", get(broken))
            .route("/v1/playlists", get(broken)),
    )
    .await;
    let snapshots = Arc::new(
        InMemorySnapshots::new()
            .with_document(SnapshotKey::Cosmetics("en".into()), cosmetics_payload())
            .with_document(SnapshotKey::Playlists("en".into()), playlists_payload()),
    );
    let context = context(&base_url, snapshots.clone(), &["en"]);

    let waiter = {
        let catalog = context.catalog("en");
        tokio::spawn(async move { catalog.wait_until_loaded().await })
    };
    let report = RefreshLoop::new(Arc::clone(&context)).run_once().await;

    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("cosmetics readiness should fire")
        .unwrap();

    let entry = report.language("en").unwrap();
    assert!(matches!(
        entry.cosmetics(),
        ResourceOutcome::Refreshed {
            source: FetchSource::Snapshot,
            ..
        }
    ));
    assert_eq!(context.catalog("en").len(), 2);
    assert!(context.catalog("en").is_playlists_loaded());
    // Fallback payloads are not written back.
    assert_eq!(snapshots.writes(&SnapshotKey::Cosmetics("en".into())), 0);
}

#[tokio::test]
async fn test_failing_language_does_not_stop_others() {
    let base_url = serve(
        Router::new()
            .route("/v2/cosmetics/br", get(english_only_cosmetics))
            .route("/v1/playlists", get(playlists)),
    )
    .await;
    let context = context(&base_url, Arc::new(InMemorySnapshots::new()), &["fr", "en"]);

    let report = RefreshLoop::new(Arc::clone(&context)).run_once().await;

    assert!(!report.is_success());
    let fr = report.language("fr").unwrap();
    assert!(matches!(fr.cosmetics(), ResourceOutcome::Failed { .. }));
    assert!(fr.playlists().is_refreshed());
    assert!(!context.catalog("fr").is_cosmetics_loaded());
    assert!(context.catalog("fr").is_empty());

    assert!(report.language("en").unwrap().cosmetics().is_refreshed());
    assert!(context.catalog("en").is_cosmetics_loaded());
}

#[tokio::test]
async fn test_outage_without_snapshot_keeps_catalog_unloaded() {
    let base_url = serve(Router::new()).await;
    let snapshots = Arc::new(InMemorySnapshots::new());
    let context = context(&base_url, snapshots.clone(), &["en"]);

    let report = RefreshLoop::new(Arc::clone(&context)).run_once().await;

    assert!(!report.is_success());
    assert!(!context.catalog("en").is_cosmetics_loaded());
    assert!(!snapshots.exists(&SnapshotKey::Cosmetics("en".into())).await.unwrap());
}

#[tokio::test]
async fn test_malformed_live_body_keeps_snapshot_and_loads_from_it() {
    async fn maintenance() -> Json<JsonValue> {
        Json(json!({"status": 200, "error": "maintenance"}))
    }
    let base_url = serve(
        Router::new()
            .route("/v2/cosmetics/br", get(maintenance))
            .route("/v1/playlists", get(playlists)),
    )
    .await;
    let key = SnapshotKey::Cosmetics("en".into());
    let snapshots =
        Arc::new(InMemorySnapshots::new().with_document(key.clone(), cosmetics_payload()));
    let context = context(&base_url, snapshots.clone(), &["en"]);

    let report = RefreshLoop::new(Arc::clone(&context)).run_once().await;

    assert!(matches!(
        report.language("en").unwrap().cosmetics(),
        ResourceOutcome::Refreshed {
            parsed: 2,
            source: FetchSource::Snapshot,
            ..
        }
    ));
    assert!(context.catalog("en").is_cosmetics_loaded());
    assert_eq!(context.catalog("en").len(), 2);
    assert_eq!(snapshots.writes(&key), 0);
    assert_eq!(snapshots.load(&key).await.unwrap(), Some(cosmetics_payload()));
}
