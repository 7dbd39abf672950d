//! Integration tests for the HTTP surface
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, backed
//! by real stores in temporary directories.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use gazette_scraper::config::StorageConfig;
use gazette_scraper::publish::Publisher;
use gazette_scraper::server::build_router;
use gazette_scraper::storage::{
    DirectoryStore, SnapshotMeta, SnapshotStore, SqliteStore, StorageError, StorageResult,
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// A backend that cannot be listed
struct UnreachableStore;

impl SnapshotStore for UnreachableStore {
    fn put_at(&self, _key: &str, _data: &[u8], _at: DateTime<Utc>) -> StorageResult<()> {
        Err(StorageError::Database("backend unreachable".to_string()))
    }

    fn list(&self) -> StorageResult<Vec<SnapshotMeta>> {
        Err(StorageError::Database("backend unreachable".to_string()))
    }

    fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(key.to_string()))
    }

    fn exists(&self, _key: &str) -> StorageResult<bool> {
        Err(StorageError::Database("backend unreachable".to_string()))
    }
}

fn router_for(store: Arc<dyn SnapshotStore>) -> Router {
    build_router(Publisher::new(store, &StorageConfig::default()))
}

async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, day, 6, 30, 0).unwrap()
}

#[tokio::test]
async fn test_scrape_without_snapshots_is_404() {
    let dir = TempDir::new().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();

    let (status, headers, body) = get(router_for(Arc::new(store)), "/scrape").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("No gazette snapshot"));
}

#[tokio::test]
async fn test_scrape_returns_stored_bytes() {
    let dir = TempDir::new().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();
    let payload = "[\n  {\n    \"Tarih\": \"18.10.2026\",\n    \"Başlık\": \"Karar\"\n  }\n]";
    store
        .put_at("resmi_gazete_18.10.2026.json", payload.as_bytes(), at(18))
        .unwrap();

    let (status, headers, body) = get(router_for(Arc::new(store)), "/scrape").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(body, payload.as_bytes());
}

#[tokio::test]
async fn test_scrape_picks_latest_by_timestamp() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .put_at("resmi_gazete_18.10.2026.json", b"[\"written first\"]", at(10))
        .unwrap();
    store
        .put_at("resmi_gazete_01.10.2026.json", b"[\"written last\"]", at(18))
        .unwrap();

    let (status, _, body) = get(router_for(Arc::new(store)), "/scrape").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[\"written last\"]");
}

#[tokio::test]
async fn test_storage_failure_is_500_not_404() {
    let (status, headers, body) = get(router_for(Arc::new(UnreachableStore)), "/scrape").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("backend unreachable"));
}

#[tokio::test]
async fn test_corrupted_snapshot_is_500() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("gazette.db");
    {
        let store = SqliteStore::open(&db_path).unwrap();
        store
            .put_at("resmi_gazete_18.10.2026.json", b"[]", at(18))
            .unwrap();
    }
    let conn = rusqlite::Connection::open(&db_path).unwrap();
    conn.execute("UPDATE snapshots SET payload = X'5B7B7D5D'", [])
        .unwrap();
    drop(conn);

    let store = SqliteStore::open(&db_path).unwrap();
    let (status, _, _) = get(router_for(Arc::new(store)), "/scrape").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health() {
    let (status, headers, body) = get(router_for(Arc::new(UnreachableStore)), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(body, br#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _, _) = get(router_for(Arc::new(UnreachableStore)), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
