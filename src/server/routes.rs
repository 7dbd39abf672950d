//! HTTP handlers
//!
//! Every response is JSON and carries `Cache-Control: no-store`; snapshots
//! change daily and an intermediary cache must never serve a stale one.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::server::AppState;

/// Error envelope returned with every non-200 response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// `GET /scrape`: the latest snapshot, byte for byte
///
/// | Outcome | Status |
/// |---------|--------|
/// | Snapshot found | 200, stored bytes |
/// | No snapshot yet | 404, `{"error": ...}` |
/// | Storage failure | 500, `{"error": ...}` |
pub async fn scrape_handler(State(state): State<AppState>) -> Response {
    let publisher = state.publisher.clone();
    let result = tokio::task::spawn_blocking(move || publisher.get_latest()).await;

    match result {
        Ok(Ok(Some(payload))) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            payload,
        )
            .into_response(),
        Ok(Ok(None)) => error_response(
            StatusCode::NOT_FOUND,
            "No gazette snapshot has been published yet".to_string(),
        ),
        Ok(Err(e)) => {
            tracing::error!("Failed to load latest snapshot: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            tracing::error!("Snapshot lookup task failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Snapshot lookup was interrupted".to_string(),
            )
        }
    }
}

/// `GET /health`: liveness only, does not touch storage
pub async fn health_handler() -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(HealthBody { status: "ok" }),
    )
        .into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        [(header::CACHE_CONTROL, "no-store")],
        Json(ErrorBody { error: message }),
    )
        .into_response()
}
