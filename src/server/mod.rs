//! HTTP server exposing the latest snapshot

mod routes;

pub use routes::{health_handler, scrape_handler, ErrorBody};

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use crate::publish::Publisher;
use crate::GazetteError;

/// Shared handler state
///
/// Holds only the storage handle; snapshots are re-read on every request.
#[derive(Clone)]
pub struct AppState {
    pub publisher: Publisher,
}

/// Builds the application router
pub fn build_router(publisher: Publisher) -> Router {
    Router::new()
        .route("/scrape", get(scrape_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { publisher })
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves until the process is stopped
pub async fn serve(addr: SocketAddr, publisher: Publisher) -> Result<(), GazetteError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving snapshots on http://{}/scrape", listener.local_addr()?);

    axum::serve(listener, build_router(publisher)).await?;
    Ok(())
}
