//! Read-only REST API over a loaded network snapshot.
//!
//! This is the transport a browser-side graph widget drives: bind the
//! slider range from `/network`, fetch projected views per timestep from
//! `/graph`, and chart selections via `/series`.
//!
//! - `GET /network`: dataset metadata and timestep labels
//! - `GET /graph?t=N`: full projected view at timestep `N`
//! - `GET /series/{kind}/{id}`: chart payload for a selected element

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::model::NetworkSnapshot;

/// Immutable application state shared across all request handlers.
///
/// The snapshot is read-only after load and wrapped in `Arc`; no locks
/// needed. Each request projects its own view, so the server is stateless.
pub struct AppState {
    /// The loaded dataset (possibly the empty-network fallback).
    pub snapshot: NetworkSnapshot,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/network", get(handlers::get_network))
        .route("/graph", get(handlers::get_graph))
        .route("/series/{kind}/{id}", get(handlers::get_series))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    tracing::info!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
