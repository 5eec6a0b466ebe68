//! Axum router construction for the relay.
//!
//! Assembles the `WebSocket` endpoint and the REST status routes into a
//! single [`Router`] with CORS open to any origin, since viewers are
//! browser pages served from elsewhere.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the relay.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /health` -- liveness
/// - `GET /api/state` -- cached metadata and history
/// - `GET /ws` -- publisher/viewer `WebSocket`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/state", get(handlers::get_state))
        .route("/ws", get(ws::ws_relay))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
