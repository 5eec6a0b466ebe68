//! REST endpoint handlers for the relay.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/health` | Liveness and store reachability |
//! | `GET` | `/api/state` | Cached metadata and event history |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::error::RelayError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page with the current cache and connection counts.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, RelayError> {
    let cached = state.cache.get().await?;
    let connections = state.registry.list().await?.len();
    let game = cached
        .metadata
        .as_ref()
        .map_or_else(|| String::from("none"), |m| format!("{} ({})", m.game_type, m.start_time));
    let events = cached.events.len();
    let bound = state.cache.max_event_history();

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>LaserLive Relay</title>
    <style>
        body {{ background: #0d1117; color: #c9d1d9; font-family: monospace; padding: 2rem; }}
        h1 {{ color: #58a6ff; }}
        td {{ padding: 0.2rem 1rem 0.2rem 0; }}
        .status {{ color: #3fb950; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>LaserLive Relay</h1>
    <p>Status: <span class="status">RUNNING</span></p>
    <table>
        <tr><td>Game</td><td>{game}</td></tr>
        <tr><td>Cached events</td><td>{events} / {bound}</td></tr>
        <tr><td>Connections</td><td>{connections}</td></tr>
    </table>
    <p><a href="/api/state">/api/state</a> -- cached state as JSON</p>
    <p><code>ws://host:port/ws</code> -- live feed</p>
</body>
</html>"#
    )))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report liveness; fails with 503 when the store is unreachable.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, RelayError> {
    let connections = state.registry.list().await?.len();
    Ok(Json(serde_json::json!({
        "status": "ok",
        "relay": state.relay,
        "connections": connections,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/state
// ---------------------------------------------------------------------------

/// Return the cached metadata and decoded event history.
///
/// Corrupt cached events are left out.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, RelayError> {
    let cached = state.cache.get().await?;
    let events = cached.decoded_events();
    Ok(Json(serde_json::json!({
        "metadata": cached.metadata,
        "events": events,
    })))
}
