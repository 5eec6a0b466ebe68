//! Relay HTTP server lifecycle.
//!
//! Provides [`start_server`], which binds to a TCP port and serves the
//! relay router until the process is terminated.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::error::RelayError;
use crate::router::build_router;
use crate::state::AppState;

/// Start the relay HTTP server on `host:port`.
///
/// # Errors
///
/// Returns [`RelayError::Bind`] if the address is invalid or cannot be
/// bound, and [`RelayError::Serve`] on a fatal I/O error while serving.
pub async fn start_server(host: &str, port: u16, state: Arc<AppState>) -> Result<(), RelayError> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| RelayError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "relay listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| RelayError::Serve(e.to_string()))
}
