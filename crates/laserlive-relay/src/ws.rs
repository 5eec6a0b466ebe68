//! `WebSocket` endpoint shared by publishers and viewers.
//!
//! Clients connect to `GET /ws`. On connect the socket gets an outbound
//! queue in the hub and only then is registered, so any broadcast that
//! lists it can deliver to it. A writer task drains the queue into the
//! socket. Inbound text frames are routed one at a time in
//! arrival order, so a publisher's items are cached and broadcast in the
//! order it sent them.
//!
//! Connecting does not replay anything: a viewer asks for replay once it
//! is ready to render.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use laserlive_types::ConnectionId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::routes::route_frame;
use crate::state::AppState;

/// Upgrade an HTTP request to a relay `WebSocket` connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_relay(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Mint an id for a new connection, attach its outbound queue, then
/// register it.
///
/// # Errors
///
/// Returns [`RelayError::Store`] if registration fails. The queue is
/// detached again before returning.
pub async fn open_connection(
    state: &AppState,
) -> Result<(ConnectionId, mpsc::Receiver<String>), RelayError> {
    let id = ConnectionId::new();
    let outbound = state.hub.attach(id, state.outbound_queue).await;
    if let Err(e) = state.registry.add(id).await {
        state.hub.detach(id).await;
        return Err(e.into());
    }
    Ok((id, outbound))
}

/// Deregister a connection, then drop its outbound queue.
pub async fn close_connection(state: &AppState, id: ConnectionId) {
    if let Err(e) = state.registry.remove(id).await {
        warn!(connection = %id, error = %e, "failed to deregister connection");
    }
    state.hub.detach(id).await;
}

/// Handle the lifecycle of one connection: open, pump frames both ways,
/// and close.
async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    let (id, mut outbound) = match open_connection(&state).await {
        Ok(opened) => opened,
        Err(e) => {
            warn!(error = %e, "failed to register connection, closing");
            return;
        }
    };
    info!(relay = %state.relay, connection = %id, "connection opened");

    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                debug!(connection = %id, "send failed, writer stopping");
                break;
            }
        }
    });

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = route_frame(&state, id, text.as_str()).await {
                    warn!(connection = %id, error = %e, "frame rejected");
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                // Pings are answered by the protocol layer; binary is unused.
            }
            Err(e) => {
                debug!(connection = %id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    close_connection(&state, id).await;
    writer.abort();
    info!(connection = %id, "connection closed");
}
