//! Action routing for inbound frames.
//!
//! | Action | Effect |
//! |--------|--------|
//! | `metadata` | Record the snapshot (resets history), broadcast it |
//! | `event` | Append to history, broadcast it |
//! | `replay` | Stream cached state back to the sender |
//!
//! Payloads may arrive as native objects or JSON-encoded strings. Any
//! payload that is not an object of the expected shape is rejected
//! before it reaches the cache. Unknown actions are ignored.

use laserlive_types::{Action, ConnectionId, Envelope, GameEvent, GameMetadata};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::broadcast::BroadcastReport;
use crate::error::RelayError;
use crate::replay::ReplayReport;
use crate::state::AppState;

/// What routing one frame did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// A metadata snapshot was cached and broadcast.
    Metadata(BroadcastReport),
    /// An event was cached and broadcast.
    Event {
        /// History length after the append.
        history: usize,
        /// Broadcast outcome.
        report: BroadcastReport,
    },
    /// Cached state was replayed to the sender.
    Replay(ReplayReport),
    /// The action was not recognised; nothing happened.
    Ignored(String),
}

/// Route one text frame received from connection `from`.
///
/// # Errors
///
/// Returns [`RelayError::InvalidPayload`] for frames that are not an
/// envelope or whose payload has the wrong shape, and store or
/// serialization errors from the action itself.
pub async fn route_frame(state: &AppState, from: ConnectionId, text: &str) -> Result<Routed, RelayError> {
    let frame: Value = serde_json::from_str(text)
        .map_err(|e| RelayError::InvalidPayload(format!("frame is not JSON: {e}")))?;
    let action = frame
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| RelayError::InvalidPayload(String::from("frame has no action")))?;

    let action = match action {
        "metadata" => Action::Metadata,
        "event" => Action::Event,
        "replay" => Action::Replay,
        other => {
            debug!(connection = %from, action = other, "ignoring unknown action");
            return Ok(Routed::Ignored(other.to_owned()));
        }
    };
    let envelope = Envelope {
        action,
        data: frame.get("data").cloned().unwrap_or(Value::Null),
    };

    info!(connection = %from, route = %action, "routing frame");
    match action {
        Action::Metadata => {
            let metadata: GameMetadata = typed_payload(&envelope)?;
            state.cache.set_metadata(&metadata).await?;
            let report = state.broadcaster.push(&Envelope::metadata(&metadata)?).await?;
            Ok(Routed::Metadata(report))
        }
        Action::Event => {
            let event: GameEvent = typed_payload(&envelope)?;
            let history = state.cache.append_event(&event).await?;
            let report = state.broadcaster.push(&Envelope::event(&event)?).await?;
            Ok(Routed::Event { history, report })
        }
        Action::Replay => Ok(Routed::Replay(state.replay.replay(from).await?)),
    }
}

/// Decode the envelope payload as `T`, requiring a JSON object.
fn typed_payload<T: DeserializeOwned>(envelope: &Envelope) -> Result<T, RelayError> {
    let payload = envelope.payload();
    if !payload.is_object() {
        return Err(RelayError::InvalidPayload(format!(
            "{} payload must be an object",
            envelope.action
        )));
    }
    serde_json::from_value(payload)
        .map_err(|e| RelayError::InvalidPayload(format!("malformed {} payload: {e}", envelope.action)))
}
