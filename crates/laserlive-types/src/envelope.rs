//! Transport envelope exchanged with the relay.
//!
//! Every frame on the wire is `{"action": ..., "data": ...}`. Publishers
//! may send `data` either as a native JSON object or as a JSON-encoded
//! string; [`Envelope::payload`] normalises both forms. Frames the relay
//! sends out always carry a native object.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::enums::Action;
use crate::structs::{GameEvent, GameMetadata, OutputItem};

/// A single transport frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Envelope {
    /// Route key.
    pub action: Action,
    /// Payload: an object, a JSON-encoded string, or null for `replay`.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Envelope carrying a metadata snapshot as a native object.
    pub fn metadata(metadata: &GameMetadata) -> Result<Self, serde_json::Error> {
        Ok(Self {
            action: Action::Metadata,
            data: serde_json::to_value(metadata)?,
        })
    }

    /// Envelope carrying an event as a native object.
    pub fn event(event: &GameEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            action: Action::Event,
            data: serde_json::to_value(event)?,
        })
    }

    /// Envelope carrying an event pre-encoded as a JSON string.
    pub fn event_as_string(event: &GameEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            action: Action::Event,
            data: Value::String(serde_json::to_string(event)?),
        })
    }

    /// Envelope asking the relay to replay cached state to the sender.
    pub const fn replay() -> Self {
        Self {
            action: Action::Replay,
            data: Value::Null,
        }
    }

    /// Envelope for a parser output item, using the publisher encoding:
    /// metadata as an object, events as a JSON string.
    pub fn for_publish(item: &OutputItem) -> Result<Self, serde_json::Error> {
        match item {
            OutputItem::Metadata(metadata) => Self::metadata(metadata),
            OutputItem::Event(event) => Self::event_as_string(event),
        }
    }

    /// The payload with string-encoded JSON decoded.
    ///
    /// A string that is not valid JSON is returned unchanged as a string
    /// value; callers decide whether that is acceptable.
    pub fn payload(&self) -> Value {
        match &self.data {
            Value::String(raw) => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
            }
            other => other.clone(),
        }
    }
}
