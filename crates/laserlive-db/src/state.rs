//! The cached state of the in-flight game.

use laserlive_types::{GameEvent, GameMetadata};
use tracing::warn;

/// Default bound on the cached event history.
pub const DEFAULT_MAX_EVENT_HISTORY: usize = 600;

/// Metadata and bounded event history for the current game.
///
/// Events are kept exactly as they were cached: one compact JSON string
/// per event, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedState {
    /// The latest metadata snapshot, if one has been recorded.
    pub metadata: Option<GameMetadata>,
    /// Serialized events, oldest first.
    pub events: Vec<String>,
}

impl CachedState {
    /// Decode the cached events in order, skipping corrupt entries.
    pub fn decoded_events(&self) -> Vec<GameEvent> {
        self.events
            .iter()
            .filter_map(|serialized| decode_event(serialized))
            .collect()
    }
}

/// Decode one cached event, logging and discarding it if corrupt.
pub fn decode_event(serialized: &str) -> Option<GameEvent> {
    serde_json::from_str(serialized)
        .inspect_err(|e| warn!(error = %e, serialized, "skipping corrupt cached event"))
        .ok()
}

/// Serialize an event the way it is cached.
pub fn encode_event(event: &GameEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Decode cached metadata, logging and discarding it if corrupt.
pub(crate) fn decode_metadata(serialized: &str) -> Option<GameMetadata> {
    serde_json::from_str(serialized)
        .inspect_err(|e| warn!(error = %e, "discarding corrupt cached metadata"))
        .ok()
}
