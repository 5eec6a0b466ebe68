//! Replay of cached state to one connection.
//!
//! The cache is read once. Metadata goes first; if it cannot be
//! delivered nothing else is sent. Events follow in cached order and the
//! replay stops at the first failed delivery. Corrupt cached events are
//! skipped. The registry is never touched here: pruning belongs to the
//! broadcaster.

use laserlive_db::{LiveCache, decode_event};
use laserlive_types::{ConnectionId, Envelope};
use tracing::{debug, info};

use crate::error::RelayError;
use crate::hub::{ConnectionHub, DeliveryError};

/// Outcome of one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Whether the metadata snapshot was delivered.
    pub metadata_sent: bool,
    /// Number of events delivered.
    pub events_sent: usize,
    /// Number of corrupt cached events skipped.
    pub skipped: usize,
    /// The failure that ended the replay early, if any.
    pub stopped_by: Option<DeliveryError>,
}

/// Streams cached metadata and history to a single connection.
#[derive(Clone)]
pub struct ReplayResponder {
    cache: LiveCache,
    hub: ConnectionHub,
}

impl ReplayResponder {
    /// Create a responder reading `cache` and delivering through `hub`.
    pub const fn new(cache: LiveCache, hub: ConnectionHub) -> Self {
        Self { cache, hub }
    }

    /// Replay the cached game to `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read or a frame cannot be
    /// serialized. Delivery failures end the replay and are reported in
    /// [`ReplayReport::stopped_by`].
    pub async fn replay(&self, id: ConnectionId) -> Result<ReplayReport, RelayError> {
        let state = self.cache.get().await?;
        let mut report = ReplayReport::default();

        if let Some(metadata) = &state.metadata {
            let frame = serde_json::to_string(&Envelope::metadata(metadata)?)?;
            if let Err(e) = self.hub.post(id, &frame).await {
                debug!(connection = %id, error = %e, "metadata replay not delivered");
                report.stopped_by = Some(e);
                return Ok(report);
            }
            report.metadata_sent = true;
        }

        for serialized in &state.events {
            let Some(event) = decode_event(serialized) else {
                report.skipped = report.skipped.saturating_add(1);
                continue;
            };
            let frame = serde_json::to_string(&Envelope::event(&event)?)?;
            if let Err(e) = self.hub.post(id, &frame).await {
                debug!(
                    connection = %id,
                    error = %e,
                    sent = report.events_sent,
                    "event replay interrupted"
                );
                report.stopped_by = Some(e);
                break;
            }
            report.events_sent = report.events_sent.saturating_add(1);
        }

        info!(
            connection = %id,
            metadata = report.metadata_sent,
            events = report.events_sent,
            skipped = report.skipped,
            "replay finished"
        );
        Ok(report)
    }
}
