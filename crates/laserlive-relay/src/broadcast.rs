//! Fan-out of new items to every registered viewer.
//!
//! One push enumerates the registry, hands the frame to every listed
//! connection concurrently, and only after the sweep removes the
//! connections whose receivers are gone. A failure on one connection
//! never affects delivery to the others.

use futures::future::join_all;
use laserlive_db::ConnectionRegistry;
use laserlive_types::{ConnectionId, Envelope};
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::hub::{ConnectionHub, DeliveryError};

/// Outcome of one broadcast sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the frame was handed to.
    pub delivered: usize,
    /// Connections that could not take the frame this time.
    pub transient: usize,
    /// Connections found gone and removed from the registry.
    pub pruned: Vec<ConnectionId>,
}

/// Pushes frames to every connection in the registry.
#[derive(Clone)]
pub struct Broadcaster {
    registry: ConnectionRegistry,
    hub: ConnectionHub,
}

impl Broadcaster {
    /// Create a broadcaster over `registry`, delivering through `hub`.
    pub const fn new(registry: ConnectionRegistry, hub: ConnectionHub) -> Self {
        Self { registry, hub }
    }

    /// Deliver `envelope` to every registered connection.
    ///
    /// Transient failures are logged and not retried within this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope cannot be serialized or the
    /// registry cannot be listed. Pruning failures are logged only.
    pub async fn push(&self, envelope: &Envelope) -> Result<BroadcastReport, RelayError> {
        let frame = serde_json::to_string(envelope)?;
        let targets = self.registry.list().await?;

        let outcomes = join_all(targets.iter().map(|&id| {
            let frame = frame.as_str();
            async move { (id, self.hub.post(id, frame).await) }
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.delivered = report.delivered.saturating_add(1),
                Err(DeliveryError::Transient) => {
                    warn!(connection = %id, "outbound queue full, frame dropped");
                    report.transient = report.transient.saturating_add(1);
                }
                Err(DeliveryError::Gone) => report.pruned.push(id),
            }
        }

        for &id in &report.pruned {
            if let Err(e) = self.registry.remove(id).await {
                warn!(connection = %id, error = %e, "failed to prune stale connection");
            }
        }
        if !report.pruned.is_empty() {
            info!(pruned = report.pruned.len(), "pruned stale connections");
        }

        debug!(
            action = %envelope.action,
            delivered = report.delivered,
            transient = report.transient,
            "broadcast complete"
        );
        Ok(report)
    }
}
