//! Local delivery gateway for open viewer sockets.
//!
//! Each socket task attaches a bounded outbound queue under its
//! [`ConnectionId`] and drains it into the socket. Delivery never waits
//! on a socket: a full queue is a transient failure, a missing or closed
//! queue means the receiver is gone.

use std::collections::HashMap;
use std::sync::Arc;

use laserlive_types::ConnectionId;
use tokio::sync::{RwLock, mpsc};

/// Why a frame could not be handed to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The receiver no longer exists; the connection should be pruned.
    #[error("connection gone")]
    Gone,
    /// The receiver exists but could not take the frame right now.
    #[error("connection busy")]
    Transient,
}

/// Outbound queues of the sockets held by this relay process.
#[derive(Clone, Default)]
pub struct ConnectionHub {
    queues: Arc<RwLock<HashMap<ConnectionId, mpsc::Sender<String>>>>,
}

impl ConnectionHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a queue of `capacity` frames for `id` and return its
    /// receiving end. Re-attaching an id replaces its previous queue.
    pub async fn attach(&self, id: ConnectionId, capacity: usize) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        self.queues.write().await.insert(id, tx);
        rx
    }

    /// Drop the queue for `id`, if any.
    pub async fn detach(&self, id: ConnectionId) {
        self.queues.write().await.remove(&id);
    }

    /// Number of attached queues.
    pub async fn len(&self) -> usize {
        self.queues.read().await.len()
    }

    /// Whether no queue is attached.
    pub async fn is_empty(&self) -> bool {
        self.queues.read().await.is_empty()
    }

    /// Hand one text frame to connection `id`.
    ///
    /// # Errors
    ///
    /// [`DeliveryError::Gone`] when `id` has no queue or its receiver was
    /// dropped; [`DeliveryError::Transient`] when the queue is full.
    pub async fn post(&self, id: ConnectionId, frame: &str) -> Result<(), DeliveryError> {
        let queues = self.queues.read().await;
        let Some(tx) = queues.get(&id) else {
            return Err(DeliveryError::Gone);
        };
        tx.try_send(frame.to_owned()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Transient,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Gone,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_arrive_in_order() {
        let hub = ConnectionHub::new();
        let id = ConnectionId::new();
        let mut rx = hub.attach(id, 8).await;

        hub.post(id, "one").await.unwrap();
        hub.post(id, "two").await.unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("one"));
        assert_eq!(rx.recv().await.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn unknown_and_closed_are_gone() {
        let hub = ConnectionHub::new();
        assert_eq!(
            hub.post(ConnectionId::new(), "x").await,
            Err(DeliveryError::Gone)
        );

        let id = ConnectionId::new();
        let rx = hub.attach(id, 8).await;
        drop(rx);
        assert_eq!(hub.post(id, "x").await, Err(DeliveryError::Gone));
    }

    #[tokio::test]
    async fn full_queue_is_transient() {
        let hub = ConnectionHub::new();
        let id = ConnectionId::new();
        let _rx = hub.attach(id, 1).await;

        hub.post(id, "first").await.unwrap();
        assert_eq!(hub.post(id, "second").await, Err(DeliveryError::Transient));
    }

    #[tokio::test]
    async fn detach_removes_queue() {
        let hub = ConnectionHub::new();
        let id = ConnectionId::new();
        let _rx = hub.attach(id, 4).await;
        assert_eq!(hub.len().await, 1);

        hub.detach(id).await;
        assert!(hub.is_empty().await);
        assert_eq!(hub.post(id, "x").await, Err(DeliveryError::Gone));
    }
}
