//! Registry of open viewer connections.
//!
//! Each relay process only holds the sockets it accepted, so the registry
//! is scoped to one [`RelayId`]. Relays sharing a store never see, and
//! never prune, each other's connections.

use laserlive_types::{ConnectionId, RelayId};

use crate::error::DbError;
use crate::store::LiveStore;

/// Tracks which viewer connections one relay has open.
#[derive(Clone)]
pub struct ConnectionRegistry {
    store: LiveStore,
    relay: RelayId,
}

impl ConnectionRegistry {
    /// Create a registry over `store` holding the connections of `relay`.
    pub const fn new(store: LiveStore, relay: RelayId) -> Self {
        Self { store, relay }
    }

    /// The relay this registry belongs to.
    pub const fn relay(&self) -> RelayId {
        self.relay
    }

    /// Record a newly opened connection.
    pub async fn add(&self, id: ConnectionId) -> Result<(), DbError> {
        self.store.add_connection(self.relay, id).await
    }

    /// Forget a connection (disconnected or found unreachable).
    pub async fn remove(&self, id: ConnectionId) -> Result<(), DbError> {
        self.store.remove_connection(self.relay, id).await
    }

    /// Every connection currently registered by this relay.
    ///
    /// Not a consistent snapshot with respect to concurrent `add`s: a
    /// connection registered while a broadcast is enumerating may or may
    /// not be included.
    pub async fn list(&self) -> Result<Vec<ConnectionId>, DbError> {
        self.store.list_connections(self.relay).await
    }
}
