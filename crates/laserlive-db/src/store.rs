//! Backend selection for the live state.
//!
//! Uses enum dispatch instead of trait objects because async methods
//! are not dyn-compatible in Rust.

use laserlive_types::{ConnectionId, GameMetadata, RelayId};

use crate::dragonfly::DragonflyPool;
use crate::error::DbError;
use crate::memory::MemoryStore;
use crate::state::CachedState;

/// A store holding the live cache and the connection registry.
#[derive(Clone)]
pub enum LiveStore {
    /// Shared `Dragonfly` instance.
    Dragonfly(DragonflyPool),
    /// In-process store.
    Memory(MemoryStore),
}

impl LiveStore {
    /// Human-readable backend name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Dragonfly(_) => "dragonfly",
            Self::Memory(_) => "memory",
        }
    }

    /// Read metadata and events as one snapshot.
    pub async fn get_state(&self) -> Result<CachedState, DbError> {
        match self {
            Self::Dragonfly(store) => store.get_state().await,
            Self::Memory(store) => store.get_state().await,
        }
    }

    /// Overwrite the metadata and clear the event history.
    pub async fn set_metadata(&self, metadata: &GameMetadata) -> Result<(), DbError> {
        match self {
            Self::Dragonfly(store) => store.set_metadata(metadata).await,
            Self::Memory(store) => store.set_metadata(metadata).await,
        }
    }

    /// Append a serialized event and trim to `bound` as one operation.
    pub async fn append_event_with_trim(
        &self,
        serialized: &str,
        bound: usize,
    ) -> Result<usize, DbError> {
        match self {
            Self::Dragonfly(store) => store.append_event_with_trim(serialized, bound).await,
            Self::Memory(store) => store.append_event_with_trim(serialized, bound).await,
        }
    }

    /// Register a viewer connection held by `relay`.
    pub async fn add_connection(&self, relay: RelayId, id: ConnectionId) -> Result<(), DbError> {
        match self {
            Self::Dragonfly(store) => store.add_connection(relay, id).await,
            Self::Memory(store) => store.add_connection(relay, id).await,
        }
    }

    /// Remove a viewer connection held by `relay`.
    pub async fn remove_connection(&self, relay: RelayId, id: ConnectionId) -> Result<(), DbError> {
        match self {
            Self::Dragonfly(store) => store.remove_connection(relay, id).await,
            Self::Memory(store) => store.remove_connection(relay, id).await,
        }
    }

    /// Connection ids registered by `relay`.
    pub async fn list_connections(&self, relay: RelayId) -> Result<Vec<ConnectionId>, DbError> {
        match self {
            Self::Dragonfly(store) => store.list_connections(relay).await,
            Self::Memory(store) => store.list_connections(relay).await,
        }
    }
}

impl From<DragonflyPool> for LiveStore {
    fn from(pool: DragonflyPool) -> Self {
        Self::Dragonfly(pool)
    }
}

impl From<MemoryStore> for LiveStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}
