//! In-process backend with the same surface as [`DragonflyPool`].
//!
//! Every operation takes one lock for its whole duration, which gives the
//! same all-or-nothing behaviour the Lua scripts give on `Dragonfly`.
//! State only lives as long as the process, so this backend suits tests
//! and single-process development runs.
//!
//! [`DragonflyPool`]: crate::DragonflyPool

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use laserlive_types::{ConnectionId, GameMetadata, RelayId};
use tokio::sync::Mutex;

use crate::error::DbError;
use crate::state::CachedState;

#[derive(Debug, Default)]
struct Inner {
    metadata: Option<GameMetadata>,
    events: VecDeque<String>,
    connections: BTreeMap<RelayId, BTreeSet<ConnectionId>>,
}

/// Shared in-memory live state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot metadata and events.
    pub async fn get_state(&self) -> Result<CachedState, DbError> {
        let inner = self.inner.lock().await;
        Ok(CachedState {
            metadata: inner.metadata.clone(),
            events: inner.events.iter().cloned().collect(),
        })
    }

    /// Overwrite the metadata and clear the event history.
    pub async fn set_metadata(&self, metadata: &GameMetadata) -> Result<(), DbError> {
        let mut inner = self.inner.lock().await;
        inner.metadata = Some(metadata.clone());
        inner.events.clear();
        Ok(())
    }

    /// Append a serialized event and trim the history to `bound` entries.
    pub async fn append_event_with_trim(
        &self,
        serialized: &str,
        bound: usize,
    ) -> Result<usize, DbError> {
        let mut inner = self.inner.lock().await;
        inner.events.push_back(serialized.to_owned());
        while inner.events.len() > bound {
            inner.events.pop_front();
        }
        Ok(inner.events.len())
    }

    /// Register a viewer connection held by `relay`.
    pub async fn add_connection(&self, relay: RelayId, id: ConnectionId) -> Result<(), DbError> {
        self.inner
            .lock()
            .await
            .connections
            .entry(relay)
            .or_default()
            .insert(id);
        Ok(())
    }

    /// Remove a viewer connection held by `relay`.
    pub async fn remove_connection(&self, relay: RelayId, id: ConnectionId) -> Result<(), DbError> {
        let mut inner = self.inner.lock().await;
        if let Some(set) = inner.connections.get_mut(&relay) {
            set.remove(&id);
            if set.is_empty() {
                inner.connections.remove(&relay);
            }
        }
        Ok(())
    }

    /// Connection ids registered by `relay`.
    pub async fn list_connections(&self, relay: RelayId) -> Result<Vec<ConnectionId>, DbError> {
        Ok(self
            .inner
            .lock()
            .await
            .connections
            .get(&relay)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}
