//! Live state cache for the in-flight game.
//!
//! Recording metadata starts a new game: the history is cleared in the
//! same step. Appending an event trims the history to its bound in the
//! same step. Both steps are atomic in every backend.

use laserlive_types::{GameEvent, GameMetadata};
use tracing::debug;

use crate::error::DbError;
use crate::state::{CachedState, DEFAULT_MAX_EVENT_HISTORY, encode_event};
use crate::store::LiveStore;

/// Bounded metadata + event cache over a [`LiveStore`].
#[derive(Clone)]
pub struct LiveCache {
    store: LiveStore,
    max_event_history: usize,
}

impl LiveCache {
    /// Create a cache holding at most `max_event_history` events.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the bound is zero.
    pub fn new(store: LiveStore, max_event_history: usize) -> Result<Self, DbError> {
        if max_event_history == 0 {
            return Err(DbError::Config(String::from(
                "max event history must be at least 1",
            )));
        }
        Ok(Self {
            store,
            max_event_history,
        })
    }

    /// Create a cache with the default bound.
    pub const fn with_default_bound(store: LiveStore) -> Self {
        Self {
            store,
            max_event_history: DEFAULT_MAX_EVENT_HISTORY,
        }
    }

    /// The configured history bound.
    pub const fn max_event_history(&self) -> usize {
        self.max_event_history
    }

    /// Read the cached state without modifying it.
    pub async fn get(&self) -> Result<CachedState, DbError> {
        self.store.get_state().await
    }

    /// Record a new metadata snapshot, discarding the previous history.
    pub async fn set_metadata(&self, metadata: &GameMetadata) -> Result<(), DbError> {
        self.store.set_metadata(metadata).await?;
        debug!(
            players = metadata.players.len(),
            bases = metadata.bases.len(),
            "metadata cached, event history reset"
        );
        Ok(())
    }

    /// Append an event, dropping the oldest entries beyond the bound.
    ///
    /// Returns the history length after the append.
    pub async fn append_event(&self, event: &GameEvent) -> Result<usize, DbError> {
        let serialized = encode_event(event)?;
        self.store
            .append_event_with_trim(&serialized, self.max_event_history)
            .await
    }
}
