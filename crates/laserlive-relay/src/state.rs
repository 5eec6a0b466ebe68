//! Shared application state for the relay.
//!
//! [`AppState`] ties the store-backed cache and registry to the local
//! [`ConnectionHub`]. Everything handlers agree on lives in the store;
//! the hub only holds the outbound queues of sockets owned by this
//! process.

use std::sync::Arc;

use laserlive_db::{ConnectionRegistry, LiveCache, LiveStore};
use laserlive_types::RelayId;

use crate::broadcast::Broadcaster;
use crate::hub::ConnectionHub;
use crate::replay::ReplayResponder;

/// Default per-connection outbound queue capacity.
pub const DEFAULT_OUTBOUND_QUEUE: usize = 1024;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Identity of this relay process; scopes the registry.
    pub relay: RelayId,
    /// Metadata and event history of the current game.
    pub cache: LiveCache,
    /// Open viewer connections held by this relay.
    pub registry: ConnectionRegistry,
    /// Outbound queues of sockets held by this process.
    pub hub: ConnectionHub,
    /// Fan-out to every registered connection.
    pub broadcaster: Broadcaster,
    /// Per-connection replay of cached state.
    pub replay: ReplayResponder,
    /// Capacity of each connection's outbound queue.
    pub outbound_queue: usize,
}

impl AppState {
    /// Build the state over a store and an already-bounded cache.
    ///
    /// Every call mints a fresh [`RelayId`], so two states over one store
    /// behave as two independent relays.
    pub fn new(store: LiveStore, cache: LiveCache, outbound_queue: usize) -> Self {
        let relay = RelayId::new();
        let registry = ConnectionRegistry::new(store, relay);
        let hub = ConnectionHub::new();
        Self {
            relay,
            broadcaster: Broadcaster::new(registry.clone(), hub.clone()),
            replay: ReplayResponder::new(cache.clone(), hub.clone()),
            cache,
            registry,
            hub,
            outbound_queue,
        }
    }

    /// Build the state with the default cache bound and queue capacity.
    pub fn with_defaults(store: LiveStore) -> Arc<Self> {
        let cache = LiveCache::with_default_bound(store.clone());
        Arc::new(Self::new(store, cache, DEFAULT_OUTBOUND_QUEUE))
    }
}
