//! Integration tests for the `Dragonfly` backend.
//!
//! These tests require a live Dragonfly (or Redis) instance. Run with:
//!
//! ```bash
//! docker run -d -p 6379:6379 docker.dragonflydb.io/dragonflydb/dragonfly
//! cargo test -p laserlive-db -- --ignored
//! ```
//!
//! All tests are marked `#[ignore]` so they are skipped during normal
//! `cargo test` runs.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::BTreeMap;

use laserlive_db::{ConnectionRegistry, DragonflyPool, LiveCache, LiveStore};
use laserlive_types::{ConnectionId, EventKind, GameEvent, GameMetadata, RelayId};

/// Dragonfly connection URL for the local Docker instance.
const DRAGONFLY_URL: &str = "redis://localhost:6379";

async fn connect(state_key: &str) -> DragonflyPool {
    let pool = DragonflyPool::connect(DRAGONFLY_URL, state_key)
        .await
        .expect("Failed to connect to Dragonfly -- is Docker running?");
    pool.flush_all().await.expect("Failed to flush");
    pool
}

fn event(n: u32) -> GameEvent {
    GameEvent {
        time: f64::from(n) + 0.001,
        entity: format!("P{n}"),
        target: String::from("P0"),
        kind: EventKind::Tagged,
        delta: -i64::from(n),
    }
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance"]
async fn dragonfly_append_trims_atomically() {
    let pool = connect("trim-test").await;
    let cache = LiveCache::new(LiveStore::from(pool.clone()), 600).unwrap();

    for n in 0..650 {
        cache.append_event(&event(n)).await.unwrap();
    }

    let events = cache.get().await.unwrap().decoded_events();
    assert_eq!(events.len(), 600);
    assert_eq!(events[0], event(50));
    assert_eq!(events[599], event(649));

    pool.flush_all().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance"]
async fn dragonfly_metadata_resets_events() {
    let pool = connect("reset-test").await;
    let cache = LiveCache::with_default_bound(LiveStore::from(pool.clone()));

    let metadata = GameMetadata {
        game_duration: 600,
        penalty: 0,
        start_time: String::from("2025-01-01 12:00"),
        game_type: String::from("TDM"),
        teams: Vec::new(),
        players: BTreeMap::new(),
        bases: BTreeMap::new(),
    };

    assert!(cache.get().await.unwrap().metadata.is_none());
    cache.append_event(&event(1)).await.unwrap();
    cache.set_metadata(&metadata).await.unwrap();

    let state = cache.get().await.unwrap();
    assert_eq!(state.metadata, Some(metadata));
    assert!(state.events.is_empty());

    pool.flush_all().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance"]
async fn dragonfly_registry_round_trip() {
    let pool = connect("registry-test").await;
    let registry = ConnectionRegistry::new(LiveStore::from(pool.clone()), RelayId::new());
    let other = ConnectionRegistry::new(LiveStore::from(pool.clone()), RelayId::new());
    let id = ConnectionId::new();

    registry.add(id).await.unwrap();
    assert_eq!(registry.list().await.unwrap(), vec![id]);
    assert!(other.list().await.unwrap().is_empty());
    registry.remove(id).await.unwrap();
    assert!(registry.list().await.unwrap().is_empty());

    pool.flush_all().await.unwrap();
}
