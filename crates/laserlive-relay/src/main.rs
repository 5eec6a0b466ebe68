//! Relay binary for LaserLive.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the environment (fatal if incomplete)
//! 3. Connect to the live state store
//! 4. Serve HTTP and `WebSocket` until terminated

use std::sync::Arc;

use laserlive_db::{DragonflyPool, LiveCache, LiveStore, MemoryStore};
use laserlive_relay::{AppState, RelayConfig, StoreBackend, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("laserlive-relay starting");

    let config = RelayConfig::from_env()?;
    info!(
        state_key = config.state_key,
        max_event_history = config.max_event_history,
        outbound_queue = config.outbound_queue,
        "Configuration loaded"
    );

    let store = match &config.store {
        StoreBackend::Dragonfly { url } => {
            LiveStore::from(DragonflyPool::connect(url, &config.state_key).await?)
        }
        StoreBackend::Memory => LiveStore::from(MemoryStore::new()),
    };
    info!(backend = store.name(), "Live store ready");

    let cache = LiveCache::new(store.clone(), config.max_event_history)?;
    let state = Arc::new(AppState::new(store, cache, config.outbound_queue));
    info!(relay = %state.relay, "Relay identity assigned");

    start_server(&config.host, config.port, state).await?;

    info!("laserlive-relay stopped");
    Ok(())
}
