//! Live relay between the telemetry feed and match viewers.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) used by both the feed (publishing
//!   `metadata` and `event` frames) and viewers (receiving broadcasts and
//!   asking for `replay`)
//! - **REST endpoints** for status and the cached game state
//!
//! # Architecture
//!
//! ```text
//! feed --frame--> routes --> LiveCache (store) --+
//!                        \                       |
//!                         +--> Broadcaster ------+--> ConnectionHub --> viewer sockets
//! viewer --replay--> ReplayResponder ---------------> ConnectionHub --> that socket
//! ```
//!
//! The cache and the connection registry live in the store (see
//! `laserlive-db`); the hub holds only the outbound queues of sockets
//! this process owns.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod handlers;
pub mod hub;
pub mod replay;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use broadcast::{BroadcastReport, Broadcaster};
pub use config::{RelayConfig, StoreBackend};
pub use error::RelayError;
pub use hub::{ConnectionHub, DeliveryError};
pub use replay::{ReplayReport, ReplayResponder};
pub use router::build_router;
pub use routes::{Routed, route_frame};
pub use server::start_server;
pub use state::AppState;
pub use ws::{close_connection, open_connection};
