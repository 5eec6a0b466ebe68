//! Live state layer for the LaserLive relay.
//!
//! Relay handlers for connect, disconnect, metadata, event, and replay
//! run independently and may overlap. They share no process memory;
//! everything they agree on lives in an external store reached through
//! atomic operations.
//!
//! # Architecture
//!
//! ```text
//! Relay handlers
//!     |
//!     +-- LiveCache ---------+
//!     |   (metadata, events) |
//!     |                      +--> LiveStore --+-- DragonflyPool (Lua scripts)
//!     +-- ConnectionRegistry +                +-- MemoryStore   (tests, dev)
//! ```
//!
//! # Modules
//!
//! - [`cache`] -- Bounded metadata + event cache
//! - [`registry`] -- Open viewer connection set
//! - [`store`] -- Backend dispatch
//! - [`dragonfly`] -- `Dragonfly` (Redis-compatible) backend
//! - [`memory`] -- In-process backend
//! - [`state`] -- Cached state value and event encoding
//! - [`error`] -- Shared error types

pub mod cache;
pub mod dragonfly;
pub mod error;
pub mod memory;
pub mod registry;
pub mod state;
pub mod store;

// Re-export primary types for convenience.
pub use cache::LiveCache;
pub use dragonfly::DragonflyPool;
pub use error::DbError;
pub use memory::MemoryStore;
pub use registry::ConnectionRegistry;
pub use state::{CachedState, DEFAULT_MAX_EVENT_HISTORY, decode_event, encode_event};
pub use store::LiveStore;
