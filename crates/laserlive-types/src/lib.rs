//! Shared type definitions for the LaserLive match telemetry pipeline.
//!
//! This crate is the single source of truth for the items that flow from
//! the log parser through the relay to viewers. Viewer-facing types are
//! exported to `TypeScript` via `ts-rs` for the live scoreboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers (viewer connections)
//! - [`enums`] -- Event kinds and transport route keys
//! - [`structs`] -- Roster entries, metadata snapshot, domain events
//! - [`envelope`] -- The `{action, data}` transport frame

pub mod enums;
pub mod envelope;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Action, EventKind};
pub use envelope::Envelope;
pub use ids::{ConnectionId, RelayId};
pub use structs::{Base, GameEvent, GameMetadata, OutputItem, Player, Team};
