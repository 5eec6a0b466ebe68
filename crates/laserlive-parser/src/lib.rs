//! Incremental parser for live laser-combat telemetry (TDF) logs.
//!
//! A TDF log is an append-only, tab-delimited text file that declares its
//! own record schemas inline. This crate turns it, one line at a time,
//! into [`OutputItem`]s: metadata snapshots and semantic domain events.
//!
//! # Pipeline
//!
//! ```text
//! line --> SectionMap + decode_line --> RawRow
//!            |                            |
//!            |                 +----------+-----------+
//!            |                 v                      v
//!            |           RosterTracker         LookbackWindow
//!            |                 |                      |
//!            |                 v                      v
//!            |         GameMetadata        events_from_event_row
//!            +---------------> Vec<OutputItem> <------+
//! ```
//!
//! # Modules
//!
//! - [`section`] -- Section schemas and the header classifier
//! - [`row`] -- Line tokenizing and row decoding
//! - [`code`] -- Raw event type codes
//! - [`window`] -- Fixed-capacity lookback ring buffer
//! - [`roster`] -- Teams, players, bases, metadata snapshots
//! - [`reconstruct`] -- Composite event reconstruction
//! - [`stream`] -- [`TdfStream`], the per-game parser state
//!
//! [`OutputItem`]: laserlive_types::OutputItem

pub mod code;
pub mod reconstruct;
pub mod roster;
pub mod row;
pub mod section;
pub mod stream;
pub mod window;

// Re-export primary types for convenience.
pub use code::{Composite, EventCode};
pub use roster::RosterTracker;
pub use row::{Line, RawRow, decode_line};
pub use section::{Section, SectionMap};
pub use stream::TdfStream;
pub use window::{LookbackWindow, WINDOW_CAPACITY};
