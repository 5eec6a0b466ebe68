//! Enumeration types shared between the parser, relay, and viewers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Domain event kinds
// ---------------------------------------------------------------------------

/// The semantic type of a [`GameEvent`](crate::GameEvent).
///
/// Serialized with the human-readable names the live scoreboard keys on
/// (`"game start"`, `"base hit"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// The match started; one per known player.
    #[serde(rename = "game start")]
    GameStart,
    /// The match ended; one per known player.
    #[serde(rename = "game end")]
    GameEnd,
    /// The entity deactivated the target.
    #[serde(rename = "tag")]
    Tag,
    /// The entity was deactivated by the target.
    #[serde(rename = "tagged")]
    Tagged,
    /// The entity hit a base owned by the target team.
    #[serde(rename = "base hit")]
    BaseHit,
    /// The entity destroyed a base owned by the target team.
    #[serde(rename = "base destroy")]
    BaseDestroy,
    /// The entity denied the target.
    #[serde(rename = "deny")]
    Deny,
    /// The entity was denied by the target.
    #[serde(rename = "denied")]
    Denied,
    /// The entity was penalised.
    #[serde(rename = "penalty")]
    Penalty,
}

impl EventKind {
    /// Wire name of this kind, as it appears in the `type` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GameStart => "game start",
            Self::GameEnd => "game end",
            Self::Tag => "tag",
            Self::Tagged => "tagged",
            Self::BaseHit => "base hit",
            Self::BaseDestroy => "base destroy",
            Self::Deny => "deny",
            Self::Denied => "denied",
            Self::Penalty => "penalty",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transport actions
// ---------------------------------------------------------------------------

/// Route key carried in the `action` field of an [`Envelope`](crate::Envelope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// A full game metadata snapshot.
    Metadata,
    /// A single domain event.
    Event,
    /// A request to resend cached metadata and history to the sender.
    Replay,
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Metadata => f.write_str("metadata"),
            Self::Event => f.write_str("event"),
            Self::Replay => f.write_str("replay"),
        }
    }
}
