//! Roster, metadata, and event structs emitted by the parser.
//!
//! Field names follow the JSON shape the live scoreboard consumes
//! (`gameDuration`, `startTime`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::EventKind;

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Read an optional string, mapping `null` and absence to empty.
///
/// Publishers other than the bundled feed send `null` for an unresolved
/// team or a missing target.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A team taking part in the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Team {
    /// Short identifier, e.g. `"red"`, `"green"`.
    pub id: String,
    /// Team index as declared in the log; players and bases refer to it.
    pub index: String,
    /// Display name, e.g. `"Red Team"`.
    pub name: String,
    /// Display colour, e.g. `"#008140"`.
    pub color: String,
}

/// A player entity.
///
/// `team` is resolved once, when the player is first seen, and is empty
/// if the team index was not known at that moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Entity identifier from the log (e.g. `"#abc123"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning team id, or empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub team: String,
}

/// A base (`standard-target`) entity. Same resolution rules as [`Player`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Base {
    /// Entity identifier from the log.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning team id, or empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub team: String,
}

// ---------------------------------------------------------------------------
// Metadata snapshot
// ---------------------------------------------------------------------------

/// Full game metadata snapshot.
///
/// Always rebuilt wholesale; receivers replace their previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    /// Scheduled match length in whole seconds.
    #[ts(type = "number")]
    pub game_duration: i64,
    /// Penalty value declared by the mission row.
    #[ts(type = "number")]
    pub penalty: i64,
    /// Start time formatted as `YYYY-MM-DD HH:MM`.
    pub start_time: String,
    /// Mission description, e.g. `"Team Deathmatch"`.
    pub game_type: String,
    /// Teams in declaration order.
    pub teams: Vec<Team>,
    /// Players keyed by entity id.
    pub players: BTreeMap<String, Player>,
    /// Bases keyed by entity id.
    pub bases: BTreeMap<String, Base>,
}

// ---------------------------------------------------------------------------
// Domain events
// ---------------------------------------------------------------------------

/// A semantic domain event reconstructed from the raw log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameEvent {
    /// Seconds since the start of the log.
    pub time: f64,
    /// Acting entity id.
    pub entity: String,
    /// Target entity or team id; empty when there is none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target: String,
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Score change attributed to `entity`.
    #[ts(type = "number")]
    pub delta: i64,
}

impl GameEvent {
    /// Build an event with no target and no score change.
    pub fn untargeted(time: f64, entity: impl Into<String>, kind: EventKind) -> Self {
        Self {
            time,
            entity: entity.into(),
            target: String::new(),
            kind,
            delta: 0,
        }
    }
}

/// One item produced by the parser for a single log line.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputItem {
    /// A fresh metadata snapshot.
    Metadata(GameMetadata),
    /// A domain event.
    Event(GameEvent),
}

impl OutputItem {
    /// Return the event if this item is one.
    pub const fn as_event(&self) -> Option<&GameEvent> {
        match self {
            Self::Event(event) => Some(event),
            Self::Metadata(_) => None,
        }
    }

    /// Return the metadata snapshot if this item is one.
    pub const fn as_metadata(&self) -> Option<&GameMetadata> {
        match self {
            Self::Metadata(metadata) => Some(metadata),
            Self::Event(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn metadata_uses_camel_case_keys() {
        let metadata = GameMetadata {
            game_duration: 600,
            penalty: 0,
            start_time: String::from("2025-01-01 12:00"),
            game_type: String::from("TDM"),
            teams: Vec::new(),
            players: BTreeMap::new(),
            bases: BTreeMap::new(),
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["gameDuration"], 600);
        assert_eq!(json["startTime"], "2025-01-01 12:00");
        assert_eq!(json["gameType"], "TDM");
    }

    #[test]
    fn event_field_is_named_type() {
        let event = GameEvent {
            time: 12.5,
            entity: String::from("P1"),
            target: String::from("P2"),
            kind: EventKind::Tag,
            delta: 100,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tag");
        assert_eq!(json["time"], 12.5);

        let back: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn null_team_and_target_read_as_empty() {
        let metadata: GameMetadata = serde_json::from_value(serde_json::json!({
            "gameDuration": 600,
            "penalty": 0,
            "startTime": "2025-01-01 12:00",
            "gameType": "Solo",
            "teams": [],
            "players": { "P1": { "id": "P1", "name": "Alice", "team": null } },
            "bases": { "B1": { "id": "B1", "name": "Alpha" } }
        }))
        .unwrap();
        assert_eq!(metadata.players["P1"].team, "");
        assert_eq!(metadata.bases["B1"].team, "");

        let event: GameEvent = serde_json::from_value(serde_json::json!({
            "time": 1.0, "entity": "P1", "target": null, "type": "penalty", "delta": 0
        }))
        .unwrap();
        assert_eq!(event.target, "");
    }
}
