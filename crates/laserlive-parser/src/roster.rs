//! Team, player, and base registries plus the metadata snapshot.
//!
//! The tracker consumes `mission`, `team`, and `entity-start` rows. Once
//! the mission is known and at least one team and one player exist, it
//! hands out a full [`GameMetadata`] snapshot, and again whenever the
//! number of players or bases grows (late joiners).

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use laserlive_types::{Base, GameMetadata, Player, Team};
use tracing::{debug, warn};

use crate::row::RawRow;
use crate::section::Section;

/// Layout of the mission `start` field.
const START_FORMAT: &str = "%Y%m%d%H%M%S";

/// Layout of [`GameMetadata::start_time`].
const START_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Entity type discriminator for players.
const ENTITY_PLAYER: &str = "player";

/// Entity type discriminator for bases.
const ENTITY_BASE: &str = "standard-target";

/// Canonical id, name, and colour for yellow-declared teams.
const CANONICAL_GREEN: (&str, &str, &str) = ("green", "Green Team", "#008140");

/// Roster and mission state for one game.
#[derive(Debug, Clone, Default)]
pub struct RosterTracker {
    mission: Option<RawRow>,
    /// Teams in first-declaration order; redeclared indexes replace in place.
    teams: Vec<Team>,
    players: BTreeMap<String, Player>,
    /// Player ids in the order they first appeared.
    join_order: Vec<String>,
    bases: BTreeMap<String, Base>,
    /// `(players, bases)` at the last emitted snapshot.
    last_emitted: Option<(usize, usize)>,
}

/// Apply the team naming rules to one `team` row.
///
/// `Neutral` teams are dropped; `Yellow` teams are presented as the green
/// team; everything else keeps its description and colour, with the id
/// taken from the first word of the description.
pub fn canonical_team(index: &str, desc: &str, rgb: &str) -> Option<Team> {
    if desc.contains("Neutral") {
        return None;
    }

    if desc.contains("Yellow") {
        let (id, name, color) = CANONICAL_GREEN;
        return Some(Team {
            id: id.to_owned(),
            index: index.to_owned(),
            name: name.to_owned(),
            color: color.to_owned(),
        });
    }

    let id = desc
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    Some(Team {
        id,
        index: index.to_owned(),
        name: desc.to_owned(),
        color: rgb.to_owned(),
    })
}

impl RosterTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a decoded row into the roster.
    ///
    /// Returns `true` if the row belonged to a roster section.
    pub fn apply(&mut self, row: &RawRow) -> bool {
        match row.section {
            Section::Mission => {
                self.mission = Some(row.clone());
                true
            }
            Section::Team => {
                self.apply_team(row);
                true
            }
            Section::EntityStart => {
                self.apply_entity(row);
                true
            }
            Section::Info
            | Section::Event
            | Section::PlayerState
            | Section::Score
            | Section::EntityEnd => false,
        }
    }

    fn apply_team(&mut self, row: &RawRow) {
        let index = row.get_or_empty("index");
        let Some(team) = canonical_team(index, row.get_or_empty("desc"), row.get_or_empty("colour-rgb"))
        else {
            debug!(index, "dropping neutral team");
            return;
        };

        match self.teams.iter_mut().find(|existing| existing.index == index) {
            Some(existing) => *existing = team,
            None => self.teams.push(team),
        }
    }

    fn apply_entity(&mut self, row: &RawRow) {
        let id = row.get_or_empty("id");
        let name = row.get_or_empty("desc");

        match row.get_or_empty("type") {
            ENTITY_PLAYER => {
                if let Some(existing) = self.players.get_mut(id) {
                    name.clone_into(&mut existing.name);
                } else {
                    let team = self.resolve_team(row.get_or_empty("team"));
                    self.join_order.push(id.to_owned());
                    self.players.insert(
                        id.to_owned(),
                        Player {
                            id: id.to_owned(),
                            name: name.to_owned(),
                            team,
                        },
                    );
                }
            }
            ENTITY_BASE => {
                if let Some(existing) = self.bases.get_mut(id) {
                    name.clone_into(&mut existing.name);
                } else {
                    let team = self.resolve_team(row.get_or_empty("team"));
                    self.bases.insert(
                        id.to_owned(),
                        Base {
                            id: id.to_owned(),
                            name: name.to_owned(),
                            team,
                        },
                    );
                }
            }
            _ => {}
        }
    }

    /// Team id for `index` as the team table stands right now, or empty.
    fn resolve_team(&self, index: &str) -> String {
        self.teams
            .iter()
            .find(|team| team.index == index)
            .map(|team| team.id.clone())
            .unwrap_or_default()
    }

    /// Mission present, at least one team, at least one player.
    pub fn is_ready(&self) -> bool {
        self.mission.is_some() && !self.teams.is_empty() && !self.players.is_empty()
    }

    /// Known players keyed by id.
    pub const fn players(&self) -> &BTreeMap<String, Player> {
        &self.players
    }

    /// Known players in the order they joined.
    pub fn players_in_join_order(&self) -> impl Iterator<Item = &Player> {
        self.join_order.iter().filter_map(|id| self.players.get(id))
    }

    /// Known bases keyed by id.
    pub const fn bases(&self) -> &BTreeMap<String, Base> {
        &self.bases
    }

    /// Known teams in declaration order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Team id owning the base `base_id`, or empty if unknown.
    pub fn team_of_base(&self, base_id: &str) -> String {
        self.bases
            .get(base_id)
            .map(|base| base.team.clone())
            .unwrap_or_default()
    }

    /// A fresh snapshot if one is due, recording it as emitted.
    ///
    /// Due means: ready, and either nothing was emitted yet or the player
    /// or base count grew since the last emission.
    pub fn take_snapshot(&mut self) -> Option<GameMetadata> {
        if !self.is_ready() {
            return None;
        }

        let counts = (self.players.len(), self.bases.len());
        let due = self
            .last_emitted
            .is_none_or(|(players, bases)| counts.0 > players || counts.1 > bases);
        if !due {
            return None;
        }

        let metadata = self.build_metadata()?;
        self.last_emitted = Some(counts);
        debug!(players = counts.0, bases = counts.1, "metadata snapshot emitted");
        Some(metadata)
    }

    /// Build the full snapshot from the current state.
    pub fn build_metadata(&self) -> Option<GameMetadata> {
        let mission = self.mission.as_ref()?;

        Some(GameMetadata {
            game_duration: parse_number(mission, "duration") / 1000,
            penalty: parse_number(mission, "penalty"),
            start_time: format_start(mission.get_or_empty("start")),
            game_type: mission.get_or_empty("desc").to_owned(),
            teams: self.teams.clone(),
            players: self.players.clone(),
            bases: self.bases.clone(),
        })
    }
}

/// Integer mission field, degrading to zero.
fn parse_number(mission: &RawRow, field: &str) -> i64 {
    let raw = mission.get_or_empty(field);
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(field, raw, "mission field is not an integer, using 0");
        0
    })
}

/// `YYYYMMDDHHMMSS` to `YYYY-MM-DD HH:MM`.
///
/// Values that are not a full timestamp but start with twelve digits are
/// sliced positionally; anything else passes through.
fn format_start(raw: &str) -> String {
    if let Ok(start) = NaiveDateTime::parse_from_str(raw.trim(), START_FORMAT) {
        return start.format(START_DISPLAY_FORMAT).to_string();
    }
    slice_start(raw.trim()).unwrap_or_else(|| {
        warn!(raw, "mission start is not a timestamp, passing through");
        raw.to_owned()
    })
}

/// Positional `YYYY-MM-DD HH:MM` from the first twelve digits of `raw`.
fn slice_start(raw: &str) -> Option<String> {
    let digits = raw.get(..12)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!(
        "{}-{}-{} {}:{}",
        digits.get(0..4)?,
        digits.get(4..6)?,
        digits.get(6..8)?,
        digits.get(8..10)?,
        digits.get(10..12)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> RawRow {
        RawRow::new(
            Section::Mission,
            [
                ("type", String::from("0")),
                ("desc", String::from("Team Deathmatch")),
                ("start", String::from("20250223183301")),
                ("duration", String::from("900500")),
                ("penalty", String::from("-1000")),
            ],
        )
    }

    fn team(index: &str, desc: &str, rgb: &str) -> RawRow {
        RawRow::new(
            Section::Team,
            [
                ("index", index.to_owned()),
                ("desc", desc.to_owned()),
                ("colour-rgb", rgb.to_owned()),
            ],
        )
    }

    fn entity(id: &str, kind: &str, team: &str) -> RawRow {
        RawRow::new(
            Section::EntityStart,
            [
                ("id", id.to_owned()),
                ("type", kind.to_owned()),
                ("desc", format!("{id}-name")),
                ("team", team.to_owned()),
            ],
        )
    }

    #[test]
    fn yellow_is_canonicalised_to_green() {
        let team = canonical_team("1", "Yellow Team", "#ffff00");
        assert_eq!(
            team,
            Some(Team {
                id: String::from("green"),
                index: String::from("1"),
                name: String::from("Green Team"),
                color: String::from("#008140"),
            })
        );
    }

    #[test]
    fn neutral_is_dropped() {
        assert_eq!(canonical_team("2", "Neutral", "#888888"), None);

        let mut roster = RosterTracker::new();
        roster.apply(&team("2", "Neutral", "#888888"));
        assert!(roster.teams().is_empty());
    }

    #[test]
    fn other_teams_use_first_word() {
        let team = canonical_team("0", "Red Team", "#ff0000");
        assert_eq!(team.as_ref().map(|t| t.id.as_str()), Some("red"));
        assert_eq!(team.as_ref().map(|t| t.color.as_str()), Some("#ff0000"));
    }

    #[test]
    fn not_ready_until_mission_team_and_player() {
        let mut roster = RosterTracker::new();
        roster.apply(&mission());
        assert!(roster.take_snapshot().is_none());
        roster.apply(&team("0", "Red Team", "#ff0000"));
        assert!(roster.take_snapshot().is_none());
        roster.apply(&entity("B1", ENTITY_BASE, "0"));
        assert!(roster.take_snapshot().is_none());
        roster.apply(&entity("P1", ENTITY_PLAYER, "0"));
        assert!(roster.take_snapshot().is_some());
    }

    #[test]
    fn snapshot_only_on_growth() {
        let mut roster = RosterTracker::new();
        roster.apply(&mission());
        roster.apply(&team("0", "Red Team", "#ff0000"));
        roster.apply(&entity("P1", ENTITY_PLAYER, "0"));
        assert!(roster.take_snapshot().is_some());

        // Redeclaring a known player changes nothing countable.
        roster.apply(&entity("P1", ENTITY_PLAYER, "0"));
        assert!(roster.take_snapshot().is_none());

        roster.apply(&entity("P2", ENTITY_PLAYER, "0"));
        let snapshot = roster.take_snapshot();
        assert_eq!(snapshot.map(|m| m.players.len()), Some(2));
        assert!(roster.take_snapshot().is_none());

        roster.apply(&entity("B1", ENTITY_BASE, "0"));
        assert_eq!(roster.take_snapshot().map(|m| m.bases.len()), Some(1));
    }

    #[test]
    fn team_resolved_at_creation_only() {
        let mut roster = RosterTracker::new();
        roster.apply(&entity("P1", ENTITY_PLAYER, "3"));
        roster.apply(&team("3", "Blue Team", "#0000ff"));
        roster.apply(&entity("P1", ENTITY_PLAYER, "3"));
        assert_eq!(roster.players().get("P1").map(|p| p.team.as_str()), Some(""));

        roster.apply(&entity("P2", ENTITY_PLAYER, "3"));
        assert_eq!(roster.players().get("P2").map(|p| p.team.as_str()), Some("blue"));
    }

    #[test]
    fn metadata_fields_are_converted() {
        let mut roster = RosterTracker::new();
        roster.apply(&mission());
        roster.apply(&team("0", "Red Team", "#ff0000"));
        roster.apply(&entity("P1", ENTITY_PLAYER, "0"));

        let metadata = roster.build_metadata();
        assert_eq!(metadata.as_ref().map(|m| m.game_duration), Some(900));
        assert_eq!(metadata.as_ref().map(|m| m.penalty), Some(-1000));
        assert_eq!(
            metadata.as_ref().map(|m| m.start_time.as_str()),
            Some("2025-02-23 18:33")
        );
        assert_eq!(
            metadata.as_ref().map(|m| m.game_type.as_str()),
            Some("Team Deathmatch")
        );
    }

    #[test]
    fn twelve_digit_start_is_sliced() {
        assert_eq!(format_start("202501011200"), "2025-01-01 12:00");
        // Out-of-range fields are not validated, only repositioned.
        assert_eq!(format_start("20251399996000"), "2025-13-99 99:60");
        assert_eq!(format_start("2025-01-01"), "2025-01-01");
        assert_eq!(format_start(""), "");
    }

    #[test]
    fn players_keep_join_order() {
        let mut roster = RosterTracker::new();
        roster.apply(&entity("P9", ENTITY_PLAYER, "0"));
        roster.apply(&entity("P1", ENTITY_PLAYER, "0"));
        roster.apply(&entity("P5", ENTITY_PLAYER, "0"));
        roster.apply(&entity("P1", ENTITY_PLAYER, "0"));
        let ids: Vec<&str> = roster.players_in_join_order().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["P9", "P1", "P5"]);
    }

    #[test]
    fn redeclared_team_keeps_position() {
        let mut roster = RosterTracker::new();
        roster.apply(&team("0", "Red Team", "#ff0000"));
        roster.apply(&team("1", "Blue Team", "#0000ff"));
        roster.apply(&team("0", "Orange Team", "#ff8800"));
        let ids: Vec<&str> = roster.teams().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["orange", "blue"]);
    }
}
