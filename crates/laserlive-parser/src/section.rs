//! Section schemas and the inline header classifier.
//!
//! A TDF log declares its own record layouts. Header lines look like
//! `;4/event time type varies` and bind the numeric code `4` to the
//! `event` schema; every later data line starting with `4` is decoded
//! against that schema. Codes may be rebound by a later header (last
//! declaration wins).

use std::collections::HashMap;

/// Character that opens a header declaration token.
pub const HEADER_MARKER: char = ';';

/// Separator between the code and the section name in a header token.
pub const HEADER_SEPARATOR: char = '/';

/// The eight record schemas known to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// File and program version information.
    Info,
    /// The single mission row: game type, start, duration, penalty.
    Mission,
    /// One row per team.
    Team,
    /// Timestamped gameplay events with a free-form payload.
    Event,
    /// An entity (player or base) entering the game.
    EntityStart,
    /// Player state transitions.
    PlayerState,
    /// Score changes; correlated with the following event row.
    Score,
    /// An entity leaving the game.
    EntityEnd,
}

impl Section {
    /// Every known section, in declaration order of a typical log.
    pub const ALL: [Self; 8] = [
        Self::Info,
        Self::Mission,
        Self::Team,
        Self::EntityStart,
        Self::Event,
        Self::PlayerState,
        Self::Score,
        Self::EntityEnd,
    ];

    /// Look up a section by its header name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.name() == name)
    }

    /// The header name of this section.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Mission => "mission",
            Self::Team => "team",
            Self::Event => "event",
            Self::EntityStart => "entity-start",
            Self::PlayerState => "player-state",
            Self::Score => "score",
            Self::EntityEnd => "entity-end",
        }
    }

    /// Ordered field names of this section's schema.
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Info => &["file-version", "program-version", "centre"],
            Self::Mission => &["type", "desc", "start", "duration", "penalty"],
            Self::Team => &["index", "desc", "colour-enum", "colour-desc", "colour-rgb"],
            Self::Event => &["time", "type", "varies"],
            Self::EntityStart => &[
                "time",
                "id",
                "type",
                "desc",
                "team",
                "level",
                "category",
                "battlesuit",
                "memberId",
            ],
            Self::PlayerState => &["time", "entity", "state"],
            Self::Score => &["time", "entity", "old", "delta", "new"],
            Self::EntityEnd => &["time", "id", "type", "score"],
        }
    }
}

impl core::fmt::Display for Section {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutable code-to-section bindings for one log.
#[derive(Debug, Clone, Default)]
pub struct SectionMap {
    codes: HashMap<String, Section>,
}

impl SectionMap {
    /// Create an empty map; no codes are bound until headers arrive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a header token (the first tab-separated token of a line).
    ///
    /// Returns `true` if the token is a header declaration, whether or
    /// not it named a known section. Unknown names leave the current
    /// bindings untouched.
    pub fn declare(&mut self, token: &str) -> bool {
        let Some(declaration) = token.strip_prefix(HEADER_MARKER) else {
            return false;
        };

        if let Some((code, rest)) = declaration.split_once(HEADER_SEPARATOR)
            && let Some(section) = rest.split_whitespace().next().and_then(Section::from_name)
        {
            self.codes.insert(code.to_owned(), section);
        }

        true
    }

    /// The section currently bound to `code`, if any.
    pub fn lookup(&self, code: &str) -> Option<Section> {
        self.codes.get(code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_binds_code_to_section() {
        let mut map = SectionMap::new();
        assert!(map.declare(";4/event time type varies"));
        assert_eq!(map.lookup("4"), Some(Section::Event));
        assert_eq!(map.lookup("5"), None);
    }

    #[test]
    fn later_declaration_wins() {
        let mut map = SectionMap::new();
        map.declare(";4/event");
        map.declare(";4/score");
        assert_eq!(map.lookup("4"), Some(Section::Score));
    }

    #[test]
    fn unknown_section_is_consumed_but_ignored() {
        let mut map = SectionMap::new();
        map.declare(";3/entity-start");
        assert!(map.declare(";3/hologram"));
        assert_eq!(map.lookup("3"), Some(Section::EntityStart));
    }

    #[test]
    fn data_token_is_not_a_header() {
        let mut map = SectionMap::new();
        assert!(!map.declare("4"));
        assert!(map.declare(";malformed"));
    }

    #[test]
    fn every_section_round_trips_by_name() {
        for section in Section::ALL {
            assert_eq!(Section::from_name(section.name()), Some(section));
        }
    }
}
