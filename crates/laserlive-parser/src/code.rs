//! Raw event type codes carried by `event` rows.
//!
//! The lookup table is the single place a wire code is mapped to a
//! variant; everything downstream matches exhaustively on [`EventCode`].

/// Raw type codes the reconstructor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    /// `0100` -- mission start.
    MissionStart,
    /// `0101` -- mission end.
    MissionEnd,
    /// `0201` -- shot missed.
    Miss,
    /// `0203` -- base hit.
    BaseHit,
    /// `0204` -- base destroyed.
    BaseDestroy,
    /// `0206` -- player deactivated.
    Deactivation,
    /// `0207` -- player stunned.
    Stun,
    /// `0208` -- player deactivated (alternate form).
    DeactivationAlt,
    /// `0500` -- reload.
    Reload,
    /// `0600` -- penalty.
    Penalty,
    /// `0902` -- achievement.
    Achievement,
    /// `0B01` -- deny.
    Deny,
    /// `0B02` -- deny (alternate form).
    DenyAlt,
}

/// Wire code for every variant.
const CODES: [(&str, EventCode); 13] = [
    ("0100", EventCode::MissionStart),
    ("0101", EventCode::MissionEnd),
    ("0201", EventCode::Miss),
    ("0203", EventCode::BaseHit),
    ("0204", EventCode::BaseDestroy),
    ("0206", EventCode::Deactivation),
    ("0207", EventCode::Stun),
    ("0208", EventCode::DeactivationAlt),
    ("0500", EventCode::Reload),
    ("0600", EventCode::Penalty),
    ("0902", EventCode::Achievement),
    ("0B01", EventCode::Deny),
    ("0B02", EventCode::DenyAlt),
];

/// Which composite event a code reconstructs, and how many preceding
/// `score` rows it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    /// One `game start` per known player.
    GameStart,
    /// One `game end` per known player.
    GameEnd,
    /// `tag` + `tagged` from the two preceding score rows.
    Deactivation,
    /// `base hit` from the preceding score row.
    BaseHit,
    /// `base destroy` from the preceding score row.
    BaseDestroy,
    /// `deny` + `denied` from the preceding score row.
    Deny,
    /// `penalty` from the preceding score row.
    Penalty,
}

impl Composite {
    /// Number of preceding `score` rows this composite correlates.
    pub const fn required_scores(self) -> usize {
        match self {
            Self::GameStart | Self::GameEnd => 0,
            Self::BaseHit | Self::BaseDestroy | Self::Deny | Self::Penalty => 1,
            Self::Deactivation => 2,
        }
    }
}

impl EventCode {
    /// Look up a wire code. Unknown codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        CODES
            .iter()
            .find(|(wire, _)| *wire == code)
            .map(|&(_, variant)| variant)
    }

    /// The wire code of this variant.
    pub fn code(self) -> &'static str {
        CODES
            .iter()
            .find(|(_, variant)| *variant == self)
            .map_or("", |&(wire, _)| wire)
    }

    /// The composite event this code reconstructs, if any.
    pub const fn composite(self) -> Option<Composite> {
        match self {
            Self::MissionStart => Some(Composite::GameStart),
            Self::MissionEnd => Some(Composite::GameEnd),
            Self::Deactivation | Self::DeactivationAlt => Some(Composite::Deactivation),
            Self::BaseHit => Some(Composite::BaseHit),
            Self::BaseDestroy => Some(Composite::BaseDestroy),
            Self::Deny | Self::DenyAlt => Some(Composite::Deny),
            Self::Penalty => Some(Composite::Penalty),
            Self::Miss | Self::Stun | Self::Reload | Self::Achievement => None,
        }
    }
}
