//! Composite event reconstruction.
//!
//! An `event` row on its own only says *what kind* of thing happened. Who
//! scored, and by how much, lives in the `score` rows written just before
//! it. This module correlates the two through the [`LookbackWindow`] and
//! turns them into [`GameEvent`]s. If a required score row is missing the
//! whole composite is dropped; nothing is emitted half-filled.

use laserlive_types::{EventKind, GameEvent};
use tracing::debug;

use crate::code::{Composite, EventCode};
use crate::roster::RosterTracker;
use crate::row::RawRow;
use crate::section::Section;
use crate::window::LookbackWindow;

/// The parts of a preceding `score` row a composite needs.
struct ScoreRef<'a> {
    entity: &'a str,
    delta: i64,
}

impl<'a> ScoreRef<'a> {
    fn from_row(row: &'a RawRow) -> Option<Self> {
        let entity = row.get("entity")?;
        let delta = row.get("delta")?.trim().parse().ok()?;
        Some(Self { entity, delta })
    }
}

/// Log milliseconds to event seconds.
#[allow(clippy::cast_precision_loss)]
fn millis_to_seconds(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

/// Build the domain events for one `event` row.
///
/// `window` must already contain `row` as its current entry.
pub fn events_from_event_row(
    row: &RawRow,
    window: &LookbackWindow,
    roster: &RosterTracker,
) -> Vec<GameEvent> {
    let Some(composite) = row
        .get("type")
        .and_then(EventCode::parse)
        .and_then(EventCode::composite)
    else {
        return Vec::new();
    };

    let Some(time) = row
        .get("time")
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(millis_to_seconds)
    else {
        debug!(time = row.get("time"), "event row without a usable time");
        return Vec::new();
    };

    let payload = row.get_or_empty("varies");
    let score = |n| {
        window
            .prev_record_of_section(Section::Score, n)
            .and_then(ScoreRef::from_row)
    };

    let events = match composite {
        Composite::GameStart => per_player(time, roster, EventKind::GameStart),
        Composite::GameEnd => per_player(time, roster, EventKind::GameEnd),
        Composite::Deactivation => deactivation(time, score(2), score(1)),
        Composite::BaseHit => base_event(time, score(1), payload, roster, EventKind::BaseHit),
        Composite::BaseDestroy => {
            base_event(time, score(1), payload, roster, EventKind::BaseDestroy)
        }
        Composite::Deny => deny(time, score(1), payload),
        Composite::Penalty => penalty(time, score(1), payload),
    };

    if events.is_empty() && composite.required_scores() > 0 {
        debug!(
            code = row.get("type"),
            time, "composite event dropped, correlated rows not in window"
        );
    }
    events
}

fn per_player(time: f64, roster: &RosterTracker, kind: EventKind) -> Vec<GameEvent> {
    roster
        .players_in_join_order()
        .map(|player| GameEvent::untargeted(time, player.id.as_str(), kind))
        .collect()
}

fn deactivation(time: f64, tagger: Option<ScoreRef<'_>>, tagged: Option<ScoreRef<'_>>) -> Vec<GameEvent> {
    let (Some(tagger), Some(tagged)) = (tagger, tagged) else {
        return Vec::new();
    };

    vec![
        GameEvent {
            time,
            entity: tagger.entity.to_owned(),
            target: tagged.entity.to_owned(),
            kind: EventKind::Tag,
            delta: tagger.delta,
        },
        GameEvent {
            time,
            entity: tagged.entity.to_owned(),
            target: tagger.entity.to_owned(),
            kind: EventKind::Tagged,
            delta: tagged.delta,
        },
    ]
}

fn base_event(
    time: f64,
    score: Option<ScoreRef<'_>>,
    payload: &str,
    roster: &RosterTracker,
    kind: EventKind,
) -> Vec<GameEvent> {
    let (Some(score), Some(base_id)) = (score, payload.split_whitespace().last()) else {
        return Vec::new();
    };

    vec![GameEvent {
        time,
        entity: score.entity.to_owned(),
        target: roster.team_of_base(base_id),
        kind,
        delta: score.delta,
    }]
}

fn deny(time: f64, score: Option<ScoreRef<'_>>, payload: &str) -> Vec<GameEvent> {
    let (Some(score), Some(denied)) = (score, payload.split_whitespace().last()) else {
        return Vec::new();
    };

    vec![
        GameEvent {
            time,
            entity: score.entity.to_owned(),
            target: denied.to_owned(),
            kind: EventKind::Deny,
            delta: score.delta,
        },
        GameEvent {
            time,
            entity: denied.to_owned(),
            target: score.entity.to_owned(),
            kind: EventKind::Denied,
            delta: 0,
        },
    ]
}

fn penalty(time: f64, score: Option<ScoreRef<'_>>, payload: &str) -> Vec<GameEvent> {
    let (Some(score), Some(penalised)) = (score, payload.split_whitespace().next()) else {
        return Vec::new();
    };

    vec![GameEvent {
        time,
        entity: penalised.to_owned(),
        target: String::new(),
        kind: EventKind::Penalty,
        delta: score.delta,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(entity: &str, delta: &str) -> RawRow {
        RawRow::new(
            Section::Score,
            [
                ("time", String::from("1000")),
                ("entity", entity.to_owned()),
                ("delta", delta.to_owned()),
            ],
        )
    }

    fn event(code: &str, payload: &str) -> RawRow {
        RawRow::new(
            Section::Event,
            [
                ("time", String::from("61500")),
                ("type", code.to_owned()),
                ("varies", payload.to_owned()),
            ],
        )
    }

    fn run(rows: Vec<RawRow>, roster: &RosterTracker) -> Vec<GameEvent> {
        let mut window = LookbackWindow::new();
        let mut last = None;
        for row in rows {
            window.push(row.clone());
            last = Some(row);
        }
        last.map(|row| events_from_event_row(&row, &window, roster))
            .unwrap_or_default()
    }

    #[test]
    fn deactivation_emits_tag_and_tagged() {
        let roster = RosterTracker::new();
        let events = run(
            vec![
                score("P1", "100"),
                score("P2", "-20"),
                event("0206", "P1 tags P2"),
            ],
            &roster,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(events.first().map(|e| e.kind), Some(EventKind::Tag));
        assert_eq!(events.first().map(|e| e.entity.as_str()), Some("P1"));
        assert_eq!(events.first().map(|e| e.target.as_str()), Some("P2"));
        assert_eq!(events.first().map(|e| e.delta), Some(100));
        assert_eq!(events.get(1).map(|e| e.kind), Some(EventKind::Tagged));
        assert_eq!(events.get(1).map(|e| e.delta), Some(-20));
        assert!(events.iter().all(|e| (e.time - 61.5).abs() < f64::EPSILON));
    }

    #[test]
    fn deactivation_with_one_score_is_dropped() {
        let roster = RosterTracker::new();
        let events = run(vec![score("P1", "100"), event("0208", "")], &roster);
        assert!(events.is_empty());
    }

    #[test]
    fn deactivation_scores_outside_window_are_dropped() {
        let roster = RosterTracker::new();
        let filler = RawRow::new(Section::PlayerState, [("entity", String::from("P3"))]);
        let events = run(
            vec![
                score("P1", "100"),
                score("P2", "-20"),
                filler.clone(),
                filler.clone(),
                filler,
                event("0206", ""),
            ],
            &roster,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn deny_emits_deny_and_zero_delta_denied() {
        let roster = RosterTracker::new();
        let events = run(vec![score("P1", "50"), event("0B01", "P1 denies P4")], &roster);
        assert_eq!(events.len(), 2);
        assert_eq!(events.first().map(|e| e.target.as_str()), Some("P4"));
        assert_eq!(events.first().map(|e| e.delta), Some(50));
        assert_eq!(events.get(1).map(|e| e.entity.as_str()), Some("P4"));
        assert_eq!(events.get(1).map(|e| e.target.as_str()), Some("P1"));
        assert_eq!(events.get(1).map(|e| e.delta), Some(0));
    }

    #[test]
    fn penalty_uses_first_payload_token() {
        let roster = RosterTracker::new();
        let events = run(vec![score("ref", "-1000"), event("0600", "P7 penalised")], &roster);
        assert_eq!(events.len(), 1);
        assert_eq!(events.first().map(|e| e.entity.as_str()), Some("P7"));
        assert_eq!(events.first().map(|e| e.target.as_str()), Some(""));
        assert_eq!(events.first().map(|e| e.delta), Some(-1000));
    }

    #[test]
    fn unknown_base_has_empty_target() {
        let roster = RosterTracker::new();
        let events = run(vec![score("P1", "1001"), event("0204", "P1 destroys B9")], &roster);
        assert_eq!(events.first().map(|e| e.kind), Some(EventKind::BaseDestroy));
        assert_eq!(events.first().map(|e| e.target.as_str()), Some(""));
    }

    #[test]
    fn ignored_and_unknown_codes_emit_nothing() {
        let roster = RosterTracker::new();
        for code in ["0201", "0500", "0207", "0902", "0FFF"] {
            let events = run(vec![score("P1", "1"), event(code, "P1")], &roster);
            assert!(events.is_empty(), "code {code} emitted events");
        }
    }

    #[test]
    fn unparseable_delta_drops_the_composite() {
        let roster = RosterTracker::new();
        let events = run(vec![score("P1", "lots"), event("0600", "P1")], &roster);
        assert!(events.is_empty());
    }

    #[test]
    fn bad_time_emits_nothing() {
        let roster = RosterTracker::new();
        let row = RawRow::new(
            Section::Event,
            [("time", String::from("soon")), ("type", String::from("0100"))],
        );
        assert!(run(vec![row], &roster).is_empty());
    }
}
