//! Per-game streaming parser state.
//!
//! [`TdfStream`] owns every piece of state the parser needs for one log:
//! section bindings, the roster, and the lookback window. Feeding it the
//! same lines in the same order always yields the same items, so several
//! games can be parsed side by side with one instance each.

use laserlive_types::OutputItem;

use crate::reconstruct::events_from_event_row;
use crate::roster::RosterTracker;
use crate::row::{Line, decode_line};
use crate::section::{Section, SectionMap};
use crate::window::LookbackWindow;

/// Incremental parser for one TDF log.
#[derive(Debug, Clone, Default)]
pub struct TdfStream {
    sections: SectionMap,
    roster: RosterTracker,
    window: LookbackWindow,
    lines_seen: u64,
}

impl TdfStream {
    /// Create a parser with no headers seen yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the next line of the log.
    ///
    /// Returns the items the line produced: a metadata snapshot first if
    /// one became due, then any domain events. Most lines produce nothing.
    pub fn process_line(&mut self, line: &str) -> Vec<OutputItem> {
        self.lines_seen = self.lines_seen.saturating_add(1);

        let Line::Row(row) = decode_line(&mut self.sections, line) else {
            return Vec::new();
        };

        self.window.push(row.clone());
        let mut items = Vec::new();

        if self.roster.apply(&row)
            && let Some(metadata) = self.roster.take_snapshot()
        {
            items.push(OutputItem::Metadata(metadata));
        }

        if row.section == Section::Event {
            items.extend(
                events_from_event_row(&row, &self.window, &self.roster)
                    .into_iter()
                    .map(OutputItem::Event),
            );
        }

        items
    }

    /// Process every line of `text` in order.
    pub fn process_text(&mut self, text: &str) -> Vec<OutputItem> {
        text.lines()
            .flat_map(|line| self.process_line(line))
            .collect()
    }

    /// The roster as it currently stands.
    pub const fn roster(&self) -> &RosterTracker {
        &self.roster
    }

    /// Number of lines processed so far, including headers and blanks.
    pub const fn lines_seen(&self) -> u64 {
        self.lines_seen
    }
}
