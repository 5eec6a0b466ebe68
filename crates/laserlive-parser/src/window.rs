//! Fixed-capacity trailing window of recently decoded rows.
//!
//! Composite events are spread across consecutive rows: a deactivation
//! event row is preceded by the tagger's and the tagged player's score
//! rows. The window keeps the last [`WINDOW_CAPACITY`] rows of every
//! section, newest last, and overwrites the oldest slot once full.

use crate::row::RawRow;
use crate::section::Section;

/// Number of rows retained, including the row currently being processed.
pub const WINDOW_CAPACITY: usize = 5;

/// Ring buffer over the most recent rows.
#[derive(Debug, Clone, Default)]
pub struct LookbackWindow {
    slots: [Option<RawRow>; WINDOW_CAPACITY],
    /// Slot the next push writes to.
    next: usize,
    len: usize,
}

impl LookbackWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `row` as the current row, evicting the oldest when full.
    pub fn push(&mut self, row: RawRow) {
        if let Some(slot) = self.slots.get_mut(self.next) {
            *slot = Some(row);
        }
        self.next = self.next.wrapping_add(1) % WINDOW_CAPACITY;
        self.len = self.len.saturating_add(1).min(WINDOW_CAPACITY);
    }

    /// Number of rows held.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no rows have been pushed yet.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The row `age` positions back from the newest (`0` is the current row).
    fn at_age(&self, age: usize) -> Option<&RawRow> {
        if age >= self.len {
            return None;
        }
        // next - 1 - age, kept non-negative by adding the capacity first.
        let index = (self.next.wrapping_add(WINDOW_CAPACITY).wrapping_sub(1).wrapping_sub(age))
            % WINDOW_CAPACITY;
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Rows strictly older than the current row, newest first.
    pub fn before_current(&self) -> impl Iterator<Item = &RawRow> {
        (1..self.len).filter_map(move |age| self.at_age(age))
    }

    /// The `n`-th most recent row of `section` before the current row.
    ///
    /// `n` is 1-based: `n == 1` is the closest preceding row of that
    /// section. Returns `None` if the window holds fewer than `n` such rows.
    pub fn prev_record_of_section(&self, section: Section, n: usize) -> Option<&RawRow> {
        let skip = n.checked_sub(1)?;
        self.before_current()
            .filter(|row| row.section == section)
            .nth(skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(entity: &str) -> RawRow {
        RawRow::new(Section::Score, [("entity", entity.to_owned())])
    }

    fn event() -> RawRow {
        RawRow::new(Section::Event, [("type", String::from("0206"))])
    }

    #[test]
    fn finds_preceding_rows_of_section() {
        let mut window = LookbackWindow::new();
        window.push(score("A"));
        window.push(score("B"));
        window.push(event());

        let first = window.prev_record_of_section(Section::Score, 1);
        let second = window.prev_record_of_section(Section::Score, 2);
        assert_eq!(first.and_then(|r| r.get("entity")), Some("B"));
        assert_eq!(second.and_then(|r| r.get("entity")), Some("A"));
        assert!(window.prev_record_of_section(Section::Score, 3).is_none());
        assert!(window.prev_record_of_section(Section::Score, 0).is_none());
    }

    #[test]
    fn current_row_is_not_a_candidate() {
        let mut window = LookbackWindow::new();
        window.push(score("A"));
        assert!(window.prev_record_of_section(Section::Score, 1).is_none());
    }

    #[test]
    fn oldest_rows_are_evicted() {
        let mut window = LookbackWindow::new();
        window.push(score("old"));
        for _ in 0..WINDOW_CAPACITY {
            window.push(event());
        }
        assert_eq!(window.len(), WINDOW_CAPACITY);
        assert!(window.prev_record_of_section(Section::Score, 1).is_none());
    }

    #[test]
    fn wraps_around_repeatedly() {
        let mut window = LookbackWindow::new();
        for i in 0..23 {
            window.push(score(&i.to_string()));
        }
        window.push(event());
        let newest = window.prev_record_of_section(Section::Score, 1);
        let oldest = window.prev_record_of_section(Section::Score, 4);
        assert_eq!(newest.and_then(|r| r.get("entity")), Some("22"));
        assert_eq!(oldest.and_then(|r| r.get("entity")), Some("19"));
        assert!(window.prev_record_of_section(Section::Score, 5).is_none());
    }
}
