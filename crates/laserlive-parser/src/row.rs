//! Line tokenizing and row decoding.
//!
//! Decoding never fails. Short rows lose their trailing fields, long rows
//! drop the excess tokens, and lines whose code is not bound to a section
//! are skipped.

use std::collections::BTreeMap;

use crate::section::{Section, SectionMap};

/// Byte-order mark that may prefix the first line of a log.
const BOM: char = '\u{feff}';

/// One decoded data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// The schema this row was decoded against.
    pub section: Section,
    fields: BTreeMap<&'static str, String>,
}

impl RawRow {
    /// Build a row from explicit field values (used by tests and tools).
    pub fn new(section: Section, fields: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        Self {
            section,
            fields: fields.into_iter().collect(),
        }
    }

    /// The value of `field`, if the row was long enough to carry it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// The value of `field`, or the empty string.
    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or_default()
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// What a single log line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Empty after stripping the BOM and line terminator.
    Blank,
    /// A header declaration (already applied to the [`SectionMap`]).
    Header,
    /// A data line whose code is not bound to any section.
    Unmapped,
    /// A decoded data row.
    Row(RawRow),
}

/// Classify and decode one raw line, updating `sections` for headers.
pub fn decode_line(sections: &mut SectionMap, line: &str) -> Line {
    let line = line
        .trim_start_matches(BOM)
        .trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Line::Blank;
    }

    let mut tokens = line.split('\t');
    let code = tokens.next().unwrap_or_default();

    if sections.declare(code) {
        return Line::Header;
    }

    let Some(section) = sections.lookup(code) else {
        return Line::Unmapped;
    };

    Line::Row(decode_fields(section, tokens))
}

/// Zip the remaining tokens of a data line against `section`'s schema.
fn decode_fields<'a>(section: Section, mut tokens: impl Iterator<Item = &'a str>) -> RawRow {
    if section == Section::Event {
        // The payload column is variable-width: everything after the type
        // code is rejoined into a single field.
        let mut fields = Vec::with_capacity(3);
        if let Some(time) = tokens.next() {
            fields.push(("time", time.to_owned()));
        }
        if let Some(kind) = tokens.next() {
            fields.push(("type", kind.to_owned()));
            let payload = tokens.collect::<Vec<_>>().join(" ");
            fields.push(("varies", payload.trim().to_owned()));
        }
        return RawRow::new(section, fields);
    }

    let fields = section
        .fields()
        .iter()
        .copied()
        .zip(tokens.map(str::to_owned));
    RawRow::new(section, fields)
}
