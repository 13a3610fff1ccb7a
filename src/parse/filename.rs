//! Entry-name matching for Voice archives.
//!
//! History entries live under `Takeout/Voice/Calls/` or `Takeout/Voice/Spam/`
//! and are named `<contact> - <kind> - <timestamp>.html`, for example:
//!
//! ```text
//! Takeout/Voice/Calls/Jane Doe - Text - 2020-08-21T18_57_10Z.html
//! Takeout/Voice/Calls/+15551234567 - Missed - 2019-01-01T10_00_00Z.html
//! ```
//!
//! The contact segment may be empty. Names that don't fit the pattern
//! (group conversations lack the kind segment entirely) are not history
//! records and are skipped without a warning.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::error::ParseErrorKind;
use crate::record::RecordKind;

const ENTRY_PATTERN: &str =
    r"^Takeout/Voice/(?:Calls|Spam)/(?P<contact>.*?) - (?P<kind>.+?) - (?P<timestamp>.+?)\.html$";

/// Timestamp shape used in entry names: RFC3339 with `_` for `:`.
const NAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H_%M_%SZ";

/// Compiled matcher for history entry names.
///
/// Construct one per conversion and reuse it across entries.
#[derive(Debug)]
pub struct EntryMatcher {
    pattern: Regex,
}

impl EntryMatcher {
    /// Creates a matcher with a freshly compiled pattern.
    pub fn new() -> Self {
        EntryMatcher {
            pattern: Regex::new(ENTRY_PATTERN).unwrap(),
        }
    }

    /// Matches an entry name, returning its raw segments.
    ///
    /// `None` means the entry is not a history record at all; it carries no
    /// judgement about whether the segments will parse.
    pub fn match_entry<'a>(&self, name: &'a str) -> Option<EntryName<'a>> {
        let caps = self.pattern.captures(name)?;
        Some(EntryName {
            contact: caps.name("contact")?.as_str(),
            kind: caps.name("kind")?.as_str(),
            timestamp: caps.name("timestamp")?.as_str(),
        })
    }
}

impl Default for EntryMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw segments of a matched entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryName<'a> {
    /// Contact name or number; may be empty
    pub contact: &'a str,
    /// Kind segment, e.g. `Missed`
    pub kind: &'a str,
    /// Timestamp segment, e.g. `2020-08-21T18_57_10Z`
    pub timestamp: &'a str,
}

impl EntryName<'_> {
    /// Converts the raw segments into typed metadata.
    pub fn meta(&self) -> Result<EntryMeta, ParseErrorKind> {
        let kind = self
            .kind
            .parse::<RecordKind>()
            .map_err(|_| ParseErrorKind::UnknownKind(self.kind.to_string()))?;
        let timestamp = NaiveDateTime::parse_from_str(self.timestamp, NAME_TIMESTAMP_FORMAT)
            .map_err(|_| ParseErrorKind::Timestamp(self.timestamp.to_string()))?
            .and_utc();
        Ok(EntryMeta {
            contact: self.contact.to_string(),
            kind,
            timestamp,
        })
    }
}

/// Typed metadata carried by an entry name.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMeta {
    /// Contact name or number; empty when Voice had neither
    pub contact: String,
    /// Record kind
    pub kind: RecordKind,
    /// UTC instant of the event
    pub timestamp: DateTime<Utc>,
}
