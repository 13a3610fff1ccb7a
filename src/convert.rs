//! The conversion pipeline.
//!
//! For each `.html` entry: match the name, read the document, extract its
//! markers, classify the contact, assemble a [`HistoryRecord`]. Entries that
//! fail to parse are collected as skips in the run statistics rather than
//! aborting the run; archive-level and digest-collision errors stay fatal.
//! Records come out sorted by UTC timestamp.

use std::fmt;
use std::io::{Read, Seek};
use std::path::Path;
use std::time::Duration;

use crate::contact::{ContactFields, ContactStats, Contacts};
use crate::error::{ParseErrorKind, Result};
use crate::parse::{DocumentParser, EntryMatcher, EntryMeta, ParsedDocument};
use crate::record::{Direction, HistoryRecord, RecordKind};
use crate::takeout::Takeout;

/// A finished conversion: records sorted by timestamp, plus what happened.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Parsed records, sorted by UTC timestamp
    pub records: Vec<HistoryRecord>,
    /// Run statistics
    pub stats: ConvertStats,
}

/// What happened during a run.
#[derive(Debug, Clone, Default)]
pub struct ConvertStats {
    /// `.html` entries whose names matched the history pattern
    pub matched: usize,
    /// Entries that became records
    pub parsed: usize,
    /// Entries skipped with a per-entry parse error
    pub skipped: Vec<SkippedEntry>,
    /// Contact classification counters
    pub contacts: ContactStats,
}

impl ConvertStats {
    fn skip(&mut self, entry: &str, kind: &ParseErrorKind) {
        self.skipped.push(SkippedEntry {
            entry: entry.to_string(),
            reason: kind.to_string(),
        });
    }
}

impl fmt::Display for ConvertStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records from {} matched entries ({} skipped; contacts: {})",
            self.parsed,
            self.matched,
            self.skipped.len(),
            self.contacts
        )
    }
}

/// One skipped entry and the reason it didn't parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Entry name inside the archive
    pub entry: String,
    /// Human-readable parse failure
    pub reason: String,
}

/// Converts the Takeout archive at `path`. One-call form of the pipeline.
///
/// # Example
///
/// ```rust,no_run
/// let conversion = voicepack::parse_takeout("takeout.zip")?;
/// println!("{}", conversion.stats);
/// # Ok::<(), voicepack::VoicepackError>(())
/// ```
pub fn parse_takeout(path: impl AsRef<Path>) -> Result<Conversion> {
    let mut takeout = Takeout::open(path)?;
    convert(&mut takeout)
}

/// Converts an already opened archive.
pub fn convert<R: Read + Seek>(takeout: &mut Takeout<R>) -> Result<Conversion> {
    let matcher = EntryMatcher::new();
    let parser = DocumentParser::new();
    let mut contacts = Contacts::new();
    let mut records = Vec::new();
    let mut stats = ConvertStats::default();

    for name in takeout.html_entries() {
        // not a history record at all, e.g. a group conversation
        let Some(entry) = matcher.match_entry(&name) else {
            continue;
        };
        stats.matched += 1;

        let meta = match entry.meta() {
            Ok(meta) => meta,
            Err(kind) => {
                stats.skip(&name, &kind);
                continue;
            }
        };
        let html = match takeout.read_entry(&name) {
            Ok(html) => html,
            Err(kind) => {
                stats.skip(&name, &kind);
                continue;
            }
        };
        let doc = match parser.parse(&html) {
            Ok(doc) => doc,
            Err(kind) => {
                stats.skip(&name, &kind);
                continue;
            }
        };
        // collisions abort: a bad digest would silently merge contacts
        let contact = contacts.classify(&meta.contact)?;

        records.push(build_record(&meta, &doc, contact));
        stats.parsed += 1;
    }

    stats.contacts = contacts.into_stats();
    records.sort_by_key(|record| record.timestamp);
    Ok(Conversion { records, stats })
}

fn build_record(meta: &EntryMeta, doc: &ParsedDocument, contact: ContactFields) -> HistoryRecord {
    let mut record = HistoryRecord::new(meta.kind, meta.timestamp);
    if let Some(local) = doc.local_datetime() {
        record = record.with_local(local);
    }
    if let Some(contact_id) = contact.contact_id {
        record = record.with_contact_id(contact_id);
    }
    if let Some(contact_name) = contact.contact_name {
        record = record.with_contact_name(contact_name);
    }

    if meta.kind.is_call() {
        // a call entry without a duration element is a zero-length call
        record = record.with_duration(doc.duration.unwrap_or(Duration::ZERO));
    }

    match meta.kind {
        RecordKind::Text => {
            if let Some(first) = doc.messages.first() {
                record = record.with_direction(if first.is_from_me() {
                    Direction::Outgoing
                } else {
                    Direction::Incoming
                });
            }
            if let Some((first, last)) = doc.thread_span() {
                record = record.with_thread_stats((last - first).num_days(), doc.messages.len());
            }
            if let Some(text) = doc.thread_text() {
                record = record.with_text(text);
            }
        }
        RecordKind::Voicemail | RecordKind::Recorded => {
            if let Some(transcript) = doc.transcript.clone() {
                record = record.with_text(transcript);
            }
        }
        _ => {}
    }
    record
}
