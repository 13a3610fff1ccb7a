//! Known-markup extraction from one Voice HTML document.
//!
//! Every document kind carries some subset of the same markers:
//!
//! - `<abbr class="published" title="<RFC3339>">` — event datetime (calls,
//!   voicemails, recordings)
//! - `<abbr class="duration" title="PT…">(HH:MM:SS)</abbr>` — call length
//! - `<span class="full-text">` — voicemail/recording transcript
//! - `<div class="message">` blocks — text thread, each with an
//!   `<abbr class="dt">`, a `class="sender"` element, and a `<q>` body
//!
//! Absent markers are simply absent (a missed call has no duration).
//! Present-but-garbled markers are per-entry errors, and a document with no
//! known marker at all is unrecognized.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use super::markup::{Element, Scanner};
use crate::error::ParseErrorKind;

/// Everything the known markers of one document yield.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Event datetime with its local offset
    pub published: Option<DateTime<FixedOffset>>,
    /// Call length
    pub duration: Option<Duration>,
    /// Voicemail or recording transcript
    pub transcript: Option<String>,
    /// Text thread messages, in document order
    pub messages: Vec<ThreadMessage>,
}

impl ParsedDocument {
    /// Local datetime for the record: the first thread message wins when
    /// both ends of the thread carry a datetime, then the document's
    /// published marker.
    pub fn local_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.thread_span().map(|(first, _)| first).or(self.published)
    }

    /// First and last message datetimes, when both ends are present.
    pub fn thread_span(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let first = self.messages.first()?.sent?;
        let last = self.messages.last()?.sent?;
        Some((first, last))
    }

    /// Newline-joined non-empty message bodies.
    pub fn thread_text(&self) -> Option<String> {
        let bodies: Vec<&str> = self
            .messages
            .iter()
            .map(|m| m.body.as_str())
            .filter(|body| !body.is_empty())
            .collect();
        if bodies.is_empty() {
            None
        } else {
            Some(bodies.join("\n"))
        }
    }

    fn has_markers(&self) -> bool {
        self.published.is_some()
            || self.duration.is_some()
            || self.transcript.is_some()
            || !self.messages.is_empty()
    }
}

/// One `message` block of a text thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadMessage {
    /// Message datetime with its local offset
    pub sent: Option<DateTime<FixedOffset>>,
    /// Sender label: `Me` or the contact's name/number
    pub sender: Option<String>,
    /// Message body; empty when the block has no `<q>` element
    pub body: String,
}

impl ThreadMessage {
    /// `Me` marks messages sent from this account.
    pub fn is_from_me(&self) -> bool {
        self.sender.as_deref() == Some("Me")
    }
}

/// Document parser holding a compiled [`Scanner`].
///
/// Construct one per conversion and reuse it across documents.
#[derive(Debug, Default)]
pub struct DocumentParser {
    scanner: Scanner,
}

impl DocumentParser {
    /// Creates a parser with freshly compiled patterns.
    pub fn new() -> Self {
        DocumentParser {
            scanner: Scanner::new(),
        }
    }

    /// Extracts the known markers from one document.
    pub fn parse(&self, html: &str) -> Result<ParsedDocument, ParseErrorKind> {
        let published = self
            .scanner
            .first_with_class(html, "published")
            .map(|el| datetime_from_title(&el))
            .transpose()?;
        let duration = self
            .scanner
            .first_with_class(html, "duration")
            .map(|el| duration_from_text(&el.text()))
            .transpose()?;
        let transcript = self
            .scanner
            .first_with_class(html, "full-text")
            .map(|el| el.text())
            .filter(|text| !text.is_empty());
        let messages = self.parse_messages(html)?;

        let doc = ParsedDocument {
            published,
            duration,
            transcript,
            messages,
        };
        if doc.has_markers() {
            Ok(doc)
        } else {
            Err(ParseErrorKind::UnrecognizedMarkup)
        }
    }

    fn parse_messages(&self, html: &str) -> Result<Vec<ThreadMessage>, ParseErrorKind> {
        let mut messages = Vec::new();
        for block in self.scanner.elements_with_class(html, "message") {
            let sent = self
                .scanner
                .first_with_class(block.inner, "dt")
                .map(|el| datetime_from_title(&el))
                .transpose()?;
            let sender = self
                .scanner
                .first_with_class(block.inner, "sender")
                .map(|el| el.text())
                .filter(|sender| !sender.is_empty());
            let body = self
                .scanner
                .first_with_tag(block.inner, "q")
                .map(|el| el.text())
                .unwrap_or_default();
            messages.push(ThreadMessage { sent, sender, body });
        }
        Ok(messages)
    }
}

fn datetime_from_title(element: &Element<'_>) -> Result<DateTime<FixedOffset>, ParseErrorKind> {
    let title = element
        .attr("title")
        .ok_or_else(|| ParseErrorKind::Timestamp("(no title attribute)".to_string()))?;
    DateTime::parse_from_rfc3339(title).map_err(|_| ParseErrorKind::Timestamp(title.to_string()))
}

fn duration_from_text(text: &str) -> Result<Duration, ParseErrorKind> {
    let bare = text.trim().trim_start_matches('(').trim_end_matches(')');
    let garbled = || ParseErrorKind::Duration(text.trim().to_string());

    let fields: Vec<&str> = bare.split(':').collect();
    let [hours, minutes, seconds] = fields.as_slice() else {
        return Err(garbled());
    };
    let hours: u64 = hours.trim().parse().map_err(|_| garbled())?;
    let minutes: u64 = minutes.trim().parse().map_err(|_| garbled())?;
    let seconds: u64 = seconds.trim().parse().map_err(|_| garbled())?;
    // fields are attacker-sized text, so the sum must not wrap
    let total = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|t| t.checked_add(seconds))
        .ok_or_else(garbled)?;
    Ok(Duration::from_secs(total))
}
