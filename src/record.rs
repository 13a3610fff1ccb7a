//! Core history record types shared by every stage of the pipeline.
//!
//! A [`HistoryRecord`] is one parsed call, text thread, or voicemail: the
//! archive reader finds the entry, the parser builds the record, the CSV
//! writer serializes it. Records are immutable once built.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// What kind of event an archive entry describes.
///
/// The kind comes verbatim from the middle segment of the entry filename
/// (`<contact> - <kind> - <timestamp>.html`). Google Voice emits exactly
/// these six values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// An answered incoming call
    Received,
    /// An outgoing call
    Placed,
    /// An unanswered incoming call
    Missed,
    /// A text message thread
    Text,
    /// A voicemail left by the caller
    Voicemail,
    /// A recorded call
    Recorded,
}

impl RecordKind {
    /// The capitalized label used in entry filenames and the CSV `type` column.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Received => "Received",
            RecordKind::Placed => "Placed",
            RecordKind::Missed => "Missed",
            RecordKind::Text => "Text",
            RecordKind::Voicemail => "Voicemail",
            RecordKind::Recorded => "Recorded",
        }
    }

    /// The direction implied by the kind alone.
    ///
    /// `Text` returns `None`: thread direction depends on who sent the first
    /// message, which only the document parser knows.
    pub fn direction(self) -> Option<Direction> {
        match self {
            RecordKind::Received | RecordKind::Voicemail | RecordKind::Recorded => {
                Some(Direction::Incoming)
            }
            RecordKind::Placed => Some(Direction::Outgoing),
            RecordKind::Missed => Some(Direction::Missed),
            RecordKind::Text => None,
        }
    }

    /// Returns `true` for call-like kinds, i.e. everything except `Text`.
    ///
    /// Call-like records always carry a duration in the CSV; a missing
    /// duration element means a zero-length call.
    pub fn is_call(self) -> bool {
        !matches!(self, RecordKind::Text)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "received" => Ok(RecordKind::Received),
            "placed" => Ok(RecordKind::Placed),
            "missed" => Ok(RecordKind::Missed),
            "text" => Ok(RecordKind::Text),
            "voicemail" => Ok(RecordKind::Voicemail),
            "recorded" => Ok(RecordKind::Recorded),
            _ => Err(format!("unknown record kind: {s}")),
        }
    }
}

/// Whether the event was incoming, outgoing, or a missed incoming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
    Missed,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
            Direction::Missed => "missed",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "incoming" => Ok(Direction::Incoming),
            "outgoing" => Ok(Direction::Outgoing),
            "missed" => Ok(Direction::Missed),
            _ => Err(format!("unknown direction: {s}")),
        }
    }
}

/// One parsed call/text/voicemail event.
///
/// Built once per matched archive entry and consumed directly by the CSV
/// writer. Optional fields stay `None` when the source document doesn't
/// carry them; the writer turns them into empty CSV fields.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use voicepack::{Direction, HistoryRecord, RecordKind};
///
/// let record = HistoryRecord::new(
///     RecordKind::Missed,
///     Utc.with_ymd_and_hms(2019, 1, 1, 10, 0, 0).unwrap(),
/// )
/// .with_contact_name("Jane Doe");
///
/// assert_eq!(record.direction, Some(Direction::Missed));
/// assert_eq!(record.kind.label(), "Missed");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Event kind from the entry filename
    pub kind: RecordKind,
    /// UTC instant from the entry filename
    pub timestamp: DateTime<Utc>,
    /// Local-offset datetime from the document, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<DateTime<FixedOffset>>,
    /// Incoming/outgoing/missed, when determinable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Anonymized digest of the contact number or name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    /// Contact name, only when the contact is not a bare number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    /// Call duration; always set for call-like kinds, never for texts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    /// Whole days between the first and last message of a thread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_days: Option<i64>,
    /// Number of messages in a thread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<usize>,
    /// Voicemail transcript or newline-joined thread bodies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl HistoryRecord {
    /// Creates a record with the given kind and UTC timestamp.
    ///
    /// The direction is pre-filled from the kind where the kind alone decides
    /// it; `Text` records start with no direction.
    pub fn new(kind: RecordKind, timestamp: DateTime<Utc>) -> Self {
        HistoryRecord {
            kind,
            timestamp,
            local: None,
            direction: kind.direction(),
            contact_id: None,
            contact_name: None,
            duration: None,
            message_days: None,
            message_count: None,
            text: None,
        }
    }

    /// Sets the local-offset datetime.
    #[must_use]
    pub fn with_local(mut self, local: DateTime<FixedOffset>) -> Self {
        self.local = Some(local);
        self
    }

    /// Overrides the direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Sets the anonymized contact digest.
    #[must_use]
    pub fn with_contact_id(mut self, contact_id: impl Into<String>) -> Self {
        self.contact_id = Some(contact_id.into());
        self
    }

    /// Sets the contact name.
    #[must_use]
    pub fn with_contact_name(mut self, contact_name: impl Into<String>) -> Self {
        self.contact_name = Some(contact_name.into());
        self
    }

    /// Sets the call duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the thread statistics.
    #[must_use]
    pub fn with_thread_stats(mut self, message_days: i64, message_count: usize) -> Self {
        self.message_days = Some(message_days);
        self.message_count = Some(message_count);
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
