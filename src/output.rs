//! CSV output for history records.
//!
//! One header row, then one row per record in the order handed in. Comma
//! delimiter, `\n` line terminator, UTF-8, quoting per standard CSV rules
//! (the `csv` crate handles escaping). Callers can drop columns through
//! [`OutputConfig`]; the header and every row stay consistent.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, VoicepackError};
use crate::record::HistoryRecord;

/// One output column, in its fixed position.
///
/// The full order is [`Column::ALL`]:
///
/// ```text
/// timestamp, date, time, type, direction, contact_id, contact_name,
/// call_duration, message_days, message_count, text
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// UTC instant, RFC3339 with `+00:00`
    Timestamp,
    /// Local date, `%Y-%m-%d`
    Date,
    /// Local time, `%I:%M %p`
    Time,
    /// Record kind label, e.g. `Missed`
    Type,
    /// `incoming`, `outgoing`, or `missed`
    Direction,
    /// Anonymized contact digest
    ContactId,
    /// Contact name, when the contact isn't a number
    ContactName,
    /// Call length, `HH:MM:SS`
    CallDuration,
    /// Whole days spanned by a text thread
    MessageDays,
    /// Messages in a text thread
    MessageCount,
    /// Transcript or thread bodies
    Text,
}

impl Column {
    /// Every column in output order.
    pub const ALL: [Column; 11] = [
        Column::Timestamp,
        Column::Date,
        Column::Time,
        Column::Type,
        Column::Direction,
        Column::ContactId,
        Column::ContactName,
        Column::CallDuration,
        Column::MessageDays,
        Column::MessageCount,
        Column::Text,
    ];

    /// The header name of this column.
    pub fn name(self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::Date => "date",
            Column::Time => "time",
            Column::Type => "type",
            Column::Direction => "direction",
            Column::ContactId => "contact_id",
            Column::ContactName => "contact_name",
            Column::CallDuration => "call_duration",
            Column::MessageDays => "message_days",
            Column::MessageCount => "message_count",
            Column::Text => "text",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Column {
    type Err = VoicepackError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        Column::ALL
            .into_iter()
            .find(|column| column.name() == lower)
            .ok_or_else(|| VoicepackError::unknown_column(s))
    }
}

/// Which columns the writer emits.
///
/// Empty by default: all of [`Column::ALL`] in order. Excluding a column
/// drops it from the header and every row.
///
/// # Example
///
/// ```rust
/// use voicepack::output::{Column, OutputConfig};
///
/// let config = OutputConfig::new()
///     .exclude(Column::Text)
///     .exclude(Column::ContactName);
/// assert_eq!(config.columns().len(), 9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    exclude: Vec<Column>,
}

impl OutputConfig {
    /// Creates a config emitting every column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a column from the output. Excluding the same column twice is
    /// harmless.
    #[must_use]
    pub fn exclude(mut self, column: Column) -> Self {
        if !self.exclude.contains(&column) {
            self.exclude.push(column);
        }
        self
    }

    /// Returns `true` if the column is excluded.
    pub fn is_excluded(&self, column: Column) -> bool {
        self.exclude.contains(&column)
    }

    /// The columns the writer will emit, in output order.
    pub fn columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| !self.is_excluded(*column))
            .collect()
    }
}

/// Writes a header row and one row per record to `writer`.
pub fn write_csv<W: Write>(
    records: &[HistoryRecord],
    writer: W,
    config: &OutputConfig,
) -> Result<()> {
    let columns = config.columns();
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(columns.iter().map(|column| column.name()))?;
    for record in records {
        csv_writer.write_record(columns.iter().map(|column| field(record, *column)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the CSV to a file, creating or truncating it.
pub fn write_csv_path(
    records: &[HistoryRecord],
    path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(path)?;
    write_csv(records, file, config)
}

/// Renders the CSV to an in-memory string.
pub fn to_csv(records: &[HistoryRecord], config: &OutputConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer, config)?;
    Ok(String::from_utf8(buffer)?)
}

fn field(record: &HistoryRecord, column: Column) -> String {
    match column {
        Column::Timestamp => record.timestamp.to_rfc3339(),
        Column::Date => record
            .local
            .map(|local| local.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Column::Time => record
            .local
            .map(|local| local.format("%I:%M %p").to_string())
            .unwrap_or_default(),
        Column::Type => record.kind.label().to_string(),
        Column::Direction => record
            .direction
            .map(|direction| direction.to_string())
            .unwrap_or_default(),
        Column::ContactId => record.contact_id.clone().unwrap_or_default(),
        Column::ContactName => record.contact_name.clone().unwrap_or_default(),
        Column::CallDuration => record.duration.map(format_duration).unwrap_or_default(),
        Column::MessageDays => record
            .message_days
            .map(|days| days.to_string())
            .unwrap_or_default(),
        Column::MessageCount => record
            .message_count
            .map(|count| count.to_string())
            .unwrap_or_default(),
        Column::Text => record.text.clone().unwrap_or_default(),
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
