//! Unified error types for voicepack.
//!
//! This module provides a single [`VoicepackError`] enum that covers all error
//! cases in the library. This design follows the pattern used by popular crates
//! like `reqwest`, `serde_json`, and `csv`.
//!
//! # Error Handling Philosophy
//!
//! - **Fatal** errors (unreadable path, invalid archive, output failures) abort
//!   the run with a nonzero exit.
//! - **Per-entry** errors ([`VoicepackError::Parse`]) are collected by the
//!   pipeline, reported on the error stream, and skipped; the remaining entries
//!   keep processing.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for voicepack operations.
///
/// This type is broadly used across the library for any operation that
/// may produce an error.
///
/// # Example
///
/// ```rust
/// use voicepack::error::Result;
/// use voicepack::HistoryRecord;
///
/// fn my_function() -> Result<Vec<HistoryRecord>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, VoicepackError>;

/// The error type for all voicepack operations.
///
/// This enum represents all possible errors that can occur when converting a
/// Takeout archive. Each variant contains context about what went wrong and,
/// where applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoicepackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The archive path doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The archive could not be opened or walked.
    ///
    /// This occurs when the given path is not a valid zip archive or its
    /// central directory is damaged.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Failed to parse one archive entry.
    ///
    /// Contains the entry name inside the archive and the underlying parse
    /// error. The pipeline treats this variant as recoverable: the entry is
    /// skipped and conversion continues.
    #[error("Failed to parse entry '{entry}': {source}")]
    Parse {
        /// Name of the entry inside the archive
        entry: String,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
    },

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// UTF-8 encoding error.
    ///
    /// Occurs when produced output is not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Two distinct contacts reduced to the same anonymized digest.
    ///
    /// Digests stand in for contact numbers and names in the CSV, so a
    /// collision would silently merge two contacts. The run aborts instead.
    #[error("Contact digest collision: '{existing}' and '{value}' both map to {digest}")]
    DigestCollision {
        /// The colliding digest
        digest: String,
        /// The contact already registered for this digest
        existing: String,
        /// The new contact that produced the same digest
        value: String,
    },

    /// An unknown column name was given to the output configuration.
    #[error("Unknown column '{input}'. Expected one of: {expected}")]
    UnknownColumn {
        /// The invalid column name that was provided
        input: String,
        /// The accepted column names
        expected: &'static str,
    },
}

/// Kinds of per-entry parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// The entry could not be read out of the archive
    #[error("unreadable entry: {0}")]
    Read(String),
    /// Entry content is not valid UTF-8
    #[error("entry is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// A timestamp didn't match any accepted shape
    #[error("unrecognized timestamp '{0}'")]
    Timestamp(String),
    /// A call duration didn't look like (HH:MM:SS)
    #[error("unrecognized call duration '{0}'")]
    Duration(String),
    /// The filename kind segment is not a known record kind
    #[error("unknown record kind '{0}'")]
    UnknownKind(String),
    /// The document carries none of the known Voice markers
    #[error("no recognizable Voice markup")]
    UnrecognizedMarkup,
}

impl From<std::string::FromUtf8Error> for VoicepackError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        VoicepackError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl VoicepackError {
    /// Creates a per-entry parse error.
    pub fn parse(entry: impl Into<String>, source: ParseErrorKind) -> Self {
        VoicepackError::Parse {
            entry: entry.into(),
            source,
        }
    }

    /// Creates a digest collision error.
    pub fn digest_collision(
        digest: impl Into<String>,
        existing: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        VoicepackError::DigestCollision {
            digest: digest.into(),
            existing: existing.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown column error.
    pub fn unknown_column(input: impl Into<String>) -> Self {
        VoicepackError::UnknownColumn {
            input: input.into(),
            expected: "timestamp, date, time, type, direction, contact_id, \
                       contact_name, call_duration, message_days, message_count, text",
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, VoicepackError::Io(_))
    }

    /// Returns `true` if this is an archive-level error.
    pub fn is_archive(&self) -> bool {
        matches!(self, VoicepackError::Archive(_))
    }

    /// Returns `true` if this is a recoverable per-entry parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, VoicepackError::Parse { .. })
    }

    /// Returns `true` if this is a digest collision.
    pub fn is_digest_collision(&self) -> bool {
        matches!(self, VoicepackError::DigestCollision { .. })
    }

    /// Returns `true` if the underlying cause is a broken output pipe.
    ///
    /// The CLI exits quietly in this case so `voicepack x.zip | head`
    /// doesn't spew an error after `head` closes its end.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            VoicepackError::Io(e) => e.kind() == io::ErrorKind::BrokenPipe,
            VoicepackError::Csv(e) => {
                matches!(e.kind(), csv::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::BrokenPipe)
            }
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Display tests for all error variants
    // =========================================================================

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = VoicepackError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_archive_error_display() {
        let zip_err = zip::result::ZipError::InvalidArchive("bad central directory".into());
        let err = VoicepackError::from(zip_err);
        let display = err.to_string();
        assert!(display.contains("Archive error"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = VoicepackError::parse(
            "Takeout/Voice/Calls/Bob - Missed - 2019-01-01T10_00_00Z.html",
            ParseErrorKind::Duration("(bogus)".into()),
        );
        let display = err.to_string();
        assert!(display.contains("Bob - Missed"));
        assert!(display.contains("(bogus)"));
    }

    #[test]
    fn test_digest_collision_display() {
        let err = VoicepackError::digest_collision("abcdef0123", "Alice", "Bob");
        let display = err.to_string();
        assert!(display.contains("abcdef0123"));
        assert!(display.contains("Alice"));
        assert!(display.contains("Bob"));
    }

    #[test]
    fn test_unknown_column_display() {
        let err = VoicepackError::unknown_column("durration");
        let display = err.to_string();
        assert!(display.contains("durration"));
        assert!(display.contains("call_duration"));
    }

    #[test]
    fn test_utf8_error_display() {
        let invalid_bytes = vec![0xff, 0xfe];
        let utf8_err = String::from_utf8(invalid_bytes).unwrap_err();
        let err = VoicepackError::Utf8 {
            context: "reading entry".into(),
            source: utf8_err,
        };
        let display = err.to_string();
        assert!(display.contains("UTF-8"));
        assert!(display.contains("reading entry"));
    }

    // =========================================================================
    // Error source chain tests
    // =========================================================================

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = VoicepackError::from(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_parse_error_source() {
        use std::error::Error;
        let err = VoicepackError::parse("entry.html", ParseErrorKind::UnrecognizedMarkup);
        assert!(err.source().is_some());
    }

    // =========================================================================
    // is_* methods tests
    // =========================================================================

    #[test]
    fn test_is_methods() {
        let io_err = VoicepackError::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert!(io_err.is_io());
        assert!(!io_err.is_parse());
        assert!(!io_err.is_archive());
        assert!(!io_err.is_digest_collision());

        let parse_err = VoicepackError::parse("x.html", ParseErrorKind::UnrecognizedMarkup);
        assert!(parse_err.is_parse());
        assert!(!parse_err.is_io());

        let collision = VoicepackError::digest_collision("00", "a", "b");
        assert!(collision.is_digest_collision());
        assert!(!collision.is_parse());
    }

    #[test]
    fn test_is_broken_pipe() {
        let pipe = VoicepackError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert!(pipe.is_broken_pipe());

        let not_pipe = VoicepackError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(!not_pipe.is_broken_pipe());

        let csv_pipe: VoicepackError =
            csv::Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")).into();
        assert!(csv_pipe.is_broken_pipe());

        let parse = VoicepackError::parse("x.html", ParseErrorKind::UnrecognizedMarkup);
        assert!(!parse.is_broken_pipe());
    }

    // =========================================================================
    // From conversions tests
    // =========================================================================

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: VoicepackError = io_err.into();
        assert!(err.is_io());
    }

    #[test]
    fn test_from_csv_error() {
        let io_err = std::io::Error::other("test");
        let csv_err = csv::Error::from(io_err);
        let err: VoicepackError = csv_err.into();
        assert!(err.to_string().contains("CSV error"));
    }

    #[test]
    fn test_from_utf8_error() {
        let invalid_bytes = vec![0xff, 0xfe];
        let utf8_err = String::from_utf8(invalid_bytes).unwrap_err();
        let err: VoicepackError = utf8_err.into();
        assert!(err.to_string().contains("UTF-8"));
    }

    // =========================================================================
    // ParseErrorKind tests
    // =========================================================================

    #[test]
    fn test_parse_error_kind_display() {
        assert!(
            ParseErrorKind::Timestamp("2020-13-99".into())
                .to_string()
                .contains("2020-13-99")
        );
        assert!(
            ParseErrorKind::Duration("xx:yy".into())
                .to_string()
                .contains("xx:yy")
        );
        assert!(
            ParseErrorKind::UnknownKind("Fax".into())
                .to_string()
                .contains("Fax")
        );
        assert!(
            ParseErrorKind::Read("truncated".into())
                .to_string()
                .contains("truncated")
        );
        assert!(
            ParseErrorKind::UnrecognizedMarkup
                .to_string()
                .contains("markup")
        );
    }

    // =========================================================================
    // Result type alias test
    // =========================================================================

    #[test]
    fn test_result_type_alias() {
        fn returns_error() -> Result<i32> {
            Err(VoicepackError::unknown_column("bad"))
        }

        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        assert!(returns_error().is_err());
        assert_eq!(returns_ok().unwrap(), 42);
    }

    // =========================================================================
    // Debug trait test
    // =========================================================================

    #[test]
    fn test_error_debug() {
        let err = VoicepackError::unknown_column("bad");
        let debug = format!("{:?}", err);
        assert!(debug.contains("UnknownColumn"));
    }
}
