//! # Voicepack
//!
//! A Rust library for converting Google Voice Takeout exports into a single
//! flattened CSV of call, text, and voicemail history.
//!
//! ## Overview
//!
//! A Takeout export is a zip archive of machine-generated HTML files, one
//! per event, named like:
//!
//! ```text
//! Takeout/Voice/Calls/Jane Doe - Missed - 2019-01-01T15_00_00Z.html
//! ```
//!
//! Voicepack runs a single sequential pipeline over those entries:
//!
//! 1. **Archive reader** ([`takeout`]) — opens the zip and lists `.html`
//!    entries.
//! 2. **Record parser** ([`parse`], [`contact`]) — matches entry names,
//!    extracts the known markers from each document, classifies and
//!    anonymizes the contact, and assembles one [`HistoryRecord`] per entry.
//! 3. **CSV writer** ([`output`]) — serializes records in a fixed column
//!    order.
//!
//! Entries that match the naming pattern but fail to parse are skipped and
//! reported in the run statistics; only archive-level problems (and contact
//! digest collisions) abort a run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use voicepack::output::{to_csv, OutputConfig};
//! use voicepack::parse_takeout;
//!
//! fn main() -> voicepack::Result<()> {
//!     let conversion = parse_takeout("takeout.zip")?;
//!     for skipped in &conversion.stats.skipped {
//!         eprintln!("skipped {}: {}", skipped.entry, skipped.reason);
//!     }
//!     let csv = to_csv(&conversion.records, &OutputConfig::new())?;
//!     print!("{csv}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`convert`] — the pipeline ([`parse_takeout`], [`convert::convert`],
//!   [`Conversion`](convert::Conversion))
//! - [`record`] — [`HistoryRecord`], [`RecordKind`], [`Direction`]
//! - [`takeout`] — zip archive access ([`Takeout`](takeout::Takeout))
//! - [`parse`] — entry-name matching and document extraction
//! - [`contact`] — contact classification and anonymization
//! - [`output`] — CSV writing ([`Column`](output::Column),
//!   [`OutputConfig`](output::OutputConfig))
//! - [`error`] — [`VoicepackError`] and the crate [`Result`] alias
//! - [`cli`] — clap argument definitions (`cli` feature)
//! - [`prelude`] — convenient re-exports

pub mod contact;
pub mod convert;
pub mod error;
pub mod output;
pub mod parse;
pub mod record;
pub mod takeout;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the main types at the crate root for convenience
pub use convert::{Conversion, ConvertStats, SkippedEntry, parse_takeout};
pub use error::{Result, VoicepackError};
pub use record::{Direction, HistoryRecord, RecordKind};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use voicepack::prelude::*;
/// ```
pub mod prelude {
    // Core record types
    pub use crate::record::{Direction, HistoryRecord, RecordKind};

    // Error types
    pub use crate::error::{ParseErrorKind, Result, VoicepackError};

    // Pipeline
    pub use crate::convert::{Conversion, ConvertStats, SkippedEntry, convert, parse_takeout};

    // Archive access
    pub use crate::takeout::Takeout;

    // Contact handling
    pub use crate::contact::{ContactFields, ContactStats, Contacts};

    // Output
    pub use crate::output::{Column, OutputConfig, to_csv, write_csv, write_csv_path};
}
