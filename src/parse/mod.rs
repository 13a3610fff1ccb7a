//! Parsing stages for Voice archives.
//!
//! Two layers, used in order by the pipeline:
//!
//! - [`filename`] — which entries are history records, and the metadata
//!   (contact, kind, UTC timestamp) their names carry
//! - [`document`] — the markers inside one HTML document (datetimes,
//!   duration, transcript, thread messages), built on the tolerant
//!   [`markup`] scanner

pub mod document;
pub mod filename;
pub mod markup;

pub use document::{DocumentParser, ParsedDocument, ThreadMessage};
pub use filename::{EntryMatcher, EntryMeta, EntryName};
pub use markup::Scanner;
