//! Archive access for Takeout exports.
//!
//! A Takeout export is a plain zip archive; the reader's only jobs are to
//! open it, list the `.html` entries, and hand each one out as UTF-8 text.
//! Which of those entries are actually history records is decided later by
//! the filename matcher.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{ParseErrorKind, Result};

/// An opened Takeout archive.
///
/// Generic over the underlying reader so tests and benchmarks can feed
/// in-memory archives through a [`Cursor`].
#[derive(Debug)]
pub struct Takeout<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl Takeout<File> {
    /// Opens a Takeout archive on disk.
    ///
    /// Fails when the path doesn't exist, isn't readable, or isn't a valid
    /// zip archive. These are the fatal errors of a run.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl Takeout<Cursor<Vec<u8>>> {
    /// Opens a Takeout archive held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> Takeout<R> {
    /// Opens a Takeout archive from any seekable reader.
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Takeout {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Number of entries in the archive, of any type.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Names of the `.html` entries, in archive order.
    pub fn html_entries(&self) -> Vec<String> {
        self.archive
            .file_names()
            .filter(|name| name.ends_with(".html"))
            .map(str::to_string)
            .collect()
    }

    /// Reads one entry as UTF-8 text.
    ///
    /// Per-entry failures (damaged member, non-UTF-8 content) come back as
    /// [`ParseErrorKind`] so the pipeline can skip the entry and keep going.
    pub fn read_entry(&mut self, name: &str) -> std::result::Result<String, ParseErrorKind> {
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|e| ParseErrorKind::Read(e.to_string()))?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| ParseErrorKind::Read(e.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }
}
