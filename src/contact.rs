//! Contact classification and anonymization.
//!
//! The CSV never carries raw phone numbers. Every non-empty contact is
//! reduced to a short stable digest (`contact_id`); the readable
//! `contact_name` column is set only when the contact is a name rather than
//! a number. Counters feed the run summary.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use regex::Regex;

use crate::error::{Result, VoicepackError};

/// Hex characters kept from the hash (5 bytes).
const DIGEST_HEX_LEN: usize = 10;

/// A contact string is a number when it contains ten consecutive digits.
const NUMBER_PATTERN: &str = r"\d{10}";

/// The two CSV-facing contact fields produced by classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    /// Anonymized digest; `None` when the contact segment was empty
    pub contact_id: Option<String>,
    /// Readable name; `None` for numbers and empty contacts
    pub contact_name: Option<String>,
}

/// Classifies contacts and hands out anonymized digests.
///
/// One instance covers a whole conversion so digests stay consistent and
/// collisions across entries are caught.
#[derive(Debug)]
pub struct Contacts {
    number_pattern: Regex,
    anonymizer: Anonymizer,
    stats: ContactStats,
}

impl Contacts {
    /// Creates an empty classifier.
    pub fn new() -> Self {
        Contacts {
            number_pattern: Regex::new(NUMBER_PATTERN).unwrap(),
            anonymizer: Anonymizer::new(),
            stats: ContactStats::default(),
        }
    }

    /// Returns `true` if the contact string is a phone number.
    pub fn is_number(&self, contact: &str) -> bool {
        self.number_pattern.is_match(contact)
    }

    /// Classifies one contact segment and updates the running counters.
    pub fn classify(&mut self, contact: &str) -> Result<ContactFields> {
        self.stats.total += 1;
        if contact.is_empty() {
            self.stats.missing += 1;
            return Ok(ContactFields::default());
        }
        let contact_id = Some(self.anonymizer.digest(contact)?);
        if self.is_number(contact) {
            self.stats.numbers += 1;
            Ok(ContactFields {
                contact_id,
                contact_name: None,
            })
        } else {
            self.stats.named += 1;
            Ok(ContactFields {
                contact_id,
                contact_name: Some(contact.to_string()),
            })
        }
    }

    /// The counters accumulated so far.
    pub fn stats(&self) -> &ContactStats {
        &self.stats
    }

    /// Consumes the classifier, keeping only its counters.
    pub fn into_stats(self) -> ContactStats {
        self.stats
    }
}

impl Default for Contacts {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps contact strings to short stable digests, detecting collisions.
#[derive(Debug, Default)]
pub struct Anonymizer {
    // digest → the contact it was handed out for
    seen: HashMap<String, String>,
}

impl Anonymizer {
    /// Creates an anonymizer with no digests handed out yet.
    pub fn new() -> Self {
        Anonymizer {
            seen: HashMap::new(),
        }
    }

    /// Returns the digest for `value`, the same one on every call.
    ///
    /// Errors when a different value already owns this digest: a collision
    /// would silently merge two contacts in the output.
    pub fn digest(&mut self, value: &str) -> Result<String> {
        let hash = blake3::hash(value.as_bytes());
        let hex = hash.to_hex();
        let digest = hex.as_str()[..DIGEST_HEX_LEN].to_string();
        match self.seen.entry(digest) {
            Entry::Occupied(entry) => {
                if entry.get() == value {
                    Ok(entry.key().clone())
                } else {
                    Err(VoicepackError::digest_collision(
                        entry.key().clone(),
                        entry.get().clone(),
                        value,
                    ))
                }
            }
            Entry::Vacant(entry) => {
                let digest = entry.key().clone();
                entry.insert(value.to_string());
                Ok(digest)
            }
        }
    }
}

/// How the contacts of a run were classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactStats {
    /// Contacts seen, one per parsed entry
    pub total: usize,
    /// Contacts that were phone numbers
    pub numbers: usize,
    /// Contacts that were names
    pub named: usize,
    /// Entries with an empty contact segment
    pub missing: usize,
}

impl fmt::Display for ContactStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} numbers, {} names, {} missing",
            self.numbers, self.named, self.missing
        )
    }
}
