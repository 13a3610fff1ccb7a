//! Command-line interface definition using clap.
//!
//! Only [`Args`] lives here; the binary's control flow is in `main.rs`.
//! Column names arrive as plain strings and are parsed into
//! [`Column`](crate::output::Column) by the binary, so a bad `--exclude`
//! value reports through the crate's own error type rather than clap's.

use clap::Parser;

/// Convert a Google Voice Takeout export into a flat CSV of call, text,
/// and voicemail history.
#[derive(Parser, Debug, Clone)]
#[command(name = "voicepack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    voicepack takeout.zip > history.csv
    voicepack takeout.zip -o history.csv
    voicepack takeout.zip --exclude text --exclude contact_name
    voicepack takeout.zip -q | head")]
pub struct Args {
    /// Path to the Google Voice Takeout zip archive
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Write the CSV to a file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Drop a column from the output (repeatable)
    #[arg(long, value_name = "COLUMN")]
    pub exclude: Vec<String>,

    /// Suppress per-entry warnings and the run summary
    #[arg(short, long)]
    pub quiet: bool,
}
