//! # voicepack CLI
//!
//! Command-line interface for the voicepack library.
//!
//! The CSV goes to stdout (or `-o FILE`); warnings and the run summary go
//! to stderr so piped output stays a clean CSV stream.

use std::io::{self, Write};
use std::process;

use clap::Parser as ClapParser;

use voicepack::VoicepackError;
use voicepack::cli::Args;
use voicepack::convert::parse_takeout;
use voicepack::output::{OutputConfig, write_csv, write_csv_path};

fn main() {
    if let Err(e) = run() {
        // `voicepack x.zip | head` closes our stdout; nothing to report
        if !e.is_broken_pipe() {
            eprintln!("❌ Error: {}", e);
        }
        process::exit(1);
    }
}

fn run() -> Result<(), VoicepackError> {
    let args = <Args as ClapParser>::parse();

    let mut config = OutputConfig::new();
    for name in &args.exclude {
        config = config.exclude(name.parse()?);
    }

    let conversion = parse_takeout(&args.path)?;

    if !args.quiet {
        for skipped in &conversion.stats.skipped {
            eprintln!("⚠️  Skipped {}: {}", skipped.entry, skipped.reason);
        }
    }

    match &args.output {
        Some(path) => write_csv_path(&conversion.records, path, &config)?,
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_csv(&conversion.records, &mut lock, &config)?;
            lock.flush()?;
        }
    }

    if !args.quiet {
        eprintln!("📊 Summary: {}", conversion.stats);
    }

    Ok(())
}
