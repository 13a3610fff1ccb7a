//! End-to-end CLI tests for voicepack.
//!
//! These tests run the actual binary against zip fixtures written to a
//! temp directory and check stdout (the CSV stream), stderr (warnings and
//! the summary), and exit codes.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};
use zip::write::SimpleFileOptions;

// ============================================================================
// Test fixtures
// ============================================================================

const MISSED_CALL: &str = "<html><body><div class=\"haudio\">\n\
<abbr class=\"published\" title=\"2019-01-01T10:00:00.000-05:00\">Jan 1</abbr>\n\
</div></body></html>";

const PLACED_CALL: &str = "<html><body><div class=\"haudio\">\n\
<abbr class=\"published\" title=\"2020-06-14T12:40:38.000-04:00\">Jun 14</abbr>\n\
<abbr class=\"duration\" title=\"PT2M23S\">(00:02:23)</abbr>\n\
</div></body></html>";

const TEXT_THREAD: &str = "<html><body><div class=\"hChatLog hfeed\">\n\
<div class=\"message\">\n\
<abbr class=\"dt\" title=\"2020-08-21T14:57:10.000-04:00\">Aug 21</abbr>:\n\
<cite class=\"sender vcard\"><span class=\"fn\">Me</span></cite>:\n\
<q>see you at 8</q>\n\
</div></div></body></html>";

const GARBAGE: &str = "<html><body><p>nothing recognizable</p></body></html>";

/// Writes a Takeout zip into `dir` and returns its path.
fn write_takeout(dir: &TempDir, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.path().join(name);
    let file = fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (entry_name, content) in entries {
        writer
            .start_file(*entry_name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

fn full_takeout(dir: &TempDir) -> PathBuf {
    write_takeout(
        dir,
        "takeout.zip",
        &[
            ("Takeout/archive_browser.html", "<html></html>"),
            (
                "Takeout/Voice/Calls/Bob Smith - Missed - 2019-01-01T15_00_00Z.html",
                MISSED_CALL,
            ),
            (
                "Takeout/Voice/Calls/Jane Doe - Placed - 2020-06-14T16_40_38Z.html",
                PLACED_CALL,
            ),
            (
                "Takeout/Voice/Calls/Jane Doe - Text - 2020-08-21T18_57_10Z.html",
                TEXT_THREAD,
            ),
        ],
    )
}

fn voicepack_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_voicepack"));
    Command::from_std(cmd)
}

fn digest_of(contact: &str) -> String {
    blake3::hash(contact.as_bytes()).to_hex().as_str()[..10].to_string()
}

// ============================================================================
// Basic conversion
// ============================================================================

mod conversion {
    use super::*;

    #[test]
    fn test_converts_archive_to_csv_on_stdout() {
        let dir = tempdir().unwrap();
        let archive = full_takeout(&dir);

        voicepack_cmd()
            .arg(&archive)
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "timestamp,date,time,type,direction,contact_id,contact_name,\
                 call_duration,message_days,message_count,text",
            ))
            .stdout(predicate::str::contains("Missed,missed"))
            .stdout(predicate::str::contains("Placed,outgoing"))
            .stdout(predicate::str::contains("see you at 8"))
            .stderr(predicate::str::contains("Summary"));
    }

    #[test]
    fn test_exact_csv_for_single_missed_call() {
        let dir = tempdir().unwrap();
        let archive = write_takeout(
            &dir,
            "one.zip",
            &[(
                "Takeout/Voice/Calls/Bob Smith - Missed - 2019-01-01T15_00_00Z.html",
                MISSED_CALL,
            )],
        );

        let expected = format!(
            "timestamp,date,time,type,direction,contact_id,contact_name,\
             call_duration,message_days,message_count,text\n\
             2019-01-01T15:00:00+00:00,2019-01-01,10:00 AM,Missed,missed,{},\
             Bob Smith,00:00:00,,,\n",
            digest_of("Bob Smith")
        );
        voicepack_cmd()
            .arg(&archive)
            .assert()
            .success()
            .stdout(expected);
    }

    #[test]
    fn test_no_matching_entries_prints_header_only() {
        let dir = tempdir().unwrap();
        let archive = write_takeout(
            &dir,
            "empty.zip",
            &[("Takeout/archive_browser.html", "<html></html>")],
        );

        let assert = voicepack_cmd().arg(&archive).assert().success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert_eq!(stdout.lines().count(), 1);
        assert!(stdout.starts_with("timestamp,"));
    }

    #[test]
    fn test_output_flag_writes_file_and_keeps_stdout_empty() {
        let dir = tempdir().unwrap();
        let archive = full_takeout(&dir);
        let out = dir.path().join("history.csv");

        voicepack_cmd()
            .args([
                archive.to_str().unwrap(),
                "-o",
                out.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&out).unwrap();
        assert!(content.starts_with("timestamp,"));
        assert_eq!(content.lines().count(), 4);
    }
}

// ============================================================================
// Warnings and quiet mode
// ============================================================================

mod warnings {
    use super::*;

    #[test]
    fn test_malformed_entry_warns_and_continues() {
        let dir = tempdir().unwrap();
        let archive = write_takeout(
            &dir,
            "mixed.zip",
            &[
                (
                    "Takeout/Voice/Calls/Eve - Received - 2020-07-01T01_02_03Z.html",
                    GARBAGE,
                ),
                (
                    "Takeout/Voice/Calls/Jane Doe - Placed - 2020-06-14T16_40_38Z.html",
                    PLACED_CALL,
                ),
            ],
        );

        voicepack_cmd()
            .arg(&archive)
            .assert()
            .success()
            .stdout(predicate::str::contains("Jane Doe"))
            .stderr(predicate::str::contains("Skipped"))
            .stderr(predicate::str::contains("Eve"));
    }

    #[test]
    fn test_quiet_suppresses_warnings_and_summary() {
        let dir = tempdir().unwrap();
        let archive = write_takeout(
            &dir,
            "mixed.zip",
            &[
                (
                    "Takeout/Voice/Calls/Eve - Received - 2020-07-01T01_02_03Z.html",
                    GARBAGE,
                ),
                (
                    "Takeout/Voice/Calls/Jane Doe - Placed - 2020-06-14T16_40_38Z.html",
                    PLACED_CALL,
                ),
            ],
        );

        voicepack_cmd()
            .args([archive.to_str().unwrap(), "-q"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Jane Doe"))
            .stderr(predicate::str::is_empty());
    }
}

// ============================================================================
// Column exclusion
// ============================================================================

mod exclusion {
    use super::*;

    #[test]
    fn test_exclude_drops_columns() {
        let dir = tempdir().unwrap();
        let archive = full_takeout(&dir);

        voicepack_cmd()
            .args([
                archive.to_str().unwrap(),
                "--exclude",
                "text",
                "--exclude",
                "contact_name",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("text").not())
            .stdout(predicate::str::contains("Jane Doe").not())
            .stdout(predicate::str::contains("see you at 8").not())
            .stdout(predicate::str::contains("message_count"));
    }

    #[test]
    fn test_unknown_exclude_column_is_fatal() {
        let dir = tempdir().unwrap();
        let archive = full_takeout(&dir);

        voicepack_cmd()
            .args([archive.to_str().unwrap(), "--exclude", "durration"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown column"))
            .stderr(predicate::str::contains("durration"));
    }
}

// ============================================================================
// Error handling
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_missing_argument_names_path() {
        voicepack_cmd()
            .assert()
            .failure()
            .stderr(predicate::str::contains("PATH"));
    }

    #[test]
    fn test_nonexistent_archive() {
        voicepack_cmd()
            .arg("no_such_takeout.zip")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_not_a_zip_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bogus.zip");
        fs::write(&path, "this is not a zip archive").unwrap();

        voicepack_cmd()
            .arg(&path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }
}

// ============================================================================
// Help and version
// ============================================================================

mod help_and_version {
    use super::*;

    #[test]
    fn test_help_flag() {
        voicepack_cmd()
            .args(["--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Takeout"))
            .stdout(predicate::str::contains("PATH"))
            .stdout(predicate::str::contains("--exclude"))
            .stdout(predicate::str::contains("EXAMPLES"));
    }

    #[test]
    fn test_help_flag_short() {
        voicepack_cmd()
            .args(["-h"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_version_flag() {
        voicepack_cmd()
            .args(["--version"])
            .assert()
            .success()
            .stdout(predicate::str::contains("voicepack"))
            .stdout(predicate::str::contains("0."));
    }
}
