//! Integration tests for the `x-wr-timezone` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run the actual binary,
//! covering stdin/stdout piping, file I/O, the VTIMEZONE flags, zone selection
//! and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

const BIN: &str = "x-wr-timezone";

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture must exist")
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_stdout(args: &[&str], stdin: &str) -> String {
    let output = cmd().args(args).write_stdin(stdin).output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and version
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_describes_the_tool() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("x-wr-timezone"))
        .stdout(predicate::str::contains("--no-timezone"))
        .stdout(predicate::str::contains("--timezone"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("x-wr-timezone"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stdin_to_stdout() {
    let out = run_stdout(&["--no-timezone"], &fixture("new-york.ics"));

    assert!(out.contains("DTSTART;TZID=America/New_York:20211222T120000\r\n"));
    assert!(out.contains("DTEND;TZID=America/New_York:20210701T093000\r\n"));
    assert!(out.contains("X-WR-TIMEZONE:America/New_York\r\n"));
    assert!(!out.contains("BEGIN:VTIMEZONE"));
}

#[test]
fn dash_means_stdin_and_stdout() {
    let out = run_stdout(&["--no-timezone", "-", "-"], &fixture("new-york.ics"));
    assert!(out.contains("DTSTART;TZID=America/New_York:20211222T120000\r\n"));
}

#[test]
fn timezone_is_added_by_default() {
    let out = run_stdout(&[], &fixture("new-york.ics"));

    assert_eq!(out.matches("BEGIN:VTIMEZONE").count(), 1);
    assert!(out.contains("BEGIN:VTIMEZONE\r\nTZID:America/New_York\r\n"));
    assert!(out.find("BEGIN:VTIMEZONE") < out.find("BEGIN:VEVENT"));
}

#[test]
fn add_timezone_flag_matches_the_default() {
    let input = fixture("new-york.ics");
    assert_eq!(run_stdout(&["--add-timezone"], &input), run_stdout(&[], &input));
}

#[test]
fn last_timezone_flag_wins() {
    let input = fixture("new-york.ics");
    let out = run_stdout(&["--add-timezone", "--no-timezone"], &input);
    assert!(!out.contains("BEGIN:VTIMEZONE"));

    let out = run_stdout(&["--no-timezone", "--add-timezone"], &input);
    assert!(out.contains("BEGIN:VTIMEZONE"));
}

#[test]
fn file_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = fixture_path("new-york.ics");
    let output_path = dir.path().join("out.ics");

    cmd()
        .args(["--no-timezone", input_path.as_str()])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert!(content.contains("DTSTART;TZID=America/New_York:20210701T080000\r\n"));
}

#[test]
fn explicit_timezone_overrides_x_wr_timezone() {
    let out = run_stdout(&["--no-timezone", "-z", "Asia/Tokyo"], &fixture("new-york.ics"));
    assert!(out.contains("DTSTART;TZID=Asia/Tokyo:20211223T020000\r\n"));

    let out = run_stdout(&["--timezone", "Asia/Tokyo"], &fixture("no-x-wr-timezone.ics"));
    assert!(out.contains("TZID:Asia/Tokyo\r\n"));
    assert!(out.contains("DTSTART;TZID=Asia/Tokyo:20211223T020000\r\n"));
}

#[test]
fn calendar_without_x_wr_timezone_is_written_back_unchanged() {
    let input = fixture("no-x-wr-timezone.ics");
    let output = cmd().write_stdin(input.clone()).output().unwrap();

    assert!(output.status.success());
    assert_eq!(output.stdout, input.into_bytes());
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn verbose_logs_to_stderr() {
    cmd()
        .args(["-v", "--no-timezone"])
        .write_stdin(fixture("new-york.ics"))
        .assert()
        .success()
        .stdout(predicate::str::contains("BEGIN:VCALENDAR"))
        .stderr(predicate::str::contains("converting calendar"));
}

#[test]
fn quiet_by_default() {
    cmd()
        .arg("--no-timezone")
        .write_stdin(fixture("new-york.ics"))
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unknown_timezone_fails() {
    cmd()
        .args(["-z", "Mars/Olympus_Mons"])
        .write_stdin(fixture("new-york.ics"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("Unknown timezone: Mars/Olympus_Mons"));
}

#[test]
fn invalid_calendar_fails() {
    cmd()
        .write_stdin(fixture("broken.ics"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse calendar"));
}

#[test]
fn missing_input_file_fails() {
    cmd()
        .arg("/nonexistent/calendar.ics")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn non_utf8_input_fails() {
    cmd()
        .write_stdin(vec![0xff, 0xfe, 0x00, 0x42])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}
