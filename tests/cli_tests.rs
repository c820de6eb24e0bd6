#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_adds_standard_calendar() {
    run_cli("standard\nlist\nquit\n")
        .success()
        .stdout(str_contains("Added Standard calendar #1."))
        .stdout(str_contains("0111110"));
}

#[test]
fn cli_counts_working_days_and_steps_dates() {
    run_cli("standard\nduration 1 2025-01-06 2025-01-12\ndate 1 2025-01-06 3d\nquit\n")
        .success()
        .stdout(str_contains("Duration: 5d"))
        .stdout(str_contains("Date: 2025-01-08"));
}

#[test]
fn cli_exceptions_change_working_dates() {
    run_cli("standard\nexcept 1 2025-12-25 2025-12-26 0\nworking 1 2025-12-25\nworking 1 2025-12-24\nquit\n")
        .success()
        .stdout(str_contains("2025-12-25 is not a working date."))
        .stdout(str_contains("2025-12-24 is a working date."));
}

#[test]
fn cli_derived_calendar_follows_base() {
    run_cli("standard\nderived Standard\nday 2 7 1\nduration 2 2025-01-06 2025-01-12\nshow 2\nquit\n")
        .success()
        .stdout(str_contains("Duration: 6d"))
        .stdout(str_contains("55,Standard,2,2,2,2,2,2,1"));
}

#[test]
fn cli_reports_missing_base_calendar() {
    run_cli("derived Night\nvalidate\nquit\n")
        .success()
        .stdout(str_contains("Night"))
        .stdout(str_contains("Error:"));
}

#[test]
fn cli_reports_unknown_calendar() {
    run_cli("working 9 2025-01-06\nquit\n")
        .success()
        .stdout(str_contains("Calendar #9 not found."));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "standard\nbase Night\nsave json {}\nbase Temp\nload json {}\nlist\nquit\n",
        path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Calendars loaded from"));
    let after_reload = output
        .split("Calendars loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("Night"));
    assert!(!after_reload.contains("Temp"));
}
