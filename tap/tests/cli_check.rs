//! CLI tests for `tap check` and `tap normalize`.
//!
//! Spawns the tap binary on fixture files and verifies exit codes and output.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tap::exit_codes;

fn write_fixture(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn tap(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tap"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run tap")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

#[test]
fn check_passing_run_exits_ok() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path(), "run.tap", "1..2\nok 1 first\nok 2 second\n");

    let output = tap(temp.path(), &["check", "run.tap"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        stdout(&output),
        "summary: planned=2 total=2 passed=2 failed=0 skipped=0 todo=0 bonus=0 missing=0\n"
    );
}

#[test]
fn check_failing_run_lists_failures() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(
        temp.path(),
        "run.tap",
        "1..2\nok 1\n# expected 3\n# got 4\nnot ok 2 adds\n",
    );

    let output = tap(temp.path(), &["check", "run.tap"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    let out = stdout(&output);
    assert!(out.starts_with("failed: 2 adds\n    expected 3\n    got 4\n"), "{out}");
}

#[test]
fn check_missing_results_reports_ranges() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path(), "run.tap", "1..5\nok 1\nok 3\n");

    let output = tap(temp.path(), &["check", "run.tap"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stdout(&output).contains("error: no result for 2, 4-5\n"));
}

#[test]
fn check_bail_out_exits_aborted() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(
        temp.path(),
        "run.tap",
        "ok 1 boop\nBail out! Database not available\nok 2\n",
    );

    let output = tap(temp.path(), &["check", "run.tap"]);

    assert_eq!(output.status.code(), Some(exit_codes::ABORTED));
    assert!(stdout(&output).contains("error: testing aborted: Database not available"));
}

#[test]
fn check_reads_stdin() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut child = Command::new(env!("CARGO_BIN_EXE_tap"))
        .current_dir(temp.path())
        .arg("check")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn tap");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"ok\nok\n")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).contains("planned=none total=2 passed=2"));
}

#[test]
fn check_config_fails_on_skip() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path(), "run.tap", "1..1\nok 1 # SKIP no db\n");
    write_fixture(temp.path(), "tap.toml", "fail_on_skip = true\n");

    let output = tap(temp.path(), &["check", "run.tap"]);
    assert_eq!(output.status.code(), Some(exit_codes::FAILED));

    let output = tap(temp.path(), &["check", "run.tap", "--config", "other.toml"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
}

#[test]
fn check_invalid_config_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path(), "run.tap", "ok\n");
    write_fixture(temp.path(), "tap.toml", "max_diagnostic_lines = 0\n");

    let output = tap(temp.path(), &["check", "run.tap"]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_diagnostic_lines must be > 0"), "{stderr}");
}

#[test]
fn check_missing_file_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = tap(temp.path(), &["check", "absent.tap"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn check_json_includes_report_and_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path(), "run.tap", "1..2\nok 1 first\n");

    let output = tap(temp.path(), &["check", "run.tap", "--json"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["error"], "no result for 2");
    assert_eq!(value["success"], false);
    assert_eq!(value["report"]["plan"]["max"], 2);
    assert_eq!(value["report"]["tests"][0]["name"], "first");
    assert!(value["report"]["tests"][1].is_null());
    assert_eq!(value["summary"]["missing"], 1);
}

#[test]
fn normalize_rewrites_canonical_tap() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(
        temp.path(),
        "run.tap",
        "TAP version 13\nok - first\n# note\nnot ok wotsit # todo: implement\nok 3 # skipped offline\n1..3\n",
    );

    let output = tap(temp.path(), &["normalize", "run.tap"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        stdout(&output),
        "1..3\nok 1 first\n# note\nnot ok 2 wotsit # TODO: implement\nok 3 # SKIP: offline\n"
    );
}

#[test]
fn normalize_keeps_bail_out() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path(), "run.tap", "ok 1\nBail out! printer on fire\n");

    let output = tap(temp.path(), &["normalize", "run.tap"]);

    assert_eq!(output.status.code(), Some(exit_codes::ABORTED));
    assert_eq!(stdout(&output), "ok 1\nBail out! printer on fire\n");
}
