//! Tests for the read-only commands: `dates` and `preview`

use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn rollsheet(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rollsheet"))
        .args(args)
        .current_dir(dir)
        .env_remove("ROLLSHEET_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute rollsheet")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn dates_lists_july_weekdays() {
    let dir = tempdir().unwrap();
    let output = rollsheet(dir.path(), &["dates"]);

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 23);
    assert_eq!(lines[0], "2025-07-01");
    assert_eq!(lines[22], "2025-07-31");
}

#[test]
fn dates_with_saturdays() {
    let dir = tempdir().unwrap();
    let output = rollsheet(
        dir.path(),
        &["dates", "--working-days", "mon,tue,wed,thu,fri,sat"],
    );

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 27);
    assert!(lines.contains(&"2025-07-05".to_string()));
}

#[test]
fn dates_never_writes_a_file() {
    let dir = tempdir().unwrap();
    assert!(rollsheet(dir.path(), &["dates"]).status.success());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn preview_text_table() {
    let dir = tempdir().unwrap();
    let output = rollsheet(dir.path(), &["preview"]);

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines[0], "July 2025 Attendance");
    assert!(lines[2].starts_with("Employee ID"));
    assert_eq!(lines.len(), 7, "Title, blank, header, rule, three rows");
}

#[test]
fn preview_json() {
    let dir = tempdir().unwrap();
    let output = rollsheet(dir.path(), &["preview", "--format", "json", "--month", "6"]);

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");

    assert_eq!(parsed["title"], "June 2025 Attendance");
    // June 2025: 21 weekdays
    assert_eq!(parsed["header"].as_array().unwrap().len(), 23);
    assert_eq!(parsed["rows"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["dates"][0], "2025-06-02");
}
