//! End-to-end tests for the `keyprobe` binary.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Path to the keyprobe binary
fn keyprobe_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keyprobe")
}

fn write_descriptor(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_inspect_summary() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_descriptor(
        &temp_dir,
        "corne.json",
        r#"{"keyboard": "Corne", "split": {"enabled": true}}"#,
    );

    let output = Command::new(keyprobe_bin())
        .args(["inspect", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Corne"));
    assert!(stdout.contains("split"));
    assert!(stdout.contains("42"));
}

#[test]
fn test_inspect_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_descriptor(&temp_dir, "board.json", r#"{"keyboard_name": "Bench"}"#);

    let output = Command::new(keyprobe_bin())
        .args(["inspect", path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let model: serde_json::Value = serde_json::from_str(&stdout).expect("Should parse JSON output");

    assert_eq!(model["name"], "Bench");
    assert_eq!(model["firmware"], "qmk");
    assert_eq!(model["layout"], "60%");
    assert_eq!(model["keys"].as_array().unwrap().len(), 61);
}

#[test]
fn test_inspect_invalid_json_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_descriptor(&temp_dir, "broken.json", "{not json");

    let output = Command::new(keyprobe_bin())
        .args(["inspect", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.json"));
}

#[test]
fn test_inspect_missing_file_fails() {
    let output = Command::new(keyprobe_bin())
        .args(["inspect", "/nonexistent/board.json"])
        .output()
        .expect("Failed to execute command");

    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn test_report_skeleton() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_descriptor(&temp_dir, "board.json", r#"{"matrix": {"rows": 2, "cols": 3}}"#);

    let output = Command::new(keyprobe_bin())
        .args(["report", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("Should parse JSON output");

    assert_eq!(report["total_keys"], 6);
    assert_eq!(report["tested_keys"], 0);
    assert_eq!(report["keys"].as_array().unwrap().len(), 6);
    assert_eq!(report["keys"][0]["tested"], false);
}

#[test]
fn test_help_lists_subcommands() {
    let output = Command::new(keyprobe_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("report"));
}
