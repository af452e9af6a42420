//! Integration tests for headless mode.

use super::common::{run_headless, run_json, temp_file};

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_headless(&["--headless", "--events", "key:esc"]);

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(
        stdout.contains("Events: 1 executed"),
        "Should show events executed"
    );
    assert!(stdout.contains("querybox v"));
}

#[test]
fn test_headless_type_event() {
    let (code, json) = run_json(&["--events", "type:hello world"]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["input_text"], "hello world");
    assert_eq!(json["state"]["focus"], "Input");
}

#[test]
fn test_headless_assertion_pass() {
    let (code, json) = run_json(&["--events", "type:zona,assert:contains:zona"]);

    assert_eq!(code, 0);
    assert_eq!(json["assertions"]["passed"], 1);
    assert_eq!(json["assertions"]["failed"], 0);
}

#[test]
fn test_headless_assertion_fail() {
    let (code, json) = run_json(&["--events", "type:zona,assert:contains:goodbye"]);

    assert_eq!(code, 1, "Should exit with code 1 on assertion failure");
    assert_eq!(json["assertions"]["passed"], 0);
    assert_eq!(json["assertions"]["failed"], 1);
}

#[test]
fn test_headless_fail_fast() {
    let (code, json) = run_json(&[
        "--fail-fast",
        "--events",
        "assert:contains:goodbye,type:zona",
    ]);

    assert_eq!(code, 1);
    assert_eq!(json["state"]["input_text"], "");
}

#[test]
fn test_headless_custom_size() {
    let (code, json) = run_json(&["--events", "key:esc", "--size", "120x40"]);

    assert_eq!(code, 0);
    let first = json["screen_lines"][0].as_str().unwrap_or_default();
    assert!(first.contains("querybox"));
    assert!(json["screen_lines"].as_array().is_some_and(|l| l.len() <= 40));
}

#[test]
fn test_headless_frames_output() {
    let (code, stdout, _) = run_headless(&[
        "--headless",
        "--events",
        "type:a,type:b",
        "--output",
        "frames",
    ]);

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 1 (type:a) ==="));
    assert!(stdout.contains("=== FRAME 2 (type:b) ==="));
}

#[test]
fn test_headless_requires_events_or_script() {
    let (code, stdout, stderr) = run_headless(&["--headless"]);

    assert_eq!(code, 1, "Should fail without events or script");
    let combined = format!("{}{}", stdout, stderr);
    assert!(
        combined.contains("requires --events or --script"),
        "Should show error message. Got: {}",
        combined
    );
}

#[test]
fn test_headless_invalid_event() {
    let (code, _, stderr) = run_headless(&["--headless", "--events", "jump:high"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown event type"));
}

#[test]
fn test_headless_script_file() {
    let script = temp_file(
        "# open the column dropdown\ntype:reclamos.\nassert:state:dropdown_open=true\nkey:esc\nassert:state:dropdown_open=false\n",
    );
    let path = script.path().to_string_lossy().to_string();
    let (code, json) = run_json(&["--script", &path]);

    assert_eq!(code, 0);
    assert_eq!(json["assertions"]["passed"], 2);
    assert_eq!(json["events_executed"], 4);
}

#[test]
fn test_headless_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.json");
    let out_str = out.to_string_lossy().to_string();

    let (code, stdout, _) = run_headless(&[
        "--headless",
        "--events",
        "type:zona",
        "--output",
        "json",
        "--output-file",
        &out_str,
    ]);

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["state"]["input_text"], "zona");
}

#[test]
fn test_headless_read_only() {
    let (code, json) = run_json(&["--read-only", "--events", "type:reclam,paste:zona"]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["input_text"], "");
    assert!(json["screen"]
        .as_str()
        .is_some_and(|s| s.contains("read-only")));
}

#[test]
fn test_headless_missing_schema_file() {
    let (code, _, stderr) = run_headless(&[
        "--headless",
        "--schema",
        "/nonexistent/schema.json",
        "--events",
        "key:esc",
    ]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Schema Error"));
}

#[test]
fn test_headless_submit_history() {
    let (code, json) = run_json(&[
        "--events",
        "type:zona,key:esc,key:enter,assert:state:submitted_count=1",
    ]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["input_text"], "");
    assert!(json["screen"]
        .as_str()
        .is_some_and(|s| s.contains("1. zona")));
}

#[test]
fn test_headless_resize_event_shrinks_screen() {
    let (code, json) = run_json(&["--events", "resize:30x10,type:reclam"]);

    assert_eq!(code, 0, "{json}");
    let lines: Vec<&str> = json["screen_lines"]
        .as_array()
        .map(|l| l.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    assert!(!lines.is_empty() && lines.len() <= 10, "got {lines:?}");
    assert!(lines.iter().all(|l| l.chars().count() <= 30), "got {lines:?}");
    // The input box border spans the full new width
    assert_eq!(lines[1].chars().count(), 30);
    assert_eq!(json["state"]["dropdown_open"], true);
}

#[test]
fn test_headless_snapshot_in_json() {
    let (code, json) = run_json(&["--events", "type:reclam,snapshot:open,key:tab"]);

    assert_eq!(code, 0);
    assert_eq!(json["snapshots"][0]["name"], "open");
    assert_eq!(json["snapshots"][0]["state"]["dropdown_open"], true);
    assert_eq!(json["state"]["dropdown_open"], false);
}
