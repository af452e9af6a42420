//! Common test utilities for TUI tests.

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

/// Single-table schema used by the completion scenarios.
pub const RECLAMOS_SCHEMA: &str =
    r#"{"reclamos": [{"name": "estado", "type": "text", "fk": null}]}"#;

/// Run querybox in headless mode with the given arguments.
///
/// The user's config file and `QUERYBOX_SCHEMA` are ignored so runs only
/// depend on `args`.
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_querybox"))
        .args(["--config", "/nonexistent/querybox/config.toml"])
        .args(args)
        .env_remove("QUERYBOX_SCHEMA")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Runs headless with JSON output and parses the result.
pub fn run_json(args: &[&str]) -> (i32, serde_json::Value) {
    let mut full = vec!["--headless", "--output", "json"];
    full.extend_from_slice(args);
    let (code, stdout, stderr) = run_headless(&full);
    let json = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON ({e}). stdout: {stdout} stderr: {stderr}"));
    (code, json)
}

/// Writes `contents` to a temporary file (schemas and event scripts).
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}
