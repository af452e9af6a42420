//! Reports produced by a headless run.
//!
//! Every format leads with what the query box is doing (marked text,
//! dropdown, selected tokens) and then shows the screen.

use super::{HeadlessResult, HeadlessState};
use ratatui::buffer::Buffer;
use serde::Serialize;

/// Output format for headless mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Final screen plus a summary of the query box.
    #[default]
    Text,
    /// JSON with screen, state, snapshots and assertion counts.
    Json,
    /// One screen per executed event.
    Frames,
}

/// Converts a buffer to text, one line per row.
///
/// Trailing spaces and trailing blank rows are dropped; the result always
/// ends with a newline.
pub fn buffer_to_text(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    if width == 0 {
        return "\n".to_string();
    }

    let mut rows: Vec<String> = buffer
        .content
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end_matches(' ').to_string()
        })
        .collect();
    while rows.len() > 1 && rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }

    let mut text = rows.join("\n");
    text.push('\n');
    text
}

/// One-line description of the dropdown, e.g. `reclamos, >zona< (2)`.
fn dropdown_line(state: &HeadlessState) -> String {
    if !state.dropdown_open {
        return "closed".to_string();
    }
    let items: Vec<String> = state
        .candidates
        .iter()
        .enumerate()
        .map(|(i, value)| {
            if i == state.highlighted {
                format!(">{value}<")
            } else {
                value.clone()
            }
        })
        .collect();
    format!("{} ({})", items.join(", "), state.candidate_count)
}

fn state_summary(state: &HeadlessState) -> String {
    let selected = if state.selected_tokens.is_empty() {
        "-".to_string()
    } else {
        state.selected_tokens.join(", ")
    };
    format!(
        "query:     {:?}\ndropdown:  {}\nselected:  {}\nfocus:     {} | submitted: {}\n",
        state.marked_text,
        dropdown_line(state),
        selected,
        state.focus,
        state.submitted_count
    )
}

fn assertion_summary(result: &HeadlessResult) -> Option<String> {
    (result.assertions_passed > 0 || result.assertions_failed > 0).then(|| {
        format!(
            "Assertions: {} passed, {} failed",
            result.assertions_passed, result.assertions_failed
        )
    })
}

#[derive(Serialize)]
struct JsonSnapshot<'a> {
    name: &'a str,
    screen_lines: Vec<&'a str>,
    state: &'a HeadlessState,
}

#[derive(Serialize)]
struct JsonAssertions {
    passed: usize,
    failed: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    screen: &'a str,
    screen_lines: &'a [String],
    events_executed: usize,
    duration_ms: u128,
    assertions: JsonAssertions,
    state: &'a HeadlessState,
    snapshots: Vec<JsonSnapshot<'a>>,
}

/// Formats `result` in the requested format.
pub fn report(format: OutputFormat, result: &HeadlessResult) -> String {
    match format {
        OutputFormat::Text => text_report(result),
        OutputFormat::Json => json_report(result),
        OutputFormat::Frames => frames_report(result),
    }
}

fn text_report(result: &HeadlessResult) -> String {
    let mut out = String::new();
    for snapshot in &result.snapshots {
        out.push_str(&format!("=== SNAPSHOT {} ===\n", snapshot.name));
        out.push_str(&snapshot.screen);
        out.push_str(&state_summary(&snapshot.state));
        out.push('\n');
    }

    out.push_str(&result.screen);
    out.push_str(&state_summary(&result.state));

    out.push_str(&format!(
        "Events: {} executed in {}ms",
        result.events_executed,
        result.duration.as_millis()
    ));
    if let Some(assertions) = assertion_summary(result) {
        out.push_str(" | ");
        out.push_str(&assertions);
    }
    out.push('\n');
    out
}

fn json_report(result: &HeadlessResult) -> String {
    let report = JsonReport {
        screen: &result.screen,
        screen_lines: &result.screen_lines,
        events_executed: result.events_executed,
        duration_ms: result.duration.as_millis(),
        assertions: JsonAssertions {
            passed: result.assertions_passed,
            failed: result.assertions_failed,
        },
        state: &result.state,
        snapshots: result
            .snapshots
            .iter()
            .map(|snapshot| JsonSnapshot {
                name: &snapshot.name,
                screen_lines: snapshot.screen.lines().collect(),
                state: &snapshot.state,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
}

fn frames_report(result: &HeadlessResult) -> String {
    let mut out = String::new();
    for frame in &result.frames {
        out.push_str(&format!(
            "=== FRAME {} ({}) ===\n{}query: {:?}\n\n",
            frame.number,
            frame.event.as_deref().unwrap_or("initial"),
            frame.screen,
            frame.marked_text
        ));
    }

    out.push_str(&format!(
        "Total: {} frames, {} events executed in {}ms\n",
        result.frames.len(),
        result.events_executed,
        result.duration.as_millis()
    ));
    if let Some(assertions) = assertion_summary(result) {
        out.push_str(&assertions);
        out.push('\n');
    }
    out
}
