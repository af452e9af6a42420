//! End-to-end completion scenarios driven through the headless binary.

use super::common::{run_json, temp_file, RECLAMOS_SCHEMA};

fn run_with_schema(schema_json: &str, events: &str) -> (i32, serde_json::Value) {
    let schema = temp_file(schema_json);
    let path = schema.path().to_string_lossy().to_string();
    run_json(&["--schema", &path, "--events", events])
}

fn strings(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_table_completion_with_tab() {
    let (code, json) = run_with_schema(
        RECLAMOS_SCHEMA,
        "type:reclam,assert:state:candidates=[\"reclamos\"],key:tab",
    );

    assert_eq!(code, 0, "{json}");
    let state = &json["state"];
    assert_eq!(state["input_text"], "reclamos ");
    assert_eq!(strings(&state["selected_tokens"]), vec!["reclamos"]);
    assert_eq!(state["dropdown_open"], false);
}

#[test]
fn test_non_matching_word_keeps_dropdown_closed() {
    let (code, json) = run_with_schema(RECLAMOS_SCHEMA, "type:reclam,key:tab,type:estad");

    assert_eq!(code, 0);
    let state = &json["state"];
    assert_eq!(state["input_text"], "reclamos estad");
    assert_eq!(state["dropdown_open"], false);
    assert_eq!(state["candidate_count"], 0);
    assert_eq!(strings(&state["selected_tokens"]), vec!["reclamos"]);
}

#[test]
fn test_column_completion_with_enter() {
    let (code, json) = run_with_schema(
        RECLAMOS_SCHEMA,
        "type:reclamos.est,assert:state:candidates=[\"estado\"],key:enter",
    );

    assert_eq!(code, 0, "{json}");
    let state = &json["state"];
    assert_eq!(state["input_text"], "reclamos.estado ");
    assert_eq!(strings(&state["selected_tokens"]), vec!["reclamos.estado"]);
    assert_eq!(state["marked_text"], "[reclamos.estado] ");
    assert_eq!(state["submitted_count"], 0);
}

#[test]
fn test_arrow_down_clamps_at_last_candidate() {
    let schema = r#"{"reclamos": [
        {"name": "estado", "type": "text"},
        {"name": "estado_previo", "type": "text", "fk": null}
    ]}"#;
    let (code, json) = run_with_schema(
        schema,
        "type:reclamos.est,key:down,key:down,key:down,key:down,key:down",
    );

    assert_eq!(code, 0);
    let state = &json["state"];
    assert_eq!(state["candidate_count"], 2);
    assert_eq!(state["highlighted"], 1);
    assert_eq!(state["dropdown_open"], true);
}

#[test]
fn test_schema_swap_keeps_highlight_and_stops_suggestions() {
    let (code, json) = run_with_schema(
        RECLAMOS_SCHEMA,
        "type:reclamos.est,key:enter,schema:empty,type:reclam",
    );

    assert_eq!(code, 0);
    let state = &json["state"];
    assert_eq!(state["input_text"], "reclamos.estado reclam");
    assert_eq!(state["dropdown_open"], false);
    assert_eq!(state["marked_text"], "[reclamos.estado] reclam");
    assert!(json["screen"]
        .as_str()
        .is_some_and(|s| s.contains("0 tables")));
}

#[test]
fn test_schema_reload_from_file() {
    let next = temp_file(r#"{"zona": [{"name": "nombre", "type": "text"}]}"#);
    let events = format!(
        "type:zona,assert:state:dropdown_open=false,schema:{},key:backspace,type:a",
        next.path().display()
    );
    let (code, json) = run_with_schema(RECLAMOS_SCHEMA, &events);

    assert_eq!(code, 0, "{json}");
    assert_eq!(json["state"]["dropdown_open"], true);
    assert_eq!(strings(&json["state"]["candidates"]), vec!["zona"]);
}

#[test]
fn test_click_on_candidate_commits() {
    // Input box occupies rows 1..=3; the popup border sits on row 4
    let (code, json) = run_with_schema(RECLAMOS_SCHEMA, "type:reclam,click:4x5");

    assert_eq!(code, 0);
    assert_eq!(json["state"]["input_text"], "reclamos ");
    assert_eq!(strings(&json["state"]["selected_tokens"]), vec!["reclamos"]);
}

#[test]
fn test_blur_closes_dropdown_after_delay() {
    let (code, json) = run_with_schema(
        RECLAMOS_SCHEMA,
        "type:reclam,focus:lost,assert:state:dropdown_open=true,wait:250ms,assert:state:dropdown_open=false",
    );

    assert_eq!(code, 0, "{json}");
    assert_eq!(json["assertions"]["passed"], 2);
}

#[test]
fn test_focus_regained_reopens_dropdown() {
    let (code, json) = run_with_schema(
        RECLAMOS_SCHEMA,
        "type:reclam,focus:lost,wait:250ms,focus:gained",
    );

    assert_eq!(code, 0);
    assert_eq!(json["state"]["dropdown_open"], true);
}

#[test]
fn test_deleting_token_prunes_selection() {
    let (code, json) = run_with_schema(RECLAMOS_SCHEMA, "type:reclam,key:tab,key:ctrl+w");

    assert_eq!(code, 0);
    assert_eq!(strings(&json["state"]["selected_tokens"]), Vec::<String>::new());
}

#[test]
fn test_escape_closes_without_commit() {
    let (code, json) = run_with_schema(RECLAMOS_SCHEMA, "type:reclam,key:esc");

    assert_eq!(code, 0);
    assert_eq!(json["state"]["input_text"], "reclam");
    assert_eq!(json["state"]["dropdown_open"], false);
}
