//! Event DSL parser for headless mode.
//!
//! Parses event strings like "key:enter", "type:reclam", "wait:200ms" into
//! executable events.

use super::HeadlessState;
use crate::error::{QueryBoxError, Result};
use crate::tui::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// An assertion to check against the screen or state.
#[derive(Debug, Clone)]
pub enum Assertion {
    /// Screen contains text (case-insensitive).
    Contains(String),
    /// Screen contains text (case-sensitive).
    ContainsExact(String),
    /// Screen does not contain text.
    NotContains(String),
    /// Screen matches regex pattern.
    Matches(String),
    /// State field equals value.
    StateEquals { field: String, value: String },
    /// State field comparison (>=, <=, >, <).
    StateCompare {
        field: String,
        op: String,
        value: String,
    },
}

impl Assertion {
    /// Checks the assertion against the screen and app state.
    pub fn check(&self, screen: &str, app: &App) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(screen))
                .unwrap_or(false),
            Self::StateEquals { field, value } => {
                let actual = get_state_field(app, field);
                actual.as_deref() == Some(value.as_str())
            }
            Self::StateCompare { field, op, value } => {
                let actual = get_state_field(app, field);
                compare_values(actual.as_deref(), op, value)
            }
        }
    }
}

/// Gets a state field as a string: strings verbatim, everything else as JSON.
fn get_state_field(app: &App, field: &str) -> Option<String> {
    let state = serde_json::to_value(HeadlessState::from_app(app)).ok()?;
    match state.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Compares values using the given operator.
fn compare_values(actual: Option<&str>, op: &str, expected: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    if let (Ok(a), Ok(e)) = (actual.parse::<i64>(), expected.parse::<i64>()) {
        return match op {
            ">=" => a >= e,
            "<=" => a <= e,
            ">" => a > e,
            "<" => a < e,
            "=" | "==" => a == e,
            _ => false,
        };
    }

    match op {
        "=" | "==" => actual == expected,
        _ => false,
    }
}

/// Schema to swap in with a `schema:` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// The built-in demo schema.
    Demo,
    /// A schema with no tables.
    Empty,
    /// A JSON schema file.
    File(PathBuf),
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demo => write!(f, "demo"),
            Self::Empty => write!(f, "empty"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A parsed event that can be executed.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// Type text (expands to one key event per char).
    Type(String),
    /// Bracketed paste.
    Paste(String),
    /// Wait for a duration, then deliver a tick.
    Wait(Duration),
    /// Resize the terminal.
    Resize(u16, u16),
    /// Terminal focus gained (`true`) or lost (`false`).
    Focus(bool),
    /// Left click at column, row.
    Click(u16, u16),
    /// Replace the schema.
    Schema(SchemaSource),
    /// Take a named snapshot.
    Snapshot(String),
    /// Assert something about the screen or state.
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                let mut parts = Vec::new();
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    parts.push("ctrl");
                }
                if key.modifiers.contains(KeyModifiers::ALT) {
                    parts.push("alt");
                }
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    parts.push("shift");
                }
                let key_name = key_code_to_string(&key.code);
                parts.push(&key_name);
                write!(f, "key:{}", parts.join("+"))
            }
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Paste(text) => write!(f, "paste:{text}"),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Focus(true) => write!(f, "focus:gained"),
            Self::Focus(false) => write!(f, "focus:lost"),
            Self::Click(col, row) => write!(f, "click:{col}x{row}"),
            Self::Schema(source) => write!(f, "schema:{source}"),
            Self::Snapshot(name) => write!(f, "snapshot:{name}"),
            Self::Assert(a) => match a {
                Assertion::Contains(t) => write!(f, "assert:contains:{t}"),
                Assertion::ContainsExact(t) => write!(f, "assert:contains-exact:{t}"),
                Assertion::NotContains(t) => write!(f, "assert:not-contains:{t}"),
                Assertion::Matches(p) => write!(f, "assert:matches:{p}"),
                Assertion::StateEquals { field, value } => {
                    write!(f, "assert:state:{field}={value}")
                }
                Assertion::StateCompare { field, op, value } => {
                    write!(f, "assert:state:{field}{op}{value}")
                }
            },
        }
    }
}

fn key_code_to_string(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => "unknown".to_string(),
    }
}

/// Parses `<a>x<b>` pairs used by `resize:` and `click:`.
fn parse_pair(value: &str, what: &str) -> Result<(u16, u16)> {
    let Some((a, b)) = value.split_once('x') else {
        return Err(QueryBoxError::config(format!(
            "Invalid {what} format: '{value}'. Expected <a>x<b>"
        )));
    };
    let a: u16 = a
        .trim()
        .parse()
        .map_err(|_| QueryBoxError::config(format!("Invalid {what} value: '{a}'")))?;
    let b: u16 = b
        .trim()
        .parse()
        .map_err(|_| QueryBoxError::config(format!("Invalid {what} value: '{b}'")))?;
    Ok((a, b))
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    /// Creates a new event parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses all events from an input string.
    /// Supports comma-separated and newline-separated events.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        for line in input.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for part in line.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }

                events.push(self.parse_one(part)?);
            }
        }

        Ok(events)
    }

    /// Parses a single event string.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();

        let Some((event_type, value)) = input.split_once(':') else {
            return Err(QueryBoxError::config(format!(
                "Invalid event syntax: '{input}'. Expected format: type:value"
            )));
        };
        let event_type = event_type.trim().to_lowercase();
        let value = value.trim();

        match event_type.as_str() {
            "key" => self.parse_key(value),
            "type" => Ok(Event::Type(value.to_string())),
            "paste" => Ok(Event::Paste(value.to_string())),
            "wait" => self.parse_wait(value),
            "resize" => {
                let (w, h) = parse_pair(value, "resize")?;
                Ok(Event::Resize(w, h))
            }
            "focus" => match value.to_lowercase().as_str() {
                "gained" | "in" => Ok(Event::Focus(true)),
                "lost" | "out" => Ok(Event::Focus(false)),
                _ => Err(QueryBoxError::config(format!(
                    "Invalid focus event: '{value}'. Expected gained or lost"
                ))),
            },
            "click" => {
                let (col, row) = parse_pair(value, "click")?;
                Ok(Event::Click(col, row))
            }
            "schema" => Ok(Event::Schema(match value {
                "demo" => SchemaSource::Demo,
                "empty" => SchemaSource::Empty,
                "" => {
                    return Err(QueryBoxError::config(
                        "schema event needs a path, 'demo' or 'empty'",
                    ))
                }
                path => SchemaSource::File(PathBuf::from(path)),
            })),
            "snapshot" => Ok(Event::Snapshot(value.to_string())),
            "assert" => self.parse_assert(value),
            _ => Err(QueryBoxError::config(format!(
                "Unknown event type: '{event_type}'. Valid types: key, type, paste, wait, resize, focus, click, schema, snapshot, assert"
            ))),
        }
    }

    /// Parses a key event like "enter", "ctrl+w", "shift+tab".
    fn parse_key(&self, value: &str) -> Result<Event> {
        let parts: Vec<&str> = value.split('+').collect();
        let mut modifiers = KeyModifiers::empty();
        let mut key_str = "";

        for (i, part) in parts.iter().enumerate() {
            if i == parts.len() - 1 {
                key_str = part;
                continue;
            }
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => {
                    return Err(QueryBoxError::config(format!(
                        "Unknown modifier: '{part}'. Valid modifiers: ctrl, alt, shift"
                    )));
                }
            }
        }

        let mut code = self.parse_key_code(key_str)?;
        // Terminals report Shift+Tab as BackTab
        if code == KeyCode::Tab && modifiers.contains(KeyModifiers::SHIFT) {
            code = KeyCode::BackTab;
        }

        Ok(Event::Key(KeyEvent::new(code, modifiers)))
    }

    /// Parses a key code string into a KeyCode.
    fn parse_key_code(&self, s: &str) -> Result<KeyCode> {
        let s_lower = s.to_lowercase();

        if let Some(n) = s_lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(KeyCode::F(n));
            }
        }

        let code = match s_lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        return Err(QueryBoxError::config(format!(
                            "Unknown key: '{s}'. Use single characters or named keys like enter, esc, tab, etc."
                        )));
                    }
                }
            }
        };

        Ok(code)
    }

    /// Parses a wait duration like "100ms", "2s", or just "100" (defaults to ms).
    fn parse_wait(&self, value: &str) -> Result<Event> {
        let value = value.trim().to_lowercase();
        let invalid = || QueryBoxError::config(format!("Invalid duration: '{value}'"));

        let duration = if let Some(ms) = value.strip_suffix("ms") {
            Duration::from_millis(ms.parse().map_err(|_| invalid())?)
        } else if let Some(secs) = value.strip_suffix('s') {
            Duration::from_secs(secs.parse().map_err(|_| invalid())?)
        } else {
            Duration::from_millis(value.parse().map_err(|_| invalid())?)
        };

        Ok(Event::Wait(duration))
    }

    /// Parses an assertion like "contains:reclamos" or "state:focus=Input".
    fn parse_assert(&self, value: &str) -> Result<Event> {
        let Some((assert_type, rest)) = value.split_once(':') else {
            return Err(QueryBoxError::config(format!(
                "Invalid assertion syntax: '{value}'. Expected assert:type:value"
            )));
        };
        let assert_type = assert_type.trim().to_lowercase();
        let rest = rest.trim();

        let assertion = match assert_type.as_str() {
            "contains" => Assertion::Contains(rest.to_string()),
            "contains-exact" => Assertion::ContainsExact(rest.to_string()),
            "not-contains" => Assertion::NotContains(rest.to_string()),
            "matches" => Assertion::Matches(rest.to_string()),
            "state" => self.parse_state_assertion(rest)?,
            _ => {
                return Err(QueryBoxError::config(format!(
                    "Unknown assertion type: '{assert_type}'. Valid types: contains, contains-exact, not-contains, matches, state"
                )));
            }
        };

        Ok(Event::Assert(assertion))
    }

    /// Parses a state assertion like "focus=Input" or "candidate_count>=2".
    fn parse_state_assertion(&self, value: &str) -> Result<Assertion> {
        for op in [">=", "<=", ">", "<", "="] {
            if let Some(pos) = value.find(op) {
                let field = value[..pos].trim().to_string();
                let val = value[pos + op.len()..].trim().to_string();

                return Ok(if op == "=" {
                    Assertion::StateEquals { field, value: val }
                } else {
                    Assertion::StateCompare {
                        field,
                        op: op.to_string(),
                        value: val,
                    }
                });
            }
        }

        Err(QueryBoxError::config(format!(
            "Invalid state assertion: '{value}'. Expected field=value or field>=value"
        )))
    }
}
