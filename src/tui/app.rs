//! Application state for the TUI.
//!
//! `App` is the query box's owner: it holds the text value and the schema,
//! applies the box's proposed changes, and keeps the history of submitted
//! queries and the selected-token chips.

use super::clipboard;
use super::events::Event;
use super::highlight::{highlight, to_markup};
use super::query_box::{QueryBox, QueryBoxEvent, QueryBoxOptions};
use super::widgets::completion::CompletionPopup;
use super::widgets::input::ScrollSync;
use crate::schema::Schema;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    History,
}

impl Focus {
    /// Cycles to the next focus panel.
    pub fn next(self) -> Self {
        match self {
            Self::Input => Self::History,
            Self::History => Self::Input,
        }
    }
}

/// Screen areas from the last render, used for mouse hit testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastLayout {
    pub input: Rect,
    pub popup: Rect,
    pub history: Rect,
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus panel.
    pub focus: Focus,
    /// The query text. Only changed by applying query box events or by submit.
    pub value: String,
    /// Schema the completions are drawn from.
    pub schema: Schema,
    /// Autocomplete state.
    pub query_box: QueryBox,
    /// Tokens from the last `SelectedTokensChanged`.
    pub chips: Vec<String>,
    /// Submitted queries, oldest first.
    pub history: Vec<String>,
    /// History scroll offset (lines from bottom).
    pub history_scroll: usize,
    /// Input scroll shared with the highlight overlay.
    pub scroll: ScrollSync,
    pub layout: LastLayout,
}

impl App {
    /// Creates a new App instance.
    pub fn new(schema: Schema, options: QueryBoxOptions) -> Self {
        Self {
            running: true,
            focus: Focus::default(),
            value: String::new(),
            schema,
            query_box: QueryBox::new(options),
            chips: Vec::new(),
            history: Vec::new(),
            history_scroll: 0,
            scroll: ScrollSync::default(),
            layout: LastLayout::default(),
        }
    }

    /// Returns true if the query box ignores input.
    pub fn is_read_only(&self) -> bool {
        self.query_box.is_disabled()
    }

    /// The value with selected tokens wrapped in brackets.
    pub fn marked_text(&self) -> String {
        to_markup(
            &highlight(&self.value, self.query_box.selected_tokens()),
            "[",
            "]",
        )
    }

    /// Replaces the schema. The next analysis uses the new one.
    pub fn set_schema(&mut self, schema: Schema) {
        info!("Schema replaced: {}", schema.summary());
        self.schema = schema;
        self.query_box.invalidate();
        self.apply(Vec::new());
    }

    /// Handles an event and updates application state.
    pub fn handle_event(&mut self, event: Event) {
        self.handle_event_at(event, Instant::now());
    }

    /// Handles an event as if it arrived at `now`.
    pub fn handle_event_at(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::Paste(text) => {
                if self.focus == Focus::Input {
                    let events = self.query_box.paste(&text, &self.value);
                    self.apply(events);
                }
            }
            Event::FocusGained => {
                if self.focus == Focus::Input {
                    self.query_box.focus(&self.value, &self.schema);
                }
            }
            Event::FocusLost => self.query_box.blur(now),
            Event::Resize(_, _) => {
                // The input re-scrolls on the next render
            }
            Event::Tick => {
                if self.query_box.tick(now) {
                    debug!("dropdown closed after blur");
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                return;
            }
            KeyCode::BackTab => {
                self.switch_focus(now);
                return;
            }
            KeyCode::Tab if self.focus == Focus::History || !self.query_box.is_open() => {
                self.switch_focus(now);
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => {
                let events = if ctrl && key.code == KeyCode::Char('v') {
                    match clipboard::paste() {
                        Ok(text) => self.query_box.paste(&text, &self.value),
                        Err(e) => {
                            warn!("Clipboard paste failed: {}", e);
                            Vec::new()
                        }
                    }
                } else {
                    self.query_box.handle_key(key, &self.value)
                };
                self.apply(events);
            }
            Focus::History => match key.code {
                KeyCode::Up => self.history_scroll = self.history_scroll.saturating_add(1),
                KeyCode::Down => self.history_scroll = self.history_scroll.saturating_sub(1),
                KeyCode::PageUp => self.history_scroll = self.history_scroll.saturating_add(10),
                KeyCode::PageDown => self.history_scroll = self.history_scroll.saturating_sub(10),
                // Clamped during render
                KeyCode::Home => self.history_scroll = usize::MAX,
                KeyCode::End => self.history_scroll = 0,
                _ => {}
            },
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.query_box.is_open() {
                    if let Some(index) =
                        CompletionPopup::row_at(self.layout.popup, self.query_box.dropdown(), column, row)
                    {
                        debug!(index, "candidate clicked");
                        self.focus = Focus::Input;
                        let events = self.query_box.commit(index, &self.value);
                        self.apply(events);
                        return;
                    }
                }

                if contains(self.layout.input, column, row) && self.focus != Focus::Input {
                    self.switch_focus(now);
                } else if contains(self.layout.history, column, row) && self.focus == Focus::Input {
                    self.switch_focus(now);
                }
            }
            MouseEventKind::ScrollUp if contains(self.layout.history, column, row) => {
                self.history_scroll = self.history_scroll.saturating_add(1);
            }
            MouseEventKind::ScrollDown if contains(self.layout.history, column, row) => {
                self.history_scroll = self.history_scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn switch_focus(&mut self, now: Instant) {
        self.focus = self.focus.next();
        match self.focus {
            Focus::Input => self.query_box.focus(&self.value, &self.schema),
            Focus::History => self.query_box.blur(now),
        }
    }

    /// Applies query box events, then lets the box reconcile with the result.
    fn apply(&mut self, events: Vec<QueryBoxEvent>) {
        for event in events {
            match event {
                QueryBoxEvent::Change(value) => self.value = value,
                QueryBoxEvent::Submit => self.submit(),
                QueryBoxEvent::SelectedTokensChanged(tokens) => self.chips = tokens,
            }
        }

        for event in self.query_box.sync(&self.value, &self.schema) {
            if let QueryBoxEvent::SelectedTokensChanged(tokens) = event {
                debug!(?tokens, "selected tokens changed");
                self.chips = tokens;
            }
        }
    }

    /// Records the current value in the history and clears it.
    fn submit(&mut self) {
        let query = self.value.trim();
        if query.is_empty() {
            return;
        }
        info!("Query submitted: {}", query);
        self.history.push(query.to_string());
        self.history_scroll = 0;
        self.value.clear();
    }
}
