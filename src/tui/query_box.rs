//! The query box: dropdown state machine and controlled-input plumbing.
//!
//! The box never owns the query text. Every entry point takes the current
//! value and returns [`QueryBoxEvent`]s for the owner; the owner applies (or
//! rejects) any proposed value and then calls [`QueryBox::sync`] with
//! whatever the value ended up being.

use crate::schema::Schema;
use crate::tui::autocomplete::{analyze, generate_with_limits, Candidate, Limits};
use crate::tui::selection::{apply, SelectedTokens};
use crate::tui::text::{without_last_char, without_last_word};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::debug;

/// Grace period between losing focus and closing the dropdown, so a click on
/// a candidate can land first.
pub const DEFAULT_BLUR_DELAY: Duration = Duration::from_millis(150);

/// Messages from the query box to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryBoxEvent {
    /// Proposed new value.
    Change(String),
    /// Enter was pressed with the dropdown closed.
    Submit,
    /// The selected-token set changed; carries the new contents.
    SelectedTokensChanged(Vec<String>),
}

/// Dropdown state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dropdown {
    #[default]
    Closed,
    /// Never holds an empty candidate list; `highlighted` is always in range.
    Open {
        candidates: Vec<Candidate>,
        highlighted: usize,
    },
}

impl Dropdown {
    fn from_candidates(candidates: Vec<Candidate>) -> Self {
        if candidates.is_empty() {
            Self::Closed
        } else {
            Self::Open {
                candidates,
                highlighted: 0,
            }
        }
    }

    /// Returns true if the dropdown is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Candidates shown (empty when closed).
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Closed => &[],
            Self::Open { candidates, .. } => candidates,
        }
    }

    /// Highlighted index (0 when closed).
    pub fn highlighted(&self) -> usize {
        match self {
            Self::Closed => 0,
            Self::Open { highlighted, .. } => *highlighted,
        }
    }

    fn select_next(&mut self) {
        if let Self::Open {
            candidates,
            highlighted,
        } = self
        {
            *highlighted = (*highlighted + 1).min(candidates.len() - 1);
        }
    }

    fn select_previous(&mut self) {
        if let Self::Open { highlighted, .. } = self {
            *highlighted = highlighted.saturating_sub(1);
        }
    }
}

/// Passive settings supplied by the owner.
#[derive(Debug, Clone)]
pub struct QueryBoxOptions {
    /// Shown when the value is empty.
    pub placeholder: String,
    /// When true every input is ignored.
    pub disabled: bool,
    /// Candidate caps.
    pub limits: Limits,
    /// Delay between blur and the dropdown closing.
    pub blur_delay: Duration,
}

impl Default for QueryBoxOptions {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            disabled: false,
            limits: Limits::default(),
            blur_delay: DEFAULT_BLUR_DELAY,
        }
    }
}

/// Autocomplete state for one query input.
#[derive(Debug, Default)]
pub struct QueryBox {
    dropdown: Dropdown,
    selected: SelectedTokens,
    /// Last token list reported through `SelectedTokensChanged`.
    announced: Vec<String>,
    /// Value the candidates were last computed for.
    last_value: Option<String>,
    focused: bool,
    blur_deadline: Option<Instant>,
    options: QueryBoxOptions,
}

impl QueryBox {
    /// Creates a focused query box.
    pub fn new(options: QueryBoxOptions) -> Self {
        Self {
            focused: !options.disabled,
            options,
            ..Self::default()
        }
    }

    /// Current dropdown state.
    pub fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    /// Returns true if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.dropdown.is_open()
    }

    /// Tokens inserted through the dropdown that are still in the value.
    pub fn selected_tokens(&self) -> &[String] {
        self.selected.as_slice()
    }

    /// Returns true if the input has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Returns true if a blur-triggered close is pending.
    pub fn blur_pending(&self) -> bool {
        self.blur_deadline.is_some()
    }

    pub fn placeholder(&self) -> &str {
        &self.options.placeholder
    }

    pub fn is_disabled(&self) -> bool {
        self.options.disabled
    }

    /// Enables or disables input. Disabling closes the dropdown.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.options.disabled = disabled;
        if disabled {
            self.dropdown = Dropdown::Closed;
            self.blur_deadline = None;
        }
    }

    /// Handles a key press against the current `value`.
    pub fn handle_key(&mut self, key: KeyEvent, value: &str) -> Vec<QueryBoxEvent> {
        if self.options.disabled {
            return Vec::new();
        }

        if self.dropdown.is_open() {
            match key.code {
                KeyCode::Down => {
                    self.dropdown.select_next();
                    return Vec::new();
                }
                KeyCode::Up => {
                    self.dropdown.select_previous();
                    return Vec::new();
                }
                KeyCode::Enter | KeyCode::Tab => {
                    let index = self.dropdown.highlighted();
                    return self.commit(index, value);
                }
                KeyCode::Esc => {
                    debug!("dropdown dismissed");
                    self.dropdown = Dropdown::Closed;
                    return Vec::new();
                }
                _ => {}
            }
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        let proposed = match key.code {
            KeyCode::Enter => return vec![QueryBoxEvent::Submit],
            KeyCode::Char('w') if ctrl => without_last_word(value),
            KeyCode::Char('u') if ctrl => String::new(),
            KeyCode::Char(c) if !ctrl && !alt => format!("{value}{c}"),
            KeyCode::Backspace => without_last_char(value),
            _ => return Vec::new(),
        };

        if proposed == value {
            Vec::new()
        } else {
            vec![QueryBoxEvent::Change(proposed)]
        }
    }

    /// Appends pasted text to `value`. Line breaks become spaces.
    pub fn paste(&mut self, text: &str, value: &str) -> Vec<QueryBoxEvent> {
        if self.options.disabled || text.is_empty() {
            return Vec::new();
        }
        let flattened: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        vec![QueryBoxEvent::Change(format!("{value}{flattened}"))]
    }

    /// Commits the candidate at `index` against the current `value`.
    ///
    /// Used for Enter/Tab and for pointer clicks. A missing index is a no-op.
    pub fn commit(&mut self, index: usize, value: &str) -> Vec<QueryBoxEvent> {
        if self.options.disabled {
            return Vec::new();
        }
        let Some(candidate) = self.dropdown.candidates().get(index) else {
            return Vec::new();
        };

        let applied = apply(value, candidate);
        debug!(token = %applied.inserted, "committed candidate");

        self.selected.insert(applied.inserted);
        self.dropdown = Dropdown::Closed;
        self.focused = true;
        self.blur_deadline = None;

        vec![QueryBoxEvent::Change(applied.text)]
    }

    /// Reconciles with the owner's current value.
    ///
    /// Must be called after every batch of events has been applied. Prunes
    /// the selected-token set, recomputes candidates when the value changed,
    /// and reports a changed token set.
    pub fn sync(&mut self, value: &str, schema: &Schema) -> Vec<QueryBoxEvent> {
        self.selected.prune(value);

        if self.last_value.as_deref() != Some(value) {
            self.last_value = Some(value.to_string());
            self.dropdown = if self.focused && !self.options.disabled {
                Dropdown::from_candidates(self.candidates_for(value, schema))
            } else {
                Dropdown::Closed
            };
        }

        if self.selected.as_slice() == self.announced.as_slice() {
            Vec::new()
        } else {
            self.announced = self.selected.as_slice().to_vec();
            vec![QueryBoxEvent::SelectedTokensChanged(self.announced.clone())]
        }
    }

    /// Forgets the cached analysis so the next [`QueryBox::sync`] recomputes
    /// candidates against a replaced schema.
    pub fn invalidate(&mut self) {
        self.last_value = None;
    }

    /// The input gained focus: cancel any pending close and reopen with a
    /// fresh candidate list if the value still has completions.
    pub fn focus(&mut self, value: &str, schema: &Schema) {
        if self.options.disabled {
            return;
        }
        self.focused = true;
        self.blur_deadline = None;
        self.last_value = Some(value.to_string());
        self.dropdown = Dropdown::from_candidates(self.candidates_for(value, schema));
    }

    /// The input lost focus: close the dropdown once the grace delay expires.
    pub fn blur(&mut self, now: Instant) {
        if !self.focused {
            return;
        }
        self.focused = false;
        self.blur_deadline = Some(now + self.options.blur_delay);
    }

    /// Fires the pending blur close if its deadline has passed.
    ///
    /// Returns true if the dropdown was closed by this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.blur_deadline {
            Some(deadline) if now >= deadline => {
                self.blur_deadline = None;
                let was_open = self.dropdown.is_open();
                self.dropdown = Dropdown::Closed;
                was_open
            }
            _ => false,
        }
    }

    fn candidates_for(&self, value: &str, schema: &Schema) -> Vec<Candidate> {
        generate_with_limits(&analyze(value, schema), schema, self.options.limits)
    }
}
