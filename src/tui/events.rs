//! Event handling for the TUI.
//!
//! Processes keyboard, mouse, focus and paste events using crossterm.

use crate::error::{QueryBoxError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;

/// Default poll interval. Also bounds how late a blur deadline can fire.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(50);

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Bracketed paste.
    Paste(String),
    /// The terminal window gained focus.
    FocusGained,
    /// The terminal window lost focus.
    FocusLost,
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (drives the blur timer).
    Tick,
}

impl Event {
    /// Converts a crossterm event. Key releases and repeats are dropped.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Key(_) => None,
            CrosstermEvent::Mouse(mouse) => Some(Self::Mouse(mouse)),
            CrosstermEvent::Paste(text) => Some(Self::Paste(text)),
            CrosstermEvent::FocusGained => Some(Self::FocusGained),
            CrosstermEvent::FocusLost => Some(Self::FocusLost),
            CrosstermEvent::Resize(width, height) => Some(Self::Resize(width, height)),
        }
    }
}

/// Handles terminal events.
pub struct EventHandler {
    /// Timeout for polling events.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new event handler with default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
        }
    }

    /// Creates a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Polls for the next event.
    ///
    /// Returns [`Event::Tick`] if nothing arrived within the tick rate.
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.tick_rate)
            .map_err(|e| QueryBoxError::terminal(format!("Failed to poll events: {e}")))?
        {
            return Ok(Event::Tick);
        }

        let event = event::read()
            .map_err(|e| QueryBoxError::terminal(format!("Failed to read event: {e}")))?;

        Ok(Event::from_crossterm(event).unwrap_or(Event::Tick))
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
