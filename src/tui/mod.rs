//! Terminal User Interface for querybox.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
pub mod autocomplete;
mod clipboard;
pub mod events;
pub mod headless;
pub mod highlight;
pub mod query_box;
pub mod selection;
pub mod text;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::error::{QueryBoxError, Result};
use crossterm::{
    event::{
        DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
        EnableFocusChange, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{info, warn};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        // Bracketed paste still works without a clipboard
        if let Err(e) = clipboard::init() {
            warn!("Failed to initialize clipboard: {}", e);
        }

        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| QueryBoxError::terminal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            EnableBracketedPaste
        )
        .map_err(|e| QueryBoxError::terminal(format!("Failed to enter alternate screen: {e}")))?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| QueryBoxError::terminal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| QueryBoxError::terminal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .map_err(|e| QueryBoxError::terminal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| QueryBoxError::terminal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main TUI event loop until the app stops.
    pub fn run(&mut self, app: &mut App) -> Result<()> {
        // Restore the terminal before the panic message is printed
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(
                io::stdout(),
                DisableBracketedPaste,
                DisableFocusChange,
                DisableMouseCapture,
                LeaveAlternateScreen
            );
            original_hook(panic_info);
        }));

        let result = self.event_loop(app);

        let _ = panic::take_hook();

        result
    }

    fn event_loop(&mut self, app: &mut App) -> Result<()> {
        while app.running {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| QueryBoxError::terminal(format!("Failed to draw: {e}")))?;

            let event = self.event_handler.next()?;
            app.handle_event(event);
        }
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive TUI with `app` as the query box owner.
pub fn run(mut app: App) -> Result<()> {
    info!("Starting TUI ({})", app.schema.summary());
    let mut tui = Tui::new()?;
    tui.run(&mut app)?;
    info!("TUI exited after {} submitted queries", app.history.len());
    Ok(())
}
