//! Headless mode for scripted testing and automation.
//!
//! Runs the TUI against an in-memory terminal, executing scripted events and
//! capturing output for verification.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser, SchemaSource};
pub use output::{buffer_to_text, report, OutputFormat};

use crate::cli::Cli;
use crate::error::{QueryBoxError, Result};
use crate::schema::Schema;
use crate::tui::app::App;
use crate::tui::events::Event as AppEvent;
use crate::tui::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    /// Output format.
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<std::path::PathBuf>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

impl HeadlessConfig {
    /// Creates a HeadlessConfig from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (width, height) = cli.parse_screen_size().map_err(QueryBoxError::config)?;
        let output_format = cli.parse_output_format().map_err(QueryBoxError::config)?;

        Ok(Self {
            width,
            height,
            output_format: match output_format {
                crate::cli::OutputFormat::Text => OutputFormat::Text,
                crate::cli::OutputFormat::Json => OutputFormat::Json,
                crate::cli::OutputFormat::Frames => OutputFormat::Frames,
            },
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        })
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    /// Screen lines for JSON output.
    pub screen_lines: Vec<String>,
    /// Number of events executed.
    pub events_executed: usize,
    /// Total execution duration.
    pub duration: Duration,
    /// Number of assertions passed.
    pub assertions_passed: usize,
    /// Number of assertions failed.
    pub assertions_failed: usize,
    /// Application state snapshot.
    pub state: HeadlessState,
    /// Frame captures (for frames output mode).
    pub frames: Vec<Frame>,
    /// Named snapshots, in script order.
    pub snapshots: Vec<Snapshot>,
}

/// Snapshot of application state, used for JSON output and state assertions.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HeadlessState {
    /// Current query text.
    pub input_text: String,
    /// Query text with selected tokens wrapped in brackets.
    pub marked_text: String,
    /// Current focus panel.
    pub focus: String,
    /// Whether the dropdown is open.
    pub dropdown_open: bool,
    /// Highlighted candidate index (0 when closed).
    pub highlighted: usize,
    /// Number of candidates shown.
    pub candidate_count: usize,
    /// Candidate values in display order.
    pub candidates: Vec<String>,
    /// Selected tokens as last announced to the owner.
    pub selected_tokens: Vec<String>,
    /// Number of submitted queries.
    pub submitted_count: usize,
    /// Whether the app is still running.
    pub running: bool,
}

impl HeadlessState {
    pub(crate) fn from_app(app: &App) -> Self {
        let dropdown = app.query_box.dropdown();
        Self {
            input_text: app.value.clone(),
            marked_text: app.marked_text(),
            focus: format!("{:?}", app.focus),
            dropdown_open: dropdown.is_open(),
            highlighted: dropdown.highlighted(),
            candidate_count: dropdown.candidates().len(),
            candidates: dropdown
                .candidates()
                .iter()
                .map(|c| c.value().to_string())
                .collect(),
            selected_tokens: app.chips.clone(),
            submitted_count: app.history.len(),
            running: app.running,
        }
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    /// Screen content.
    pub screen: String,
    /// Query text with selected tokens bracketed.
    pub marked_text: String,
}

/// Screen and state recorded by a `snapshot:<name>` event.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub name: String,
    pub screen: String,
    pub state: HeadlessState,
}

/// Runs the TUI in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    events: Vec<Event>,
    frames: Vec<Frame>,
    snapshots: Vec<Snapshot>,
    start_time: Instant,
    assertions_passed: usize,
    assertions_failed: usize,
}

impl HeadlessRunner {
    /// Creates a new headless runner driving `app`.
    pub fn new(config: HeadlessConfig, app: App) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend)
            .map_err(|e| QueryBoxError::internal(format!("Failed to create test terminal: {e}")))?;

        Ok(Self {
            config,
            terminal,
            app,
            events: Vec::new(),
            frames: Vec::new(),
            snapshots: Vec::new(),
            start_time: Instant::now(),
            assertions_passed: 0,
            assertions_failed: 0,
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        let parser = EventParser::new();
        self.events = parser.parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin when `path` is "-".
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| QueryBoxError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| QueryBoxError::config(format!("Failed to read script file: {e}")))?
        };

        self.load_events(&content)
    }

    /// Runs the headless execution and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        self.start_time = Instant::now();

        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            let event_str = event.to_string();
            debug!(event = %event_str, "headless event");

            match &event {
                Event::Key(key) => self.app.handle_event(AppEvent::Key(*key)),
                Event::Type(text) => {
                    for c in text.chars() {
                        self.app
                            .handle_event(AppEvent::Key(KeyEvent::from(KeyCode::Char(c))));
                    }
                }
                Event::Paste(text) => self.app.handle_event(AppEvent::Paste(text.clone())),
                Event::Wait(duration) => {
                    tokio::time::sleep(*duration).await;
                    self.app.handle_event(AppEvent::Tick);
                }
                Event::Resize(w, h) => self.resize(*w, *h)?,
                Event::Focus(true) => self.app.handle_event(AppEvent::FocusGained),
                Event::Focus(false) => self.app.handle_event(AppEvent::FocusLost),
                Event::Click(column, row) => self.app.handle_event(AppEvent::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column: *column,
                    row: *row,
                    modifiers: KeyModifiers::NONE,
                })),
                Event::Schema(source) => {
                    let schema = match source {
                        SchemaSource::Demo => Schema::demo(),
                        SchemaSource::Empty => Schema::new(),
                        SchemaSource::File(path) => Schema::load_from_file(path)?,
                    };
                    self.app.set_schema(schema);
                }
                Event::Snapshot(name) => {
                    self.draw()?;
                    self.snapshots.push(Snapshot {
                        name: name.clone(),
                        screen: self.render_screen(),
                        state: HeadlessState::from_app(&self.app),
                    });
                }
                Event::Assert(assertion) => {
                    let screen = self.render_screen();
                    if assertion.check(&screen, &self.app) {
                        self.assertions_passed += 1;
                    } else {
                        info!("Assertion failed: {}", event_str);
                        self.assertions_failed += 1;
                        if self.config.fail_fast {
                            break;
                        }
                    }
                }
            }

            events_executed += 1;

            // Render after each event so clicks see the current layout
            self.draw()?;

            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            }

            if !self.app.running {
                break;
            }
        }

        self.draw()?;

        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: self.start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            state: HeadlessState::from_app(&self.app),
            frames: self.frames,
            snapshots: self.snapshots,
        })
    }

    /// Resizes the backend as well as the viewport; otherwise the next draw
    /// snaps the terminal back to the backend's size.
    fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.terminal.backend_mut().resize(width, height);
        self.terminal
            .resize(Rect::new(0, 0, width, height))
            .map_err(|e| QueryBoxError::internal(format!("Resize failed: {e}")))?;
        self.app.handle_event(AppEvent::Resize(width, height));
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let app = &mut self.app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| QueryBoxError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    /// Renders the current screen to a string.
    fn render_screen(&self) -> String {
        buffer_to_text(self.terminal.backend().buffer())
    }

    /// Captures the current frame.
    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;

        let screen = self.render_screen();
        let number = self.frames.len();

        self.frames.push(Frame {
            number,
            event,
            screen,
            marked_text: self.app.marked_text(),
        });

        Ok(())
    }
}

/// Runs headless mode from CLI arguments and returns the process exit code.
pub async fn run_headless(cli: &Cli, app: App) -> Result<i32> {
    cli.validate_headless().map_err(QueryBoxError::config)?;

    let config = HeadlessConfig::from_cli(cli)?;
    let mut runner = HeadlessRunner::new(config.clone(), app)?;

    if let Some(ref events_str) = cli.events {
        runner.load_events(events_str)?;
    } else if let Some(ref script_path) = cli.script {
        runner.load_script(script_path)?;
    }

    let result = runner.run().await?;

    let output_str = report(config.output_format, &result);

    if let Some(ref path) = config.output_file {
        std::fs::write(path, &output_str)
            .map_err(|e| QueryBoxError::internal(format!("Failed to write output file: {e}")))?;
    } else {
        print!("{}", output_str);
    }

    if result.assertions_failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}
