//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus, LastLayout};
use super::widgets::{chips, completion, header, history, input};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Renders the entire UI.
///
/// Records the drawn areas in `app.layout` for mouse hit testing and updates
/// the input scroll.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Header, input, chips, history
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let header_area = main_layout[0];
    let input_area = main_layout[1];
    let chips_area = main_layout[2];
    let history_area = main_layout[3];

    render_header(frame, header_area, app);
    render_input(frame, input_area, app);
    frame.render_widget(chips::Chips::new(&app.chips), chips_area);
    render_history(frame, history_area, app);

    // The dropdown goes last so it overlaps the panels below the input
    let popup_area = render_completion(frame, input_area, area, app);

    app.layout = LastLayout {
        input: input_area,
        popup: popup_area,
        history: history_area,
    };
}

/// Renders the header bar.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let summary = app.schema.summary();
    let widget = header::Header::new(&summary, app.is_read_only());
    frame.render_widget(widget, area);
}

/// Renders the input bar and places the caret.
fn render_input(frame: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == Focus::Input;
    let widget = input::InputBar::new(&app.value, app.query_box.selected_tokens())
        .placeholder(app.query_box.placeholder())
        .focused(focused)
        .disabled(app.query_box.is_disabled());
    frame.render_stateful_widget(widget, area, &mut app.scroll);

    if focused && !app.query_box.is_disabled() {
        frame.set_cursor_position(input::caret_position(area, &app.value, &app.scroll));
    }
}

/// Renders the submitted-query log.
fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::History;
    let widget = history::HistoryPanel::new(&app.history, focused, app.history_scroll);
    frame.render_widget(widget, area);
}

/// Renders the dropdown if open and returns its area (empty when closed).
fn render_completion(frame: &mut Frame, input_area: Rect, bounds: Rect, app: &App) -> Rect {
    let dropdown = app.query_box.dropdown();
    if !dropdown.is_open() {
        return Rect::default();
    }

    let area =
        completion::CompletionPopup::popup_area(input_area, bounds, dropdown.candidates().len());
    frame.render_widget(completion::CompletionPopup::new(dropdown), area);
    area
}
