//! Header widget for the TUI.
//!
//! Displays the application name, version, and a summary of the loaded schema.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    schema_summary: &'a str,
    read_only: bool,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(schema_summary: &'a str, read_only: bool) -> Self {
        Self {
            schema_summary,
            read_only,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" querybox v{}", env!("CARGO_PKG_VERSION"));
        let left_span = Span::styled(left_text, style);
        buf.set_span(area.x, area.y, &left_span, area.width);

        let mode = if self.read_only { " read-only |" } else { "" };
        let right_text = format!("{mode} [schema: {}] ", self.schema_summary);
        let right_width = right_text.chars().count() as u16;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            let right_style = Style::default().bg(Color::Blue).fg(Color::Gray);
            buf.set_string(right_x, area.y, &right_text, right_style);
        }
    }
}
