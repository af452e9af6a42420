//! Selected-token chips for the TUI.
//!
//! Shows the tokens most recently reported through
//! `SelectedTokensChanged`, in insertion order.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Chip list widget.
pub struct Chips<'a> {
    tokens: &'a [String],
}

impl<'a> Chips<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens }
    }
}

impl Widget for Chips<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Selected ({}) ", self.tokens.len()));

        let line = if self.tokens.is_empty() {
            Line::from(Span::styled(
                "No tokens selected",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let chip_style = Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
            let mut spans = Vec::with_capacity(self.tokens.len() * 2);
            for token in self.tokens {
                spans.push(Span::styled(format!(" {token} "), chip_style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        };

        Paragraph::new(line)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
