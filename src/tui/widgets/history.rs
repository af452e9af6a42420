//! Submitted-query log panel for the TUI.
//!
//! Lists every submitted query, newest at the bottom.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// History panel widget.
pub struct HistoryPanel<'a> {
    entries: &'a [String],
    focused: bool,
    /// Lines scrolled up from the bottom.
    scroll: usize,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(entries: &'a [String], focused: bool, scroll: usize) -> Self {
        Self {
            entries,
            focused,
            scroll,
        }
    }
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" History ");

        let lines: Vec<Line> = if self.entries.is_empty() {
            vec![
                Line::from(Span::styled(
                    "No queries submitted yet.",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Type a table name, pick a completion with Tab, submit with Enter.",
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    "Shift+Tab switches focus, Ctrl+C exits.",
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        } else {
            self.entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    Line::from(vec![
                        Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(Color::Green)),
                        Span::raw(entry.as_str()),
                    ])
                })
                .collect()
        };

        let visible = block.inner(area).height as usize;
        let max_scroll = lines.len().saturating_sub(visible);
        let top = max_scroll.saturating_sub(self.scroll.min(max_scroll));

        Paragraph::new(lines)
            .block(block)
            .scroll((top as u16, 0))
            .render(area, buf);
    }
}
