//! Input widget for the TUI.
//!
//! Renders the query text with accepted tokens highlighted, or the
//! placeholder when the text is empty. The overlay is drawn from the same
//! [`ScrollSync`] offset as the text, so highlights never drift from the
//! characters they mark.

use crate::tui::highlight::{highlight, Segment};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PROMPT: &str = "> ";

/// Calculates the scroll offset needed to keep the end of `text` visible.
///
/// Returns the number of characters to skip from the start of the text so
/// the remaining display width fits in `available_width` columns. Wide
/// characters are skipped whole.
pub fn calculate_scroll_offset(text: &str, available_width: usize) -> usize {
    let mut overflow = text.width().saturating_sub(available_width);
    let mut skip = 0;
    for c in text.chars() {
        if overflow == 0 {
            break;
        }
        overflow = overflow.saturating_sub(c.width().unwrap_or(0));
        skip += 1;
    }
    skip
}

/// Display width of `text` after dropping its first `skip` characters.
fn visible_width(text: &str, skip: usize) -> usize {
    text.chars().skip(skip).map(|c| c.width().unwrap_or(0)).sum()
}

/// Width left for text in an input area `width` columns wide.
///
/// Border left (1) + prompt (2) + border right (1) + caret cell (1) = 5.
pub fn text_width(width: u16) -> usize {
    width.saturating_sub(5) as usize
}

/// Horizontal scroll shared by the input text and its highlight overlay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSync {
    offset: usize,
}

impl ScrollSync {
    /// Characters hidden off the left edge.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scrolls so the end of `text` (where the caret sits) stays visible.
    pub fn follow_caret(&mut self, text: &str, available_width: usize) {
        self.offset = calculate_scroll_offset(text, available_width);
    }
}

/// Screen position of the caret for an input drawn in `area`.
pub fn caret_position(area: Rect, text: &str, scroll: &ScrollSync) -> (u16, u16) {
    let visible = visible_width(text, scroll.offset());
    let x = area.x + 1 + PROMPT.len() as u16 + visible as u16;
    (x.min(area.right().saturating_sub(2)), area.y + 1)
}

/// Query input bar.
pub struct InputBar<'a> {
    text: &'a str,
    selected_tokens: &'a [String],
    placeholder: &'a str,
    focused: bool,
    disabled: bool,
}

impl<'a> InputBar<'a> {
    pub fn new(text: &'a str, selected_tokens: &'a [String]) -> Self {
        Self {
            text,
            selected_tokens,
            placeholder: "",
            focused: true,
            disabled: false,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Builds spans for `segments`, dropping the first `skip` characters.
fn visible_spans<'a>(segments: &[Segment<'a>], mut skip: usize, base: Style) -> Vec<Span<'a>> {
    let marked = base
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let mut spans = Vec::with_capacity(segments.len());
    for segment in segments {
        let len = segment.text.chars().count();
        if skip >= len {
            skip -= len;
            continue;
        }
        let start = segment
            .text
            .char_indices()
            .nth(skip)
            .map_or(segment.text.len(), |(i, _)| i);
        skip = 0;

        let style = if segment.highlighted { marked } else { base };
        spans.push(Span::styled(&segment.text[start..], style));
    }
    spans
}

impl StatefulWidget for InputBar<'_> {
    type State = ScrollSync;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let title = if self.disabled {
            " Query (read-only) "
        } else {
            " Query "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let prompt_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        let text_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        state.follow_caret(self.text, text_width(area.width));

        let mut spans = vec![Span::styled(PROMPT, prompt_style)];
        if self.text.is_empty() {
            spans.push(Span::styled(
                self.placeholder,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        } else {
            let segments = highlight(self.text, self.selected_tokens);
            spans.extend(visible_spans(&segments, state.offset(), text_style));
        }

        Paragraph::new(Line::from(spans))
            .block(block)
            .render(area, buf);
    }
}
