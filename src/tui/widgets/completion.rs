//! Completion dropdown widget for the TUI.
//!
//! Draws the open dropdown below the input and maps pointer positions back
//! to candidate indices.

use crate::tui::autocomplete::Candidate;
use crate::tui::query_box::Dropdown;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Tallest the popup may get, borders included.
const MAX_POPUP_HEIGHT: u16 = 12;

fn kind_color(candidate: &Candidate) -> Color {
    match candidate {
        Candidate::Table { .. } => Color::Yellow,
        Candidate::Column { .. } => Color::Cyan,
    }
}

/// Index of the first row shown when `highlighted` must stay visible.
fn first_visible(len: usize, highlighted: usize, rows: usize) -> usize {
    highlighted
        .saturating_sub(rows / 2)
        .min(len.saturating_sub(rows))
}

/// Completion popup widget.
pub struct CompletionPopup<'a> {
    dropdown: &'a Dropdown,
}

impl<'a> CompletionPopup<'a> {
    pub fn new(dropdown: &'a Dropdown) -> Self {
        Self { dropdown }
    }

    /// Calculates the popup area: directly under the input, clipped to `bounds`.
    pub fn popup_area(input_area: Rect, bounds: Rect, items: usize) -> Rect {
        let width = input_area.width.saturating_sub(2).min(60);
        let wanted = (items as u16).saturating_add(2).min(MAX_POPUP_HEIGHT);

        let x = input_area.x + 1;
        let y = input_area.bottom().min(bounds.bottom());
        let height = wanted.min(bounds.bottom().saturating_sub(y));

        Rect::new(x, y, width, height)
    }

    /// Returns the candidate index under (`column`, `row`), if any.
    pub fn row_at(area: Rect, dropdown: &Dropdown, column: u16, row: u16) -> Option<usize> {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if column < inner.x || column >= inner.right() || row < inner.y || row >= inner.bottom() {
            return None;
        }

        let len = dropdown.candidates().len();
        let skip = first_visible(len, dropdown.highlighted(), inner.height as usize);
        let index = skip + (row - inner.y) as usize;
        (index < len).then_some(index)
    }
}

impl Widget for CompletionPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.dropdown.is_open() || area.height < 3 {
            return;
        }

        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Completions ");

        let inner = block.inner(area);
        block.render(area, buf);

        let candidates = self.dropdown.candidates();
        let highlighted = self.dropdown.highlighted();
        let skip = first_visible(candidates.len(), highlighted, inner.height as usize);

        for (row, (idx, candidate)) in candidates
            .iter()
            .enumerate()
            .skip(skip)
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + row as u16;
            let is_selected = idx == highlighted;

            let bg_color = if is_selected {
                Color::DarkGray
            } else {
                Color::Reset
            };

            for x in inner.x..inner.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(bg_color);
                }
            }

            let kind_style = Style::default()
                .fg(kind_color(candidate))
                .bg(bg_color)
                .add_modifier(Modifier::BOLD);
            let text_style = if is_selected {
                Style::default().fg(Color::White).bg(bg_color)
            } else {
                Style::default()
            };
            let detail_style = Style::default().fg(Color::Gray).bg(bg_color);

            let mut spans = vec![
                Span::styled(format!("[{}] ", candidate.kind_label()), kind_style),
                Span::styled(candidate.value(), text_style),
            ];
            if let Some(detail) = candidate.detail() {
                spans.push(Span::styled(format!(" : {detail}"), detail_style));
            }

            Paragraph::new(Line::from(spans)).render(Rect::new(inner.x, y, inner.width, 1), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Schema, Table};
    use crate::tui::query_box::{QueryBox, QueryBoxOptions};

    fn open_dropdown(value: &str, schema: &Schema) -> QueryBox {
        let mut qb = QueryBox::new(QueryBoxOptions::default());
        qb.sync(value, schema);
        qb
    }

    fn tables(n: usize) -> Schema {
        Schema::with_tables((0..n).map(|i| Table::new(format!("tabla_{i}"))).collect())
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_popup_area_below_input() {
        let input = Rect::new(0, 1, 80, 3);
        let bounds = Rect::new(0, 0, 80, 24);
        assert_eq!(
            CompletionPopup::popup_area(input, bounds, 3),
            Rect::new(1, 4, 60, 5)
        );
    }

    #[test]
    fn test_popup_area_clipped_to_bounds() {
        let input = Rect::new(0, 1, 30, 3);
        let bounds = Rect::new(0, 0, 30, 8);
        let area = CompletionPopup::popup_area(input, bounds, 8);
        assert_eq!(area.height, 4);
        assert_eq!(area.width, 28);
    }

    #[test]
    fn test_renders_candidates_with_detail() {
        let schema = Schema::with_tables(vec![Table::new("reclamos").with_columns(vec![
            Column::new("zona_id", "integer").references("zona"),
        ])]);
        let qb = open_dropdown("reclamos.", &schema);
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        CompletionPopup::new(qb.dropdown()).render(area, &mut buf);

        assert!(row(&buf, 0).contains("Completions"));
        assert!(row(&buf, 1).contains("[col] zona_id : integer -> zona"));
    }

    #[test]
    fn test_closed_dropdown_renders_nothing() {
        let dropdown = Dropdown::Closed;
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        CompletionPopup::new(&dropdown).render(area, &mut buf);
        assert_eq!(row(&buf, 0).trim(), "");
    }

    #[test]
    fn test_row_at_maps_rows_to_indices() {
        let schema = tables(3);
        let qb = open_dropdown("tabla", &schema);
        let area = Rect::new(1, 4, 30, 5);

        assert_eq!(CompletionPopup::row_at(area, qb.dropdown(), 5, 5), Some(0));
        assert_eq!(CompletionPopup::row_at(area, qb.dropdown(), 5, 7), Some(2));
        // Borders and outside
        assert_eq!(CompletionPopup::row_at(area, qb.dropdown(), 5, 4), None);
        assert_eq!(CompletionPopup::row_at(area, qb.dropdown(), 1, 5), None);
        assert_eq!(CompletionPopup::row_at(area, qb.dropdown(), 5, 20), None);
    }

    #[test]
    fn test_row_at_past_last_candidate() {
        let schema = tables(2);
        let qb = open_dropdown("tabla", &schema);
        let area = Rect::new(0, 0, 30, 6);
        assert_eq!(CompletionPopup::row_at(area, qb.dropdown(), 3, 3), None);
    }

    #[test]
    fn test_first_visible_keeps_highlight_in_view() {
        assert_eq!(first_visible(8, 0, 4), 0);
        assert_eq!(first_visible(8, 5, 4), 3);
        assert_eq!(first_visible(8, 7, 4), 4);
        assert_eq!(first_visible(3, 2, 10), 0);
    }
}
