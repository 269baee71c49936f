use crate::app::{App, Focus};
use crate::util::display_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const PLACEHOLDER: &str = "Press / to search games";

/// Render the search line: the raw query as typed, with a cursor while
/// editing.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let editing = app.focus == Focus::Search;
    let border = if editing {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Search ");

    let inner_width = area.width.saturating_sub(2) as usize;
    let line = if app.search_input.is_empty() && !editing {
        Line::from(Span::styled(PLACEHOLDER, app.style("search_placeholder")))
    } else {
        // Keep the tail (where typing happens) visible on long queries.
        let cursor = if editing { "▏" } else { "" };
        let budget = inner_width.saturating_sub(display_width(cursor));
        let shown = tail_to_width(&app.search_input, budget);
        Line::from(vec![
            Span::styled(shown, app.style("search_input")),
            Span::styled(cursor, app.style("search_input")),
        ])
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

/// The longest suffix of `s` that fits in `width` columns.
fn tail_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &s[start..]
}
