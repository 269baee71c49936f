use crate::app::{App, Focus};
use crate::util::{display_width, strip_control_chars};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the tag button row.
///
/// One button per catalog tag, highlighted when active. The row scrolls
/// horizontally so the cursor's button is always visible.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let focused = app.focus == Focus::Tags;
    let active = app.filter.active_tags().len();
    let title = if active > 0 {
        format!(" Tags ({} active) ", active)
    } else {
        " Tags ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            app.style("panel_border_focused")
        } else {
            app.style("panel_border")
        })
        .title(title);

    let tags = app.catalog.tags();
    if tags.is_empty() {
        let text = if app.is_loaded() { "No tags" } else { "" };
        let line = Line::from(Span::styled(text, app.style("search_placeholder")));
        f.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let labels: Vec<String> = tags
        .iter()
        .map(|tag| format!(" {} ", strip_control_chars(tag)))
        .collect();
    let widths: Vec<usize> = labels.iter().map(|l| display_width(l) + 1).collect();
    let inner_width = area.width.saturating_sub(2) as usize;
    let first = first_visible(&widths, app.selected_tag, inner_width);

    let mut spans = Vec::with_capacity(labels.len() * 2);
    for (index, (tag, label)) in tags.iter().zip(&labels).enumerate().skip(first) {
        let mut style = if app.filter.is_tag_active(tag) {
            app.style("tag_active")
        } else {
            app.style("tag_normal")
        };
        if focused && index == app.selected_tag {
            style = style.patch(app.style("tag_cursor"));
        }
        spans.push(Span::styled(label.as_str(), style));
        spans.push(Span::raw(" "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Index of the first button to draw so that `selected` ends inside `width`.
fn first_visible(widths: &[usize], selected: usize, width: usize) -> usize {
    if selected >= widths.len() {
        return 0;
    }
    let mut first = 0;
    let mut used: usize = widths[..=selected].iter().sum();
    while used > width && first < selected {
        used -= widths[first];
        first += 1;
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visible_fits() {
        assert_eq!(first_visible(&[5, 5, 5], 2, 20), 0);
    }

    #[test]
    fn test_first_visible_scrolls_to_cursor() {
        // Buttons 0..=3 need 24 columns; width 15 drops the first two.
        assert_eq!(first_visible(&[6, 6, 6, 6], 3, 15), 2);
        assert_eq!(first_visible(&[6, 6, 6, 6], 0, 15), 0);
    }

    #[test]
    fn test_first_visible_oversized_button() {
        assert_eq!(first_visible(&[4, 40], 1, 10), 1);
    }

    #[test]
    fn test_first_visible_out_of_range() {
        assert_eq!(first_visible(&[], 0, 10), 0);
        assert_eq!(first_visible(&[3], 5, 10), 0);
    }
}
