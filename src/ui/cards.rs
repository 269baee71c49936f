use crate::app::{App, Focus};
use crate::catalog::Item;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Narrowest a card may get before the grid drops a column.
const MIN_CARD_WIDTH: u16 = 28;
/// Border plus four content lines.
const CARD_HEIGHT: u16 = 6;

/// Render the visible items as a grid of cards.
///
/// The column count follows the area width. The chosen geometry is written
/// back to `app` so grid navigation moves by whole rows and the selected
/// card stays on screen.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 4 || area.height < CARD_HEIGHT {
        return;
    }

    let columns = (area.width / MIN_CARD_WIDTH).max(1);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    app.grid_columns = columns as usize;
    app.scroll_to_selection(visible_rows);

    let card_width = area.width / columns;
    let first = app.grid_first_row * app.grid_columns;
    let focused = app.focus == Focus::Cards;

    for (slot, &catalog_index) in app
        .view
        .iter()
        .enumerate()
        .skip(first)
        .take(visible_rows * app.grid_columns)
    {
        let Some(item) = app.catalog.get(catalog_index) else {
            continue;
        };
        let offset = slot - first;
        let col = (offset % app.grid_columns) as u16;
        let row = (offset / app.grid_columns) as u16;
        let card = Rect::new(
            area.x + col * card_width,
            area.y + row * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT,
        );
        render_card(f, app, item, focused && slot == app.selected_card, card);
    }
}

fn render_card(f: &mut Frame, app: &App, item: &Item, selected: bool, area: Rect) {
    let border = if selected {
        app.style("card_border_selected")
    } else {
        app.style("card_border")
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let width = area.width.saturating_sub(2) as usize;

    let preview = match item.thumbnail.as_deref() {
        Some(thumbnail) => Span::styled(
            fit(&format!("▣ {}", file_name(thumbnail)), width),
            app.style("card_thumbnail"),
        ),
        None => Span::styled("No preview", app.style("card_placeholder")),
    };

    let mut title_style = app.style("card_title");
    if selected {
        title_style = title_style.add_modifier(Modifier::REVERSED);
    }

    let lines = vec![
        Line::from(preview),
        Line::from(Span::styled(fit(&item.title, width), title_style)),
        Line::from(Span::styled(fit(&item.tag_line(), width), app.style("card_meta"))),
        Line::from(Span::styled(
            fit(&format!("▶ Play  {}", item.url), width),
            app.style("card_link"),
        )),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Sanitize untrusted catalog text and cut it to `width` columns.
fn fit(text: &str, width: usize) -> String {
    truncate_to_width(&strip_control_chars(text), width).into_owned()
}

/// Last path segment of an image location, for display.
fn file_name(location: &str) -> &str {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(location)
}
