use crate::app::{App, Focus, LoadState};
use crate::util::display_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar: a message or key hints on the left; sort order,
/// result count and theme indicator on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let style = app.style("status_bar");

    let left: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match (&app.load_state, app.focus) {
            (LoadState::Failed(_), _) => Cow::Borrowed(" [q]uit"),
            (_, Focus::Search) => Cow::Borrowed(" Type to filter | Enter/Esc done | Ctrl+u clear"),
            (_, Focus::Tags) => Cow::Borrowed(" [Space]toggle tag [Tab]games [/]search [?]help [q]uit"),
            (_, Focus::Cards) => Cow::Borrowed(" [Enter]play [Tab]tags [/]search [s]ort [t]heme [?]help [q]uit"),
        }
    };

    let right = format!(
        " {} · {}/{} games · {} ",
        app.filter.sort().label(),
        app.view.len(),
        app.catalog.len(),
        app.theme_variant.icon()
    );

    let right_width = (display_width(&right) as u16).min(area.width);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    f.render_widget(Paragraph::new(left).style(style), chunks[0]);
    f.render_widget(Paragraph::new(right).style(style), chunks[1]);
}
