//! Render functions for the TUI.
//!
//! The layout is computed once per frame and each widget is handed its own
//! `Rect`: search line, tag row, main area, status bar, with the help overlay
//! drawn on top.

use crate::app::{App, LoadState, SPINNER_FRAMES};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{cards, help, search, status, tags};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 12;

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main render dispatch function.
///
/// Takes `&mut App` because the card grid records its column count and
/// scroll position for navigation.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    search::render(f, app, chunks[0]);
    tags::render(f, app, chunks[1]);
    render_main(f, app, chunks[2]);
    status::render(f, app, chunks[3]);

    if app.show_help {
        help::render(f, app);
    }
}

/// Card grid, or the panel for whichever state replaces it.
fn render_main(f: &mut Frame, app: &mut App, area: Rect) {
    match &app.load_state {
        LoadState::Loading => render_loading(f, app, area),
        LoadState::Failed(message) => render_error(f, app, message, area),
        LoadState::Loaded if app.view.is_empty() => render_empty(f, app, area),
        LoadState::Loaded => cards::render(f, app, area),
    }
}

fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    let spinner = SPINNER[app.spinner_frame % SPINNER_FRAMES];
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Loading catalog…", spinner),
            app.style("loading"),
        )),
        Line::from(Span::styled(app.source.as_str(), app.style("card_meta"))),
    ];
    f.render_widget(centered_paragraph(lines), area);
}

/// The visible failure state. The load is not retried; `q` still quits.
fn render_error(f: &mut Frame, app: &App, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("error"))
        .title(" Could not load catalog ");

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, app.style("error"))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Source: ", app.style("card_meta")),
            Span::styled(app.source.as_str(), app.style("body")),
        ]),
        Line::from(""),
        Line::from(Span::styled("Press q to quit.", app.style("card_meta"))),
    ];

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_empty(f: &mut Frame, app: &App, area: Rect) {
    let (headline, hint) = if app.catalog.is_empty() {
        ("The catalog is empty.", "")
    } else {
        ("No games match your filters.", "Press c to clear the search and tags.")
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(headline, app.style("empty_state"))),
        Line::from(Span::styled(hint, app.style("card_meta"))),
    ];
    f.render_widget(centered_paragraph(lines), area);
}

fn centered_paragraph(lines: Vec<Line<'_>>) -> Paragraph<'_> {
    Paragraph::new(lines).alignment(Alignment::Center)
}
