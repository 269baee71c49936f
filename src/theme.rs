//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum is the persisted light/dark preference, and
//! `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// The two display themes. Dark is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Value written to the preference store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }

    /// Status bar glyph: sun for light, moon for dark.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "☾",
            Self::Light => "☀",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Search line --
    pub search_input: Style,
    pub search_placeholder: Style,

    // -- Tag row --
    pub tag_normal: Style,
    pub tag_active: Style,
    pub tag_cursor: Style,

    // -- Cards --
    pub card_border: Style,
    pub card_border_selected: Style,
    pub card_title: Style,
    pub card_meta: Style,
    pub card_link: Style,
    pub card_thumbnail: Style,
    pub card_placeholder: Style,

    // -- States --
    pub empty_state: Style,
    pub loading: Style,
    pub error: Style,

    // -- Chrome --
    pub body: Style,
    pub heading: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            search_input: Style::default().fg(Color::White),
            search_placeholder: Style::default().fg(Color::DarkGray),

            tag_normal: Style::default().fg(Color::Gray),
            tag_active: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            tag_cursor: Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD),

            card_border: Style::default().fg(Color::DarkGray),
            card_border_selected: Style::default().fg(Color::Cyan),
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_meta: Style::default().fg(Color::Gray),
            card_link: Style::default().fg(Color::Yellow),
            card_thumbnail: Style::default().fg(Color::Blue),
            card_placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            empty_state: Style::default().fg(Color::Gray),
            loading: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red),

            body: Style::default(),
            heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            search_input: Style::default().fg(Color::Black),
            search_placeholder: Style::default().fg(Color::Gray),

            tag_normal: Style::default().fg(Color::DarkGray),
            tag_active: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            tag_cursor: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),

            card_border: Style::default().fg(Color::Gray),
            card_border_selected: Style::default().fg(Color::Blue),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_meta: Style::default().fg(Color::DarkGray),
            card_link: Style::default().fg(Color::Magenta),
            card_thumbnail: Style::default().fg(Color::Blue),
            card_placeholder: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            empty_state: Style::default().fg(Color::DarkGray),
            loading: Style::default().fg(Color::Blue),
            error: Style::default().fg(Color::Red),

            body: Style::default().fg(Color::Black),
            heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 20] = [
    "search_input",
    "search_placeholder",
    "tag_normal",
    "tag_active",
    "tag_cursor",
    "card_border",
    "card_border_selected",
    "card_title",
    "card_meta",
    "card_link",
    "card_thumbnail",
    "card_placeholder",
    "empty_state",
    "loading",
    "error",
    "body",
    "heading",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 20] = [
            p.search_input,
            p.search_placeholder,
            p.tag_normal,
            p.tag_active,
            p.tag_cursor,
            p.card_border,
            p.card_border_selected,
            p.card_title,
            p.card_meta,
            p.card_link,
            p.card_thumbnail,
            p.card_placeholder,
            p.empty_state,
            p.loading,
            p.error,
            p.body,
            p.heading,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}
