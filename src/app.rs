use crate::catalog::{Catalog, CatalogError, Item};
use crate::engine::{toggle_tag, view_indices, FilterState, SortOrder};
use crate::keybindings::KeybindingRegistry;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;

/// How long a status bar message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

/// Which part of the screen receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tags,
    Cards,
    /// Editing the search line.
    Search,
}

/// Progress of the one-shot catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// Load failed; holds the error message shown in the error panel.
    Failed(String),
}

/// Events from background tasks
pub enum AppEvent {
    CatalogLoaded(Result<Catalog, CatalogError>),
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
///
/// Owned exclusively by the TUI loop. Every mutation of `filter` goes
/// through `refresh_view`, so `view` always reflects (catalog, filter).
pub struct App {
    // Theme
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // Data
    /// Where the catalog comes from, for display.
    pub source: String,
    pub load_state: LoadState,
    pub catalog: Catalog,
    pub filter: FilterState,
    /// Catalog indices of the visible items, in display order.
    pub view: Vec<usize>,

    // UI State
    pub focus: Focus,
    /// Focus to restore when the search line is left.
    pub focus_before_search: Focus,
    /// Raw search line text; `filter` holds its normalized form.
    pub search_input: String,
    /// Cursor position in `catalog.tags()`.
    pub selected_tag: usize,
    /// Cursor position in `view`.
    pub selected_card: usize,
    /// Columns in the card grid, as laid out by the last frame.
    pub grid_columns: usize,
    /// First grid row on screen.
    pub grid_first_row: usize,

    /// Transient message and the time it was set.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(
        source: impl Into<String>,
        theme_variant: ThemeVariant,
        sort: SortOrder,
        keybindings: KeybindingRegistry,
    ) -> Self {
        Self {
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            source: source.into(),
            load_state: LoadState::Loading,
            catalog: Catalog::default(),
            filter: FilterState::new(sort),
            view: Vec::new(),
            focus: Focus::Cards,
            focus_before_search: Focus::Cards,
            search_input: String::new(),
            selected_tag: 0,
            selected_card: 0,
            grid_columns: 1,
            grid_first_row: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    ///
    /// Returns `Style::default()` for unknown roles.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    // ========================================================================
    // Catalog lifecycle
    // ========================================================================

    /// Install the loaded catalog and compute the first view.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.load_state = LoadState::Loaded;
        self.selected_tag = 0;
        self.selected_card = 0;
        self.grid_first_row = 0;
        self.refresh_view();
    }

    /// Record a failed load. The catalog stays empty; there is no retry.
    pub fn fail_load(&mut self, error: &CatalogError) {
        tracing::error!(source = %self.source, error = %error, "Catalog load failed");
        self.load_state = LoadState::Failed(error.to_string());
        self.needs_redraw = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    // ========================================================================
    // Filter updates
    // ========================================================================

    /// Recompute `view` from the catalog and filter, clamping the cursor.
    pub fn refresh_view(&mut self) {
        self.view = view_indices(&self.catalog, &self.filter);
        self.clamp_selections();
        self.needs_redraw = true;
    }

    fn update_filter(&mut self, f: impl FnOnce(FilterState) -> FilterState) {
        self.filter = f(std::mem::take(&mut self.filter));
        self.refresh_view();
    }

    /// Toggle `tag` in the active tag set.
    pub fn toggle_tag(&mut self, tag: &str) {
        self.update_filter(|state| toggle_tag(state, tag));
    }

    /// Toggle the tag under the tag-row cursor.
    pub fn toggle_selected_tag(&mut self) {
        if let Some(tag) = self.catalog.tags().get(self.selected_tag).cloned() {
            self.toggle_tag(&tag);
        }
    }

    /// Advance to the next sort order. Returns the new order.
    pub fn cycle_sort(&mut self) -> SortOrder {
        let next = self.filter.sort().next();
        self.update_filter(|state| state.with_sort(next));
        self.selected_card = 0;
        self.grid_first_row = 0;
        next
    }

    /// Clear the search line and all tags. The sort order is kept.
    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        self.update_filter(FilterState::cleared);
    }

    // ========================================================================
    // Search line
    // ========================================================================

    pub fn enter_search(&mut self) {
        if self.focus != Focus::Search {
            self.focus_before_search = self.focus;
            self.focus = Focus::Search;
        }
    }

    pub fn exit_search(&mut self) {
        if self.focus == Focus::Search {
            self.focus = self.focus_before_search;
        }
    }

    /// Append a character to the search line. Returns false at the length cap.
    pub fn search_push(&mut self, c: char) -> bool {
        if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            return false;
        }
        self.search_input.push(c);
        self.apply_search_input();
        true
    }

    pub fn search_pop(&mut self) {
        if self.search_input.pop().is_some() {
            self.apply_search_input();
        }
    }

    pub fn search_clear(&mut self) {
        if !self.search_input.is_empty() {
            self.search_input.clear();
            self.apply_search_input();
        }
    }

    fn apply_search_input(&mut self) {
        let raw = self.search_input.clone();
        self.update_filter(|state| state.with_query(&raw));
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Switch to a different theme variant at runtime.
    ///
    /// Rebuilds the `StyleMap` from the new variant's palette and
    /// marks the UI as needing a full redraw.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Flip between light and dark. Returns the new variant.
    pub fn toggle_theme(&mut self) -> ThemeVariant {
        let next = self.theme_variant.toggled();
        self.set_theme(next);
        next
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Tags → Cards → Tags. Leaving search lands on the tag row.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Tags => Focus::Cards,
            Focus::Cards | Focus::Search => Focus::Tags,
        };
    }

    pub fn nav_left(&mut self) {
        match self.focus {
            Focus::Tags => self.selected_tag = self.selected_tag.saturating_sub(1),
            Focus::Cards => self.selected_card = self.selected_card.saturating_sub(1),
            Focus::Search => {}
        }
    }

    pub fn nav_right(&mut self) {
        match self.focus {
            Focus::Tags => {
                let max = self.catalog.tags().len().saturating_sub(1);
                self.selected_tag = self.selected_tag.saturating_add(1).min(max);
            }
            Focus::Cards => {
                let max = self.view.len().saturating_sub(1);
                self.selected_card = self.selected_card.saturating_add(1).min(max);
            }
            Focus::Search => {}
        }
    }

    /// One grid row up; from the top row, move focus to the tag row.
    pub fn nav_up(&mut self) {
        if self.focus != Focus::Cards {
            return;
        }
        let columns = self.grid_columns.max(1);
        if self.selected_card < columns {
            self.focus = Focus::Tags;
        } else {
            self.selected_card -= columns;
        }
    }

    /// One grid row down; from the tag row, move focus into the grid.
    pub fn nav_down(&mut self) {
        match self.focus {
            Focus::Tags => self.focus = Focus::Cards,
            Focus::Cards => {
                if self.view.is_empty() {
                    return;
                }
                let max = self.view.len() - 1;
                let columns = self.grid_columns.max(1);
                // Stay put if there is no next row at all.
                if self.selected_card / columns < max / columns {
                    self.selected_card = (self.selected_card + columns).min(max);
                }
            }
            Focus::Search => {}
        }
    }

    /// Keep both cursors inside their lists.
    pub fn clamp_selections(&mut self) {
        self.selected_tag = self
            .selected_tag
            .min(self.catalog.tags().len().saturating_sub(1));
        self.selected_card = self.selected_card.min(self.view.len().saturating_sub(1));
    }

    /// Adjust `grid_first_row` so the selected card's row is on screen.
    pub fn scroll_to_selection(&mut self, visible_rows: usize) {
        let visible_rows = visible_rows.max(1);
        let row = self.selected_card / self.grid_columns.max(1);
        if row < self.grid_first_row {
            self.grid_first_row = row;
        } else if row >= self.grid_first_row + visible_rows {
            self.grid_first_row = row + 1 - visible_rows;
        }
    }

    /// The item under the card cursor.
    pub fn selected_item(&self) -> Option<&Item> {
        self.view
            .get(self.selected_card)
            .and_then(|&index| self.catalog.get(index))
    }

    /// The items currently shown, in display order.
    pub fn visible_items(&self) -> impl Iterator<Item = &Item> {
        self.view.iter().filter_map(|&index| self.catalog.get(index))
    }

    // ========================================================================
    // Status bar
    // ========================================================================

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Advance the spinner while the catalog is loading. Returns true if it moved.
    pub fn tick_spinner(&mut self) -> bool {
        if self.load_state == LoadState::Loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES;
            true
        } else {
            false
        }
    }
}
