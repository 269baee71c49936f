//! Input handling for the TUI.
//!
//! Keys go to the help overlay when it is open, to the search line while it
//! has focus, and otherwise through the keybinding registry using the
//! focused panel as context.

use crate::app::{App, Focus};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::preferences::{PreferenceStore, ThemeStore};
use crate::util::{validate_url_for_open, MAX_SEARCH_QUERY_LENGTH};
use crossterm::event::{KeyCode, KeyModifiers};
use std::borrow::Cow;
use url::Url;

use super::Action;

/// Map the current focus to a keybinding context.
fn focus_to_context(focus: Focus) -> KbContext {
    match focus {
        Focus::Tags => KbContext::Tags,
        Focus::Cards => KbContext::Cards,
        Focus::Search => KbContext::Search,
    }
}

/// Main input dispatch function.
pub(super) async fn handle_input<S: PreferenceStore>(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    prefs: &ThemeStore<S>,
) -> Action {
    // Shifted characters arrive as the shifted char plus SHIFT ("?" = Shift+/).
    let modifiers = if matches!(code, KeyCode::Char(_)) {
        modifiers.difference(KeyModifiers::SHIFT)
    } else {
        modifiers
    };

    if app.show_help {
        return handle_help_input(app, code);
    }

    let context = focus_to_context(app.focus);
    let action = app.keybindings.action_for_key(code, modifiers, context);

    if app.focus == Focus::Search && action.is_none() {
        handle_search_typing(app, code, modifiers);
        return Action::Continue;
    }

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavLeft) => app.nav_left(),
        Some(KbAction::NavRight) => app.nav_right(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::CycleFocus) => app.cycle_focus(),
        Some(KbAction::EnterSearch) => app.enter_search(),
        Some(KbAction::ExitSearch) => app.exit_search(),
        Some(KbAction::ToggleTag) => {
            if app.focus == Focus::Tags {
                app.toggle_selected_tag();
            }
        }
        Some(KbAction::OpenLink) => open_selected(app),
        Some(KbAction::CycleSort) => {
            let sort = app.cycle_sort();
            app.set_status(format!("Sort: {}", sort.label()));
        }
        Some(KbAction::ToggleTheme) => toggle_theme(app, prefs).await,
        Some(KbAction::ClearFilters) => {
            app.clear_filters();
            app.set_status("Filters cleared");
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        None => {}
    }
    Action::Continue
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Edit the search line. The view follows every keystroke.
fn handle_search_typing(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.search_clear(),
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            if !app.search_push(c) {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
            }
        }
        _ => {}
    }
}

/// Flip the theme and persist the choice.
///
/// A failed write is reported but the new theme stays on screen.
async fn toggle_theme<S: PreferenceStore>(app: &mut App, prefs: &ThemeStore<S>) {
    let variant = app.toggle_theme();
    match prefs.set_theme(variant).await {
        Ok(()) => app.set_status(format!("Theme: {}", variant.name())),
        Err(e) => {
            tracing::warn!(error = %e, theme = variant.as_str(), "Failed to save theme preference");
            app.set_status(format!("Theme not saved: {}", e));
        }
    }
}

/// The absolute, openable link of the selected card, or a message saying
/// why there is none.
fn selected_link(app: &App) -> Result<Url, Cow<'static, str>> {
    let item = app.selected_item().ok_or(Cow::Borrowed("No game selected"))?;
    let url = app.catalog.resolve_link(item).ok_or_else(|| {
        Cow::Owned(format!(
            "Cannot open '{}': relative link and no catalog URL",
            item.url
        ))
    })?;
    validate_url_for_open(url.as_str()).map_err(|e| Cow::Owned(e.to_string()))
}

fn open_selected(app: &mut App) {
    let url = match selected_link(app) {
        Ok(url) => url,
        Err(msg) => {
            app.set_status(msg);
            return;
        }
    };

    match open::that(url.as_str()) {
        Ok(()) => {
            tracing::info!(url = %url, "Opened game in browser");
            app.set_status(format!("Opening {}", url));
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to open browser");
            app.set_status(format!("Failed to open browser: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Item};
    use crate::engine::SortOrder;
    use crate::keybindings::KeybindingRegistry;
    use crate::preferences::MemoryPreferenceStore;
    use crate::theme::ThemeVariant;

    struct ReadOnlyStore;

    impl PreferenceStore for ReadOnlyStore {
        async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("read-only"))
        }
    }

    fn prefs() -> ThemeStore<MemoryPreferenceStore> {
        ThemeStore::new(MemoryPreferenceStore::new(), ThemeVariant::Dark)
    }

    fn loaded_app() -> App {
        let mut app = App::new(
            "games.json",
            ThemeVariant::Dark,
            SortOrder::Popular,
            KeybindingRegistry::new(),
        );
        let mut chess = Item::new("Chess", "/games/chess/");
        chess.tags = vec!["strategy".to_string()];
        chess.popularity = 5.0;
        let mut snake = Item::new("Snake", "https://arcade.example.com/snake/");
        snake.tags = vec!["arcade".to_string()];
        snake.popularity = 9.0;
        app.set_catalog(Catalog::new(vec![chess, snake]));
        app
    }

    async fn press<S: PreferenceStore>(app: &mut App, prefs: &ThemeStore<S>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, prefs).await
    }

    async fn type_str<S: PreferenceStore>(app: &mut App, prefs: &ThemeStore<S>, text: &str) {
        for c in text.chars() {
            press(app, prefs, KeyCode::Char(c)).await;
        }
    }

    fn status(app: &App) -> Option<&str> {
        app.status_message.as_ref().map(|(m, _)| m.as_ref())
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = loaded_app();
        assert_eq!(press(&mut app, &prefs(), KeyCode::Char('q')).await, Action::Quit);
    }

    #[tokio::test]
    async fn test_search_typing_filters_and_q_does_not_quit() {
        let mut app = loaded_app();
        let prefs = prefs();
        press(&mut app, &prefs, KeyCode::Char('/')).await;
        assert_eq!(app.focus, Focus::Search);

        // "q" has no match but must be typed, not treated as quit.
        assert_eq!(press(&mut app, &prefs, KeyCode::Char('q')).await, Action::Continue);
        assert!(app.view.is_empty());

        press(&mut app, &prefs, KeyCode::Backspace).await;
        type_str(&mut app, &prefs, "sna").await;
        assert_eq!(app.search_input, "sna");
        assert_eq!(app.selected_item().map(|i| i.title.as_str()), Some("Snake"));

        press(&mut app, &prefs, KeyCode::Enter).await;
        assert_eq!(app.focus, Focus::Cards);
        assert_eq!(app.filter.query(), "sna");
    }

    #[tokio::test]
    async fn test_search_ctrl_u_clears_and_ctrl_c_quits() {
        let mut app = loaded_app();
        let prefs = prefs();
        press(&mut app, &prefs, KeyCode::Char('/')).await;
        type_str(&mut app, &prefs, "chess").await;
        assert_eq!(app.view.len(), 1);

        handle_input(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL, &prefs).await;
        assert!(app.search_input.is_empty());
        assert_eq!(app.view.len(), 2);

        let action = handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &prefs).await;
        assert_eq!(action, Action::Quit);
    }

    #[tokio::test]
    async fn test_shifted_question_mark_opens_help() {
        let mut app = loaded_app();
        let prefs = prefs();
        handle_input(&mut app, KeyCode::Char('?'), KeyModifiers::SHIFT, &prefs).await;
        assert!(app.show_help);

        // Help swallows keys until dismissed.
        assert_eq!(press(&mut app, &prefs, KeyCode::Char('j')).await, Action::Continue);
        assert_eq!(app.help_scroll_offset, 1);
        press(&mut app, &prefs, KeyCode::Char('q')).await;
        assert!(!app.show_help);
        assert_eq!(app.help_scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_tag_row_toggle() {
        let mut app = loaded_app();
        let prefs = prefs();
        press(&mut app, &prefs, KeyCode::Tab).await;
        assert_eq!(app.focus, Focus::Tags);

        press(&mut app, &prefs, KeyCode::Char(' ')).await;
        assert!(app.filter.is_tag_active("arcade"));
        assert_eq!(app.view.len(), 1);

        press(&mut app, &prefs, KeyCode::Enter).await;
        assert!(app.filter.active_tags().is_empty());
    }

    #[tokio::test]
    async fn test_sort_and_clear_report_status() {
        let mut app = loaded_app();
        let prefs = prefs();
        press(&mut app, &prefs, KeyCode::Char('s')).await;
        assert_eq!(app.filter.sort(), SortOrder::Az);
        assert_eq!(status(&app), Some("Sort: A-Z"));

        app.toggle_tag("arcade");
        press(&mut app, &prefs, KeyCode::Char('c')).await;
        assert!(app.filter.is_unfiltered());
        assert_eq!(status(&app), Some("Filters cleared"));
    }

    #[tokio::test]
    async fn test_theme_toggle_is_persisted() {
        let mut app = loaded_app();
        let prefs = prefs();
        press(&mut app, &prefs, KeyCode::Char('t')).await;

        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(prefs.get_theme().await, ThemeVariant::Light);
        assert_eq!(status(&app), Some("Theme: Light"));

        press(&mut app, &prefs, KeyCode::Char('t')).await;
        assert_eq!(prefs.get_theme().await, ThemeVariant::Dark);
    }

    #[tokio::test]
    async fn test_theme_toggle_failure_keeps_new_theme() {
        let mut app = loaded_app();
        let prefs = ThemeStore::new(ReadOnlyStore, ThemeVariant::Dark);
        press(&mut app, &prefs, KeyCode::Char('t')).await;

        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(status(&app), Some("Theme not saved: read-only"));
    }

    #[test]
    fn test_selected_link_absolute() {
        let app = loaded_app();
        // Snake (popularity 9) sorts first.
        let url = selected_link(&app).unwrap();
        assert_eq!(url.as_str(), "https://arcade.example.com/snake/");
    }

    #[test]
    fn test_selected_link_relative_without_base() {
        let mut app = loaded_app();
        app.nav_right();
        let err = selected_link(&app).unwrap_err();
        assert!(err.contains("relative link"));
    }

    #[test]
    fn test_selected_link_relative_with_base() {
        let mut app = loaded_app();
        let base = Url::parse("https://arcade.example.com/games.json").unwrap();
        let catalog = std::mem::take(&mut app.catalog).with_base_url(base);
        app.set_catalog(catalog);
        app.nav_right();

        let url = selected_link(&app).unwrap();
        assert_eq!(url.as_str(), "https://arcade.example.com/games/chess/");
    }

    #[test]
    fn test_selected_link_rejects_unsafe_scheme() {
        let mut app = loaded_app();
        app.set_catalog(Catalog::new(vec![Item::new("Evil", "file:///etc/passwd")]));
        let err = selected_link(&app).unwrap_err();
        assert!(err.contains("Unsupported scheme"));
    }

    #[test]
    fn test_selected_link_empty_view() {
        let mut app = loaded_app();
        app.set_catalog(Catalog::default());
        assert_eq!(selected_link(&app).unwrap_err(), "No game selected");
    }
}
