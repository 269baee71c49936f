//! Keybinding registry: maps key events to actions, per focus context, with
//! overrides from the `[keybindings]` table in config.toml.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavLeft,
    NavRight,
    NavUp,
    NavDown,
    CycleFocus,
    EnterSearch,
    ExitSearch,
    ToggleTag,
    OpenLink,
    CycleSort,
    ToggleTheme,
    ClearFilters,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavLeft => "Move left",
            Self::NavRight => "Move right",
            Self::NavUp => "Move up",
            Self::NavDown => "Move down",
            Self::CycleFocus => "Switch between tags and games",
            Self::EnterSearch => "Search",
            Self::ExitSearch => "Leave search",
            Self::ToggleTag => "Toggle tag filter",
            Self::OpenLink => "Play (open in browser)",
            Self::CycleSort => "Change sort order",
            Self::ToggleTheme => "Toggle light/dark theme",
            Self::ClearFilters => "Clear search and tags",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Tags,
    Cards,
    /// Text entry. Printable keys type into the query, so this context does
    /// not fall back to Global.
    Search,
}

impl Context {
    /// Section heading in the help overlay.
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Tags => "Tag row",
            Self::Cards => "Game grid",
            Self::Search => "Search",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right",
///   "Backspace", "Space"
/// - Ctrl combos: "Ctrl+q"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s.strip_prefix(&['F', 'f'][..]).and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// try the focused context first, then Global.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    /// Create a registry with the default bindings.
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;
        use Context::*;

        // === Global ===
        self.bind(Global, KeySpec::ch('q'), Quit);
        self.bind(Global, KeySpec::ch('h'), NavLeft);
        self.bind(Global, KeySpec::plain(KeyCode::Left), NavLeft);
        self.bind(Global, KeySpec::ch('l'), NavRight);
        self.bind(Global, KeySpec::plain(KeyCode::Right), NavRight);
        self.bind(Global, KeySpec::ch('k'), NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Up), NavUp);
        self.bind(Global, KeySpec::ch('j'), NavDown);
        self.bind(Global, KeySpec::plain(KeyCode::Down), NavDown);
        self.bind(Global, KeySpec::plain(KeyCode::Tab), CycleFocus);
        self.bind(Global, KeySpec::ch('/'), EnterSearch);
        self.bind(Global, KeySpec::ch('s'), CycleSort);
        self.bind(Global, KeySpec::ch('t'), ToggleTheme);
        self.bind(Global, KeySpec::ch('c'), ClearFilters);
        self.bind(Global, KeySpec::ch('?'), ShowHelp);

        // === Tag row ===
        self.bind(Tags, KeySpec::ch(' '), ToggleTag);
        self.bind(Tags, KeySpec::plain(KeyCode::Enter), ToggleTag);

        // === Game grid ===
        self.bind(Cards, KeySpec::plain(KeyCode::Enter), OpenLink);
        self.bind(Cards, KeySpec::ch('o'), OpenLink);

        // === Search ===
        self.bind(Search, KeySpec::plain(KeyCode::Esc), ExitSearch);
        self.bind(Search, KeySpec::plain(KeyCode::Enter), ExitSearch);
        self.bind(Search, KeySpec::plain(KeyCode::Tab), CycleFocus);
        self.bind(Search, KeySpec::ctrl('c'), Quit);
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "cycle_sort").
    /// Values are key strings (e.g., "q", "Ctrl+q", "F5"). The new key
    /// replaces every default key for that action, in the same contexts.
    ///
    /// Returns a warning for each unrecognized action name or unparseable key.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key in a context.
    ///
    /// Tries the specific context first, then falls back to Global (except
    /// from Search).
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        match context {
            Context::Global | Context::Search => None,
            _ => self.lookup.get(&(Context::Global, key)).copied(),
        }
    }

    /// All bindings for the help screen, in registration order.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_left" | "left" => Some(Action::NavLeft),
        "nav_right" | "right" => Some(Action::NavRight),
        "nav_up" | "up" => Some(Action::NavUp),
        "nav_down" | "down" => Some(Action::NavDown),
        "cycle_focus" | "focus" => Some(Action::CycleFocus),
        "enter_search" | "search" => Some(Action::EnterSearch),
        "exit_search" => Some(Action::ExitSearch),
        "toggle_tag" | "tag" => Some(Action::ToggleTag),
        "open_link" | "open" | "play" => Some(Action::OpenLink),
        "cycle_sort" | "sort" => Some(Action::CycleSort),
        "toggle_theme" | "theme" => Some(Action::ToggleTheme),
        "clear_filters" | "clear" => Some(Action::ClearFilters),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
