use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Sort Order
// ============================================================================

/// The three orderings a view can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Highest popularity first.
    #[default]
    Popular,
    /// Title, A to Z.
    Az,
    /// Most recently added first.
    New,
}

#[derive(Debug, Error)]
#[error("Unknown sort order '{0}' (expected popular, az or new)")]
pub struct ParseSortError(String);

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [Self::Popular, Self::Az, Self::New];

    /// Stable identifier, as used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Az => "az",
            Self::New => "new",
        }
    }

    /// Human-readable label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Popular => "Most popular",
            Self::Az => "A-Z",
            Self::New => "Newest",
        }
    }

    /// Cycle: Popular → Az → New → Popular.
    pub fn next(self) -> Self {
        match self {
            Self::Popular => Self::Az,
            Self::Az => Self::New,
            Self::New => Self::Popular,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popular" => Ok(Self::Popular),
            "az" | "a-z" => Ok(Self::Az),
            "new" | "newest" => Ok(Self::New),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

// ============================================================================
// Filter State
// ============================================================================

/// The user's current search, tag and sort selections.
///
/// Updated only through the pure functions below, each of which consumes a
/// state and returns the next one. The stored query is always trimmed and
/// lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    active_tags: BTreeSet<String>,
    sort: SortOrder,
}

impl FilterState {
    pub fn new(sort: SortOrder) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_tags(&self) -> &BTreeSet<String> {
        &self.active_tags
    }

    pub fn is_tag_active(&self, tag: &str) -> bool {
        self.active_tags.contains(tag)
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// True when neither the query nor any tag restricts the view.
    pub fn is_unfiltered(&self) -> bool {
        self.query.is_empty() && self.active_tags.is_empty()
    }

    /// Replace the query with the normalized form of `raw`.
    pub fn with_query(mut self, raw: &str) -> Self {
        self.query = raw.trim().to_lowercase();
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Drop the query and all active tags, keeping the sort order.
    pub fn cleared(self) -> Self {
        Self::new(self.sort)
    }
}

/// Add `tag` to the active set if absent, remove it if present.
///
/// Nothing else in the state changes, so applying it twice with the same tag
/// returns the original state.
pub fn toggle_tag(mut state: FilterState, tag: &str) -> FilterState {
    if !state.active_tags.remove(tag) {
        state.active_tags.insert(tag.to_string());
    }
    state
}
