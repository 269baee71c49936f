use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeSet;
use url::Url;

use super::CatalogError;

// ============================================================================
// Item
// ============================================================================

/// A single catalog entry (a game) with its display metadata.
///
/// Only `title` and `url` are required. Optional fields fall back to empty
/// values when they are missing, `null` or of the wrong type, so a sparse or
/// sloppy record still filters and sorts like any other.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// Non-string entries are dropped.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    pub url: String,
    /// Image location; an empty string is normalized to `None`.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub thumbnail: Option<String>,
    /// Numeric strings such as `"9"` are accepted.
    #[serde(default, deserialize_with = "lenient_number")]
    pub popularity: f64,
    /// Opaque timestamp; only its ordering matters.
    #[serde(default, deserialize_with = "lenient_number")]
    pub added: f64,
}

impl Item {
    /// Create an item with only the required fields set.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            url: url.into(),
            thumbnail: None,
            popularity: 0.0,
            added: 0.0,
        }
    }

    /// Tags joined the way cards display them.
    pub fn tag_line(&self) -> String {
        self.tags.join(" • ")
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()).unwrap_or(0.0))
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

// ============================================================================
// Catalog
// ============================================================================

/// The loaded list of items plus everything derived from it at load time.
///
/// Never mutated after construction. `tags` is the sorted, de-duplicated
/// union of every item's tags.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    tags: Vec<String>,
    base_url: Option<Url>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        let tags = items
            .iter()
            .flat_map(|item| item.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            items,
            tags,
            base_url: None,
        }
    }

    /// Attach the location the catalog was fetched from, used to resolve
    /// relative item links.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every distinct tag in the catalog, ascending.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Resolve an item's link to an absolute URL.
    ///
    /// Absolute links are returned as-is. Relative links (`/games/snake/`) are
    /// joined onto the catalog's base URL; without one they cannot be resolved.
    pub fn resolve_link(&self, item: &Item) -> Option<Url> {
        match Url::parse(&item.url) {
            Ok(url) => Some(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.base_url.as_ref()?.join(&item.url).ok()
            }
            Err(e) => {
                tracing::debug!(url = %item.url, error = %e, "Unparseable item link");
                None
            }
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Outcome of decoding a catalog document.
#[derive(Debug)]
pub struct ParseResult {
    pub items: Vec<Item>,
    /// Records that were not objects or lacked a string `title`/`url`.
    pub skipped: usize,
}

/// Decode a catalog document: a JSON array of item objects.
///
/// Each element is decoded on its own so one malformed record does not sink
/// the whole catalog. The document itself must be an array.
pub fn parse_catalog(bytes: &[u8]) -> Result<ParseResult, CatalogError> {
    let records: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;

    let mut items = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Item>(record) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::debug!(index, error = %e, "Skipping malformed catalog record");
                skipped += 1;
            }
        }
    }

    Ok(ParseResult { items, skipped })
}
