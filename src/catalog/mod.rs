//! Catalog loading: the static list of games and its derived tag set.
//!
//! - [`item`] - `Item` and `Catalog` types plus tolerant JSON decoding
//! - [`loader`] - one-shot retrieval from an HTTP URL or a local file
//!
//! # Example
//!
//! ```ignore
//! use gamedeck::catalog::{load, http_client, CatalogSource};
//!
//! let source = CatalogSource::parse("https://example.com/games.json")?;
//! let catalog = load(&source, &http_client()?).await?;
//! println!("{} games, {} tags", catalog.len(), catalog.tags().len());
//! ```

mod item;
mod loader;

use std::path::PathBuf;
use thiserror::Error;

pub use item::{parse_catalog, Catalog, Item, ParseResult};
pub use loader::{http_client, load, CatalogSource, MAX_CATALOG_SIZE};

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Document exceeded the size limit
    #[error("Catalog too large (limit {limit} bytes)")]
    TooLarge { limit: usize },
    /// Response was cut short of its Content-Length
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Local catalog file could not be read
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Document is not a JSON array
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The location string could not be interpreted
    #[error("Invalid catalog location: {0}")]
    InvalidSource(String),
}
