use futures::StreamExt;
use reqwest::redirect::Policy;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use super::item::{parse_catalog, Catalog, ParseResult};
use super::CatalogError;

/// Largest catalog document accepted, from disk or network.
pub const MAX_CATALOG_SIZE: usize = 10 * 1024 * 1024; // 10MB

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Catalog Source
// ============================================================================

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Http(Url),
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a user-supplied location.
    ///
    /// `http://` and `https://` strings become [`CatalogSource::Http`],
    /// `file://` URLs and everything else are treated as filesystem paths.
    pub fn parse(location: &str) -> Result<Self, CatalogError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(CatalogError::InvalidSource(
                "catalog location is empty".to_string(),
            ));
        }

        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(location)
                .map_err(|e| CatalogError::InvalidSource(format!("{}: {}", location, e)))?;
            return Ok(Self::Http(url));
        }

        if lower.starts_with("file://") {
            let url = Url::parse(location)
                .map_err(|e| CatalogError::InvalidSource(format!("{}: {}", location, e)))?;
            let path = url.to_file_path().map_err(|_| {
                CatalogError::InvalidSource(format!("{}: not a local file URL", location))
            })?;
            return Ok(Self::File(path));
        }

        Ok(Self::File(PathBuf::from(location)))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Redirect policy: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Build the HTTP client used for the catalog fetch.
pub fn http_client() -> Result<reqwest::Client, CatalogError> {
    let client = reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("gamedeck/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

// ============================================================================
// Loading
// ============================================================================

/// Load and decode the catalog. Attempted exactly once; there are no retries.
///
/// HTTP catalogs remember their URL so relative item links resolve against it.
///
/// # Errors
///
/// - [`CatalogError::Network`] / [`CatalogError::Timeout`] - transport failures
/// - [`CatalogError::HttpStatus`] - any non-2xx response
/// - [`CatalogError::TooLarge`] - document over [`MAX_CATALOG_SIZE`]
/// - [`CatalogError::Io`] - the file could not be read
/// - [`CatalogError::Parse`] - the document is not a JSON array
pub async fn load(
    source: &CatalogSource,
    client: &reqwest::Client,
) -> Result<Catalog, CatalogError> {
    let bytes = match source {
        CatalogSource::Http(url) => fetch_bytes(client, url).await?,
        CatalogSource::File(path) => read_file(path).await?,
    };

    let ParseResult { items, skipped } = parse_catalog(&bytes)?;
    if skipped > 0 {
        tracing::warn!(
            source = %source,
            skipped = skipped,
            "Catalog records that are not objects with a string title and url were skipped"
        );
    }

    let catalog = Catalog::new(items);
    let catalog = match source {
        CatalogSource::Http(url) => catalog.with_base_url(url.clone()),
        CatalogSource::File(_) => catalog,
    };

    tracing::info!(
        source = %source,
        items = catalog.len(),
        tags = catalog.tags().len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

async fn fetch_bytes(client: &reqwest::Client, url: &Url) -> Result<Vec<u8>, CatalogError> {
    let response = tokio::time::timeout(REQUEST_TIMEOUT, client.get(url.clone()).send())
        .await
        .map_err(|_| CatalogError::Timeout)??;

    if !response.status().is_success() {
        return Err(CatalogError::HttpStatus(response.status().as_u16()));
    }

    read_limited_bytes(response, MAX_CATALOG_SIZE).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(CatalogError::TooLarge { limit });
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::TooLarge { limit });
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(CatalogError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

async fn read_file(path: &Path) -> Result<Vec<u8>, CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    if metadata.len() > MAX_CATALOG_SIZE as u64 {
        return Err(CatalogError::TooLarge {
            limit: MAX_CATALOG_SIZE,
        });
    }

    tokio::fs::read(path).await.map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CATALOG: &str = r#"[
        {"title": "Chess", "tags": ["strategy"], "url": "/games/chess/", "popularity": 5},
        {"title": "Snake", "tags": ["arcade"], "url": "https://cdn.example.com/snake", "popularity": 9}
    ]"#;

    #[test]
    fn test_parse_http_source() {
        let source = CatalogSource::parse("https://example.com/games.json").unwrap();
        assert!(matches!(source, CatalogSource::Http(_)));
        assert_eq!(source.to_string(), "https://example.com/games.json");
    }

    #[test]
    fn test_parse_path_source() {
        let source = CatalogSource::parse("./games.json").unwrap();
        assert_eq!(source, CatalogSource::File(PathBuf::from("./games.json")));
    }

    #[test]
    fn test_parse_file_url_source() {
        let source = CatalogSource::parse("file:///tmp/games.json").unwrap();
        assert_eq!(source, CatalogSource::File(PathBuf::from("/tmp/games.json")));
    }

    #[test]
    fn test_parse_empty_source_rejected() {
        assert!(matches!(
            CatalogSource::parse("   "),
            Err(CatalogError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_parse_bad_http_url_rejected() {
        assert!(CatalogSource::parse("http://").is_err());
    }

    #[tokio::test]
    async fn test_http_load_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(CATALOG)
                    .insert_header("Content-Type", "application/json"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let source =
            CatalogSource::parse(&format!("{}/games.json", mock_server.uri())).unwrap();
        let client = http_client().unwrap();

        let catalog = load(&source, &client).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.tags(), ["arcade", "strategy"]);

        // Relative link resolves against the server the catalog came from
        let chess = catalog.get(0).unwrap();
        assert_eq!(
            catalog.resolve_link(chess).unwrap().as_str(),
            format!("{}/games/chess/", mock_server.uri())
        );
    }

    #[tokio::test]
    async fn test_http_404_fails_without_retry() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source =
            CatalogSource::parse(&format!("{}/games.json", mock_server.uri())).unwrap();
        let client = http_client().unwrap();

        match load(&source, &client).await {
            Err(CatalogError::HttpStatus(404)) => {}
            other => panic!("Expected HttpStatus(404), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_server_error_attempted_once() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source =
            CatalogSource::parse(&format!("{}/games.json", mock_server.uri())).unwrap();
        let client = http_client().unwrap();

        let result = load(&source, &client).await;
        assert!(matches!(result, Err(CatalogError::HttpStatus(503))));
    }

    #[tokio::test]
    async fn test_http_invalid_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let source =
            CatalogSource::parse(&format!("{}/games.json", mock_server.uri())).unwrap();
        let client = http_client().unwrap();

        let result = load(&source, &client).await;
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_http_oversized_body_rejected() {
        let mock_server = MockServer::start().await;
        let body = vec![b' '; MAX_CATALOG_SIZE + 1];
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&mock_server)
            .await;

        let source =
            CatalogSource::parse(&format!("{}/games.json", mock_server.uri())).unwrap();
        let client = http_client().unwrap();

        let result = load(&source, &client).await;
        assert!(matches!(result, Err(CatalogError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_file_load_success() {
        let dir = std::env::temp_dir().join("gamedeck_loader_test_file");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("games.json");
        std::fs::write(&path, CATALOG).unwrap();

        let client = http_client().unwrap();
        let catalog = load(&CatalogSource::File(path), &client).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.base_url().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let client = http_client().unwrap();
        let source = CatalogSource::File(PathBuf::from("/tmp/gamedeck_no_such_catalog.json"));

        let err = load(&source, &client).await.unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("gamedeck_no_such_catalog.json"));
    }
}
