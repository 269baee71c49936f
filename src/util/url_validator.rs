use thiserror::Error;
use url::Url;

/// Why a link may not be handed to the system opener.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Accept only `http`/`https` URLs for `open::that`.
///
/// `open` passes its argument to the platform opener (`xdg-open`, `open`,
/// `start`), which will happily launch `file:` or custom-scheme handlers;
/// catalog links are untrusted, so anything else is refused. Unlike catalog
/// fetching there is no private-address check: the user's browser may
/// legitimately reach a LAN host.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
