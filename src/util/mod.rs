//! Text and URL helpers shared by the renderer and input handling.
//!
//! - **Text**: Unicode-aware width, truncation, and control-character
//!   stripping for untrusted catalog strings.
//! - **URL validation**: the scheme check applied before a link is opened.
//!
//! ```
//! use gamedeck::util::{display_width, truncate_to_width};
//!
//! assert_eq!(display_width("Snake"), 5);
//! assert_eq!(truncate_to_width("Space Invaders", 8), "Space I…");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Longest search query the input line accepts.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
