//! Locale-independent title collation.
//!
//! Three comparison levels, each consulted only when the previous ties:
//! base letters (accents and case ignored), then accents, then case with
//! lowercase first. "apple" < "Banana", "resume" < "résumé", "chess" < "Chess".

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Precomputed sort key for a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    base: String,
    accents: String,
    case: Vec<u8>,
}

impl CollationKey {
    pub fn new(s: &str) -> Self {
        let decomposed: Vec<char> = s.nfd().collect();

        let base = decomposed
            .iter()
            .filter(|c| !is_combining_mark(**c))
            .flat_map(|c| c.to_lowercase())
            .collect();
        let accents = decomposed.iter().flat_map(|c| c.to_lowercase()).collect();
        let case = decomposed
            .iter()
            .filter(|c| !is_combining_mark(**c))
            .map(|c| u8::from(c.is_uppercase()))
            .collect();

        Self {
            base,
            accents,
            case,
        }
    }
}
