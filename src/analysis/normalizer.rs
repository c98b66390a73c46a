//! Shared text normalization.
//!
//! Training and resolution both run raw utterances through [`normalize`]
//! before vectorization. Features are only valid when both sides use this
//! exact routine, so it is the single entry point for either path.
//!
//! The transformation is:
//!
//! 1. Unicode lowercasing
//! 2. every run of characters that are neither word characters nor
//!    whitespace becomes one space
//! 3. whitespace runs collapse to a single space
//! 4. leading and trailing whitespace is trimmed
//!
//! Stop words are left in place; the vectorizer's analyzer removes them.
//!
//! # Examples
//!
//! ```
//! use parlance::analysis::normalizer::normalize;
//!
//! assert_eq!(normalize("  Show me the GAMES-list!! "), "show me the games list");
//! assert_eq!(normalize(&normalize("What's up?")), normalize("What's up?"));
//! ```

use std::sync::{Arc, LazyLock};

use crate::analysis::char_filter::{CharFilter, LowercaseCharFilter, PatternReplaceCharFilter};
use crate::error::Result;

const PUNCTUATION_PATTERN: &str = r"[^\w\s]+";
const WHITESPACE_PATTERN: &str = r"\s+";

static DEFAULT_NORMALIZER: LazyLock<TextNormalizer> = LazyLock::new(TextNormalizer::default);

/// Normalize raw text with the process-wide default [`TextNormalizer`].
pub fn normalize(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

/// A chain of char filters followed by a trim.
#[derive(Clone)]
pub struct TextNormalizer {
    char_filters: Vec<Arc<dyn CharFilter>>,
}

impl TextNormalizer {
    /// Create the standard normalizer used for training and resolution.
    pub fn new() -> Result<Self> {
        Ok(Self {
            char_filters: vec![
                Arc::new(LowercaseCharFilter::new()),
                Arc::new(PatternReplaceCharFilter::new(PUNCTUATION_PATTERN, " ")?),
                Arc::new(PatternReplaceCharFilter::new(WHITESPACE_PATTERN, " ")?),
            ],
        })
    }

    /// Normalize a single string.
    pub fn normalize(&self, text: &str) -> String {
        let filtered = self
            .char_filters
            .iter()
            .fold(text.to_string(), |acc, filter| filter.filter(&acc));
        filtered.trim().to_string()
    }

    /// Get the char filters applied by this normalizer, in order.
    pub fn char_filters(&self) -> &[Arc<dyn CharFilter>] {
        &self.char_filters
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("Default normalization patterns should be valid")
    }
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field(
                "char_filters",
                &self
                    .char_filters
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_punctuation_and_case() {
        assert_eq!(normalize("Turn the Volume UP!!!"), "turn the volume up");
        assert_eq!(normalize("stop.the,game"), "stop the game");
        assert_eq!(normalize("\tplay\n\nanother   game  "), "play another game");
    }

    #[test]
    fn test_normalize_keeps_underscores_and_digits() {
        assert_eq!(normalize("level_2 game #3"), "level_2 game 3");
    }

    #[test]
    fn test_normalize_empty_results() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "How many games have I played?",
            "  VOLUME -- down, please ",
            "Ça va? Très bien!",
            "yes!!!",
            "",
            "don't stop",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_custom_instance_matches_default() {
        let normalizer = TextNormalizer::new().unwrap();
        assert_eq!(normalizer.normalize("Next Game, please"), normalize("Next Game, please"));
        assert_eq!(normalizer.char_filters().len(), 3);
    }
}
