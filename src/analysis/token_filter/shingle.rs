//! Word n-gram (shingle) filter.
//!
//! Turns the incoming word tokens into every contiguous run of `min_size` to
//! `max_size` words joined by a single space. All unigrams come first, then
//! all bigrams, and so on.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{ParlanceError, Result};

/// A filter that emits word n-grams over the non-stopped tokens of a stream.
///
/// # Examples
///
/// ```
/// use parlance::analysis::token_filter::Filter;
/// use parlance::analysis::token_filter::shingle::ShingleFilter;
/// use parlance::analysis::token::Token;
///
/// let filter = ShingleFilter::new(1, 2).unwrap();
/// let tokens = vec![Token::new("games", 0), Token::new("list", 1)];
/// let texts: Vec<String> = filter.filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
///
/// assert_eq!(texts, vec!["games", "list", "games list"]);
/// ```
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    /// Smallest n-gram size
    min_size: usize,
    /// Largest n-gram size
    max_size: usize,
}

impl ShingleFilter {
    /// Create a new shingle filter.
    ///
    /// Fails if `min_size` is 0 or `max_size < min_size`.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 {
            return Err(ParlanceError::analysis("min_size must be at least 1"));
        }
        if max_size < min_size {
            return Err(ParlanceError::analysis(format!(
                "max_size ({max_size}) must be >= min_size ({min_size})"
            )));
        }
        Ok(Self { min_size, max_size })
    }

    /// Get the `(min, max)` n-gram range.
    pub fn range(&self) -> (usize, usize) {
        (self.min_size, self.max_size)
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words: Vec<Token> = tokens.filter(|t| !t.is_stopped()).collect();
        let mut shingles = Vec::new();
        let mut position = 0;

        for size in self.min_size..=self.max_size {
            if size > words.len() {
                break;
            }
            for window in words.windows(size) {
                let text = window
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let start = window[0].start_offset;
                let end = window[size - 1].end_offset;
                shingles.push(Token::with_offsets(text, position, start, end));
                position += 1;
            }
        }

        Ok(Box::new(shingles.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}
