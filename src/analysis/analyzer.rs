//! Analyzers that turn normalized text into feature terms.
//!
//! ```text
//! Normalized Text → Analyzer → Token Stream → Vectorizer
//!                     ↓
//!                 Tokenizer
//!                     ↓
//!                 Filter 1 .. Filter N
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

pub mod pipeline;

pub use pipeline::PipelineAnalyzer;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so a fitted vectorizer can be shared
/// across threads.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &str;
}
