//! Text analysis for Parlance.
//!
//! Two stages live here. The [`normalizer`] rewrites raw utterances into the
//! canonical form shared by training and resolution. [`analyzer`] pipelines
//! then split normalized text into the terms a vectorizer counts.

pub mod analyzer;
pub mod char_filter;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
