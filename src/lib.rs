//! # Parlance
//!
//! Hybrid rule-based and statistical intent classification for short
//! utterances.
//!
//! ## Features
//!
//! - Ordered keyword rules that short-circuit known phrasings
//! - TF-IDF (unigram + bigram) features over a shared text normalizer
//! - Multinomial logistic regression or nearest-centroid classifiers
//! - A single binary artifact holding the fitted pipeline
//! - A CLI with `train`, `predict` and `chat` commands

pub mod analysis;
pub mod cli;
pub mod error;
pub mod ml;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
