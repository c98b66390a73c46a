//! Machine learning components of Parlance.
//!
//! Everything statistical lives under [`intent_classifier`]: the corpus
//! loader, the TF-IDF vectorizer, the classifiers, the trainer that fits and
//! persists a pipeline, and the resolver that serves it next to the rule
//! table.

pub mod intent_classifier;
