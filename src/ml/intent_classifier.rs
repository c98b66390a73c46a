//! Hybrid rule-based and statistical intent classification.
//!
//! # Architecture
//!
//! - [`RuleTable`]: ordered keyword rules consulted before any model
//! - [`Corpus`]: filtered, normalized training examples loaded from JSON
//! - [`TfIdfVectorizer`]: unigram + bigram TF-IDF features
//! - [`IntentClassifier`]: common interface of the classifier stage, with
//!   [`LogisticRegression`] (exposes probabilities) and [`NearestCentroid`]
//!   (does not)
//! - [`Pipeline`]: the fitted vectorizer + classifier, saved as one artifact
//! - [`Trainer`]: split, fit, evaluate, persist
//! - [`IntentResolver`]: rules first, pipeline second
//!
//! # Example
//!
//! ```rust,no_run
//! use parlance::ml::intent_classifier::{IntentResolver, Trainer, TrainerConfig};
//!
//! # fn main() -> parlance::error::Result<()> {
//! let summary = Trainer::new(TrainerConfig::default())?.run()?;
//! println!("{}", summary.report);
//!
//! let resolver = IntentResolver::from_artifact("chatbot_model.bin")?;
//! let resolution = resolver.resolve("turn volume up")?;
//! assert_eq!(resolution.intent, "volumeUp");
//! assert_eq!(resolution.confidence, Some(1.0));
//! # Ok(())
//! # }
//! ```

mod centroid;
mod classifier;
mod config;
mod core;
mod corpus;
mod logistic;
mod metrics;
mod pipeline;
mod resolver;
mod rules;
mod tfidf;
mod trainer;
mod types;

// Public exports
pub use centroid::NearestCentroid;
pub use classifier::{ClassifierStage, FitStats, IntentClassifier};
pub use config::{ClassifierConfig, ClassifierKind, TrainerConfig, VectorizerConfig};
pub use core::{load_corpus, load_resolver, train};
pub use corpus::{Corpus, CorpusRecord};
pub use logistic::LogisticRegression;
pub use metrics::{Averages, ClassificationReport, LabelMetrics, classification_report};
pub use pipeline::Pipeline;
pub use resolver::IntentResolver;
pub use rules::{DEFAULT_RULES, Rule, RulePredicate, RuleTable};
pub use tfidf::{SparseVector, TfIdfVectorizer};
pub use trainer::{Trainer, TrainingSummary, train_test_split};
pub use types::{IntentSample, Resolution, ResolutionSource, UNKNOWN_INTENT};
