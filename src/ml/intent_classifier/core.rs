//! Helper functions for the two core operations.

use std::path::Path;

use crate::error::Result;
use crate::ml::intent_classifier::config::TrainerConfig;
use crate::ml::intent_classifier::corpus::Corpus;
use crate::ml::intent_classifier::resolver::IntentResolver;
use crate::ml::intent_classifier::trainer::{Trainer, TrainingSummary};

/// Load and filter a training corpus from a JSON file.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    Corpus::load(path)
}

/// Train a model from a labeled corpus and persist it.
pub fn train(config: TrainerConfig) -> Result<TrainingSummary> {
    Trainer::new(config)?.run()
}

/// Create a resolver backed by the artifact at `path`.
pub fn load_resolver<P: AsRef<Path>>(path: P) -> Result<IntentResolver> {
    IntentResolver::from_artifact(path)
}
