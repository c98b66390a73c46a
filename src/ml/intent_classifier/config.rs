//! Training configuration.
//!
//! All structs use `#[serde(default)]`, so a JSON config file only needs the
//! keys it wants to change.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{ParlanceError, Result};

/// Vectorizer hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Inclusive `(min, max)` word n-gram sizes.
    pub ngram_range: (usize, usize),
    /// Minimum number of training documents a term must appear in.
    pub min_df: usize,
    /// Remove English stop words before building n-grams.
    pub stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            min_df: 2,
            stop_words: true,
        }
    }
}

/// Which classifier the pipeline fits.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Multinomial logistic regression; exposes probabilities.
    Logistic,
    /// Nearest centroid by cosine similarity; no probabilities.
    Centroid,
}

/// Classifier hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Classifier type.
    pub kind: ClassifierKind,
    /// Maximum gradient descent iterations.
    pub max_iter: usize,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Stop once every gradient component is below this value.
    pub tol: f64,
    /// Inverse L2 regularization strength.
    pub c: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::Logistic,
            max_iter: 2000,
            learning_rate: 1.0,
            tol: 1e-4,
            c: 1.0,
        }
    }
}

/// Configuration of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Labeled corpus (JSON with a `sentences` array).
    pub corpus_path: PathBuf,
    /// Where the fitted pipeline is written.
    pub model_path: PathBuf,
    /// Fraction of examples held out for evaluation.
    pub test_size: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    /// Vectorizer settings.
    pub vectorizer: VectorizerConfig,
    /// Classifier settings.
    pub classifier: ClassifierConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("data/intent-corpus-basic.json"),
            model_path: PathBuf::from("chatbot_model.bin"),
            test_size: 0.2,
            seed: 42,
            vectorizer: VectorizerConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: TrainerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ParlanceError::invalid_config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }

        let (min_n, max_n) = self.vectorizer.ngram_range;
        if min_n == 0 || max_n < min_n {
            return Err(ParlanceError::invalid_config(format!(
                "ngram_range must satisfy 1 <= min <= max, got ({min_n}, {max_n})"
            )));
        }
        if self.vectorizer.min_df == 0 {
            return Err(ParlanceError::invalid_config("min_df must be at least 1"));
        }

        let classifier = &self.classifier;
        if classifier.max_iter == 0 {
            return Err(ParlanceError::invalid_config("max_iter must be at least 1"));
        }
        if classifier.learning_rate <= 0.0 || !classifier.learning_rate.is_finite() {
            return Err(ParlanceError::invalid_config(
                "learning_rate must be a positive number",
            ));
        }
        if classifier.c <= 0.0 || !classifier.c.is_finite() {
            return Err(ParlanceError::invalid_config("c must be a positive number"));
        }
        if classifier.tol < 0.0 {
            return Err(ParlanceError::invalid_config("tol must not be negative"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainerConfig::default();
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.vectorizer.ngram_range, (1, 2));
        assert_eq!(config.vectorizer.min_df, 2);
        assert_eq!(config.classifier.max_iter, 2000);
        assert_eq!(config.classifier.kind, ClassifierKind::Logistic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: TrainerConfig =
            serde_json::from_str(r#"{"seed": 7, "classifier": {"kind": "centroid"}}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.classifier.kind, ClassifierKind::Centroid);
        assert_eq!(config.classifier.max_iter, 2000);
        assert_eq!(config.vectorizer, VectorizerConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TrainerConfig::default();
        config.test_size = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ParlanceError::InvalidConfig(_))
        ));

        let mut config = TrainerConfig::default();
        config.vectorizer.ngram_range = (2, 1);
        assert!(config.validate().is_err());

        let mut config = TrainerConfig::default();
        config.classifier.c = 0.0;
        assert!(config.validate().is_err());
    }
}
