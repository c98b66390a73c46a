//! Offline training: split, fit, evaluate, persist.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::classifier::FitStats;
use super::config::{ClassifierKind, TrainerConfig};
use super::corpus::Corpus;
use super::metrics::{ClassificationReport, classification_report};
use super::pipeline::Pipeline;
use super::types::IntentSample;
use crate::error::{ParlanceError, Result};

/// Shuffle `items` with a seeded RNG and split off a test set.
///
/// The test set holds `ceil(test_size * n)` items; the order of both halves
/// follows the shuffled permutation. The same seed always gives the same
/// split.
pub fn train_test_split<T: Clone>(items: &[T], test_size: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((test_size * items.len() as f64).ceil() as usize).min(items.len());
    let (test_idx, train_idx) = indices.split_at(n_test);
    let pick = |idx: &[usize]| idx.iter().map(|&i| items[i].clone()).collect::<Vec<T>>();
    (pick(train_idx), pick(test_idx))
}

/// Everything a training run reports.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    /// Samples retained after filtering.
    pub n_samples: usize,
    /// Samples used for fitting.
    pub n_train: usize,
    /// Held-out samples.
    pub n_test: usize,
    /// Labels the classifier learned.
    pub labels: Vec<String>,
    /// Vocabulary size after `min_df` pruning.
    pub vocabulary_size: usize,
    /// Classifier type.
    pub classifier: ClassifierKind,
    /// Optimization outcome.
    pub fit: FitStats,
    /// Held-out evaluation.
    pub report: ClassificationReport,
    /// Held-out normalized texts.
    pub test_texts: Vec<String>,
    /// Held-out true labels.
    pub test_labels: Vec<String>,
    /// Held-out predictions, parallel to `test_texts`.
    pub test_predictions: Vec<String>,
    /// Where the artifact was written, if it was.
    pub model_path: Option<PathBuf>,
}

/// Runs the training procedure described by a [`TrainerConfig`].
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Create a trainer after validating the configuration.
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Load the corpus, train, evaluate, and save the artifact.
    ///
    /// Any existing file at the model path is overwritten.
    pub fn run(&self) -> Result<TrainingSummary> {
        let corpus = Corpus::load(&self.config.corpus_path)?;
        let (pipeline, mut summary) = self.train_on(&corpus)?;
        pipeline.save(&self.config.model_path)?;
        summary.model_path = Some(self.config.model_path.clone());
        Ok(summary)
    }

    /// Train and evaluate on an in-memory corpus without touching disk.
    pub fn train_on(&self, corpus: &Corpus) -> Result<(Pipeline, TrainingSummary)> {
        log::info!("Loaded {} training samples", corpus.len());

        let labels = corpus.labels();
        if labels.len() < 2 {
            return Err(ParlanceError::training(format!(
                "need at least 2 distinct labels, found {}",
                labels.len()
            )));
        }

        let (train, test) =
            train_test_split(corpus.samples(), self.config.test_size, self.config.seed);
        let train_labels: BTreeSet<&str> = train.iter().map(|s| s.intent.as_str()).collect();
        if train_labels.len() < 2 {
            return Err(ParlanceError::training(format!(
                "training split has {} distinct labels, need at least 2",
                train_labels.len()
            )));
        }
        log::info!("Split: {} train, {} test", train.len(), test.len());

        let (train_texts, train_y) = unzip_samples(&train);
        let (test_texts, test_labels) = unzip_samples(&test);

        let (pipeline, fit) = Pipeline::fit(
            &self.config.vectorizer,
            &self.config.classifier,
            &train_texts,
            &train_y,
        )?;
        let test_predictions = pipeline.predict_batch(&test_texts)?;
        let report = classification_report(&test_labels, &test_predictions);
        log::info!("Held-out accuracy: {:.3}", report.accuracy);

        let summary = TrainingSummary {
            n_samples: corpus.len(),
            n_train: train.len(),
            n_test: test.len(),
            labels: pipeline.labels().to_vec(),
            vocabulary_size: pipeline.vectorizer().vocabulary_size(),
            classifier: self.config.classifier.kind,
            fit,
            report,
            test_texts,
            test_labels,
            test_predictions,
            model_path: None,
        };
        Ok((pipeline, summary))
    }
}

fn unzip_samples(samples: &[IntentSample]) -> (Vec<String>, Vec<String>) {
    samples
        .iter()
        .map(|s| (s.text.clone(), s.intent.clone()))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::intent_classifier::corpus::CorpusRecord;
    use serde_json::json;

    fn corpus(rows: &[(&str, &str)]) -> Corpus {
        Corpus::from_records(rows.iter().map(|(text, intent)| CorpusRecord {
            text: json!(text),
            intent: json!(intent),
            training: None,
        }))
    }

    #[test]
    fn test_split_sizes_and_determinism() {
        let items: Vec<usize> = (0..10).collect();
        let (train, test) = train_test_split(&items, 0.2, 42);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
        assert_eq!(train_test_split(&items, 0.2, 42), (train.clone(), test.clone()));

        let mut all: Vec<usize> = train.into_iter().chain(test).collect();
        all.sort();
        assert_eq!(all, items);
    }

    #[test]
    fn test_split_rounds_test_size_up() {
        let items: Vec<usize> = (0..11).collect();
        let (train, test) = train_test_split(&items, 0.2, 0);
        assert_eq!((train.len(), test.len()), (8, 3));
    }

    #[test]
    fn test_single_label_is_training_error() {
        let trainer = Trainer::new(TrainerConfig::default()).unwrap();
        let corpus = corpus(&[("stop it", "stop"), ("stop now", "stop"), ("halt", "stop")]);
        assert!(matches!(
            trainer.train_on(&corpus),
            Err(ParlanceError::Training(_))
        ));
    }

    #[test]
    fn test_train_on_reports_held_out_predictions() {
        let rows = [
            ("list the games", "listOfGames"),
            ("what games are there", "listOfGames"),
            ("show games list", "listOfGames"),
            ("which games can I play", "listOfGames"),
            ("list available games", "listOfGames"),
            ("games list please", "listOfGames"),
            ("how many times played", "timesPlayed"),
            ("times played so far", "timesPlayed"),
            ("count times played", "timesPlayed"),
            ("number of times played", "timesPlayed"),
            ("played how many times", "timesPlayed"),
            ("times I played", "timesPlayed"),
        ];
        let trainer = Trainer::new(TrainerConfig::default()).unwrap();
        let (pipeline, summary) = trainer.train_on(&corpus(&rows)).unwrap();

        assert_eq!(summary.n_samples, 12);
        assert_eq!(summary.n_test, 3);
        assert_eq!(summary.n_train, 9);
        assert_eq!(summary.test_predictions.len(), summary.test_texts.len());
        assert_eq!(
            pipeline.predict_batch(&summary.test_texts).unwrap(),
            summary.test_predictions
        );
        assert!(summary.model_path.is_none());
        assert_eq!(summary.report.weighted_avg.support, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrainerConfig {
            test_size: 0.0,
            ..TrainerConfig::default()
        };
        assert!(matches!(
            Trainer::new(config),
            Err(ParlanceError::InvalidConfig(_))
        ));
    }
}
