//! Classifier stage of the pipeline.

use serde::{Deserialize, Serialize};

use super::centroid::NearestCentroid;
use super::config::{ClassifierConfig, ClassifierKind};
use super::logistic::LogisticRegression;
use super::tfidf::SparseVector;
use crate::error::{ParlanceError, Result};

/// Intent classifier trait.
///
/// Implementations map a TF-IDF feature vector to one of the labels seen
/// during fitting. Only some of them can report a probability distribution.
pub trait IntentClassifier: Send + Sync {
    /// Predict the label for a feature vector.
    fn predict(&self, features: &SparseVector) -> Result<String>;

    /// Class probabilities, parallel to [`IntentClassifier::labels`].
    ///
    /// `None` when the classifier does not model probabilities.
    fn predict_proba(&self, _features: &SparseVector) -> Option<Vec<f64>> {
        None
    }

    /// Known labels, sorted.
    fn labels(&self) -> &[String];

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}

/// Outcome of fitting a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitStats {
    /// Optimization iterations performed.
    pub iterations: usize,
    /// Objective value at the end, if the classifier has one.
    pub final_loss: Option<f64>,
    /// Whether the stopping tolerance was reached.
    pub converged: bool,
}

/// The fitted classifier, in a form that can be persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifierStage {
    /// Multinomial logistic regression.
    Logistic(LogisticRegression),
    /// Nearest centroid.
    Centroid(NearestCentroid),
}

impl ClassifierStage {
    /// Fit the classifier selected by `config.kind`.
    pub fn fit(
        config: &ClassifierConfig,
        features: &[SparseVector],
        labels: &[String],
        n_features: usize,
    ) -> Result<(Self, FitStats)> {
        match config.kind {
            ClassifierKind::Logistic => {
                let (model, stats) = LogisticRegression::fit(config, features, labels, n_features)?;
                Ok((ClassifierStage::Logistic(model), stats))
            }
            ClassifierKind::Centroid => {
                let (model, stats) = NearestCentroid::fit(features, labels, n_features)?;
                Ok((ClassifierStage::Centroid(model), stats))
            }
        }
    }

    /// Borrow the stage through the common trait.
    pub fn as_classifier(&self) -> &dyn IntentClassifier {
        match self {
            ClassifierStage::Logistic(model) => model as &dyn IntentClassifier,
            ClassifierStage::Centroid(model) => model as &dyn IntentClassifier,
        }
    }

    /// Which kind of classifier this is.
    pub fn kind(&self) -> ClassifierKind {
        match self {
            ClassifierStage::Logistic(_) => ClassifierKind::Logistic,
            ClassifierStage::Centroid(_) => ClassifierKind::Centroid,
        }
    }

    /// Check that a decoded stage is internally consistent.
    pub fn validate(&self) -> Result<()> {
        match self {
            ClassifierStage::Logistic(model) => model.validate(),
            ClassifierStage::Centroid(model) => model.validate(),
        }
    }

    /// Input dimension the stage was fitted on.
    pub fn n_features(&self) -> usize {
        match self {
            ClassifierStage::Logistic(model) => model.n_features(),
            ClassifierStage::Centroid(model) => model.n_features(),
        }
    }
}

/// Index of the first maximum.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Shape check shared by the dense-row classifiers: at least two classes,
/// one row per class, every row `n_features` wide.
pub(crate) fn check_rows(
    name: &str,
    classes: &[String],
    rows: &[Vec<f64>],
    n_features: usize,
) -> Result<()> {
    if classes.len() < 2 {
        return Err(ParlanceError::load(format!(
            "{name} has {} classes, need at least 2",
            classes.len()
        )));
    }
    if rows.len() != classes.len() {
        return Err(ParlanceError::load(format!(
            "{name} has {} rows for {} classes",
            rows.len(),
            classes.len()
        )));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
        return Err(ParlanceError::load(format!(
            "{name} row {i} has {} values, expected {n_features}",
            row.len()
        )));
    }
    Ok(())
}

/// Sorted distinct labels and each sample's class index.
pub(crate) fn encode_labels(labels: &[String]) -> (Vec<String>, Vec<usize>) {
    let mut classes: Vec<String> = labels.to_vec();
    classes.sort();
    classes.dedup();
    let targets = labels
        .iter()
        .map(|l| classes.binary_search(l).unwrap_or_default())
        .collect();
    (classes, targets)
}
