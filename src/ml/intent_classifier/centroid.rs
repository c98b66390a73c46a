//! Nearest-centroid intent classifier.

use serde::{Deserialize, Serialize};

use super::classifier::{FitStats, IntentClassifier, argmax, check_rows, encode_labels};
use super::tfidf::SparseVector;
use crate::error::{ParlanceError, Result};

/// Assigns the label whose mean training vector is most cosine-similar.
///
/// Scores are similarities, not probabilities, so
/// [`IntentClassifier::predict_proba`] returns `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroid {
    classes: Vec<String>,
    /// Unit-length centroid per class.
    centroids: Vec<Vec<f64>>,
    n_features: usize,
}

impl NearestCentroid {
    /// Average the vectors of each class.
    pub fn fit(
        features: &[SparseVector],
        labels: &[String],
        n_features: usize,
    ) -> Result<(Self, FitStats)> {
        if features.len() != labels.len() {
            return Err(ParlanceError::training(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let (classes, targets) = encode_labels(labels);
        if classes.len() < 2 {
            return Err(ParlanceError::training(format!(
                "nearest centroid needs at least 2 classes, got {}",
                classes.len()
            )));
        }

        let mut centroids = vec![vec![0.0; n_features]; classes.len()];
        let mut counts = vec![0usize; classes.len()];
        for (x, &y) in features.iter().zip(&targets) {
            counts[y] += 1;
            for (i, v) in x.iter() {
                centroids[y][i] += v;
            }
        }

        for (centroid, &count) in centroids.iter_mut().zip(&counts) {
            let norm = centroid.iter().map(|v| v * v).sum::<f64>().sqrt();
            if count > 0 && norm > 0.0 {
                centroid.iter_mut().for_each(|v| *v /= norm);
            }
        }

        let stats = FitStats {
            iterations: 1,
            final_loss: None,
            converged: true,
        };
        Ok((
            Self {
                classes,
                centroids,
                n_features,
            },
            stats,
        ))
    }

    /// Cosine similarity of the input to every centroid.
    pub fn similarities(&self, features: &SparseVector) -> Vec<f64> {
        let norm = features.norm();
        self.centroids
            .iter()
            .map(|c| {
                if norm > 0.0 {
                    features.dot(c) / norm
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Input dimension.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Reject centroids whose shapes disagree with the classes.
    pub fn validate(&self) -> Result<()> {
        check_rows("nearest centroid", &self.classes, &self.centroids, self.n_features)
    }
}

impl IntentClassifier for NearestCentroid {
    fn predict(&self, features: &SparseVector) -> Result<String> {
        argmax(&self.similarities(features))
            .map(|i| self.classes[i].clone())
            .ok_or_else(|| ParlanceError::prediction("model has no classes"))
    }

    fn labels(&self) -> &[String] {
        &self.classes
    }

    fn name(&self) -> &str {
        "nearest_centroid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sv(pairs: &[(usize, f64)]) -> SparseVector {
        SparseVector {
            indices: pairs.iter().map(|p| p.0).collect(),
            values: pairs.iter().map(|p| p.1).collect(),
        }
    }

    #[test]
    fn test_nearest_centroid() {
        let features = vec![sv(&[(0, 1.0)]), sv(&[(0, 0.6), (1, 0.8)]), sv(&[(2, 1.0)])];
        let labels: Vec<String> = ["games", "games", "volume"].iter().map(|s| s.to_string()).collect();
        let (model, stats) = NearestCentroid::fit(&features, &labels, 3).unwrap();

        assert!(stats.converged);
        assert_eq!(stats.final_loss, None);
        assert_eq!(model.predict(&sv(&[(1, 1.0)])).unwrap(), "games");
        assert_eq!(model.predict(&sv(&[(2, 1.0)])).unwrap(), "volume");
        assert_eq!(model.predict_proba(&sv(&[(2, 1.0)])), None);
        assert_eq!(model.name(), "nearest_centroid");
    }

    #[test]
    fn test_validate_shapes() {
        let labels: Vec<String> = ["games", "volume"].iter().map(|s| s.to_string()).collect();
        let (model, _) = NearestCentroid::fit(&[sv(&[(0, 1.0)]), sv(&[(1, 1.0)])], &labels, 2).unwrap();
        assert!(model.validate().is_ok());

        let mut missing_row = model.clone();
        missing_row.centroids.pop();
        assert!(matches!(missing_row.validate(), Err(ParlanceError::Load(_))));

        let mut wide_row = model;
        wide_row.centroids[1].push(0.0);
        assert!(matches!(wide_row.validate(), Err(ParlanceError::Load(_))));
    }

    #[test]
    fn test_single_class_is_training_error() {
        let labels = vec!["stop".to_string()];
        let result = NearestCentroid::fit(&[sv(&[(0, 1.0)])], &labels, 1);
        assert!(matches!(result, Err(ParlanceError::Training(_))));
    }
}
