//! Multinomial logistic regression.
//!
//! Minimizes the mean cross-entropy plus `||W||^2 / (2 C n)` by full-batch
//! gradient descent. The intercepts are not penalized. Optimization stops
//! when every gradient component is below `tol` or after `max_iter` steps.

use serde::{Deserialize, Serialize};

use super::classifier::{FitStats, IntentClassifier, argmax, check_rows, encode_labels};
use super::config::ClassifierConfig;
use super::tfidf::SparseVector;
use crate::error::{ParlanceError, Result};

/// Softmax regression over sparse TF-IDF features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    classes: Vec<String>,
    /// One dense weight row per class.
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    n_features: usize,
}

impl LogisticRegression {
    /// Fit on labeled feature vectors.
    ///
    /// Fails with a training error when fewer than two classes are present.
    pub fn fit(
        config: &ClassifierConfig,
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
                "logistic regression needs at least 2 classes, got {}",
                classes.len()
            )));
        }

        let n = features.len() as f64;
        let k = classes.len();
        let l2 = 1.0 / (config.c * n);

        let mut model = Self {
            classes,
            weights: vec![vec![0.0; n_features]; k],
            intercepts: vec![0.0; k],
            n_features,
        };

        let mut grad_w = vec![vec![0.0; n_features]; k];
        let mut grad_b = vec![0.0; k];
        let mut stats = FitStats {
            iterations: 0,
            final_loss: None,
            converged: false,
        };

        for iteration in 0..config.max_iter {
            for row in grad_w.iter_mut() {
                row.iter_mut().for_each(|g| *g = 0.0);
            }
            grad_b.iter_mut().for_each(|g| *g = 0.0);

            let mut loss = 0.0;
            for (x, &y) in features.iter().zip(&targets) {
                let probs = model.probabilities(x);
                loss -= probs[y].max(f64::MIN_POSITIVE).ln();
                for (c, p) in probs.iter().enumerate() {
                    let residual = p - if c == y { 1.0 } else { 0.0 };
                    grad_b[c] += residual;
                    for (i, v) in x.iter() {
                        grad_w[c][i] += residual * v;
                    }
                }
            }

            let penalty: f64 = model.weights.iter().flatten().map(|w| w * w).sum();
            loss = loss / n + 0.5 * l2 * penalty;

            let mut max_grad: f64 = 0.0;
            for c in 0..k {
                grad_b[c] /= n;
                max_grad = max_grad.max(grad_b[c].abs());
                for (g, w) in grad_w[c].iter_mut().zip(&model.weights[c]) {
                    *g = *g / n + l2 * w;
                    max_grad = max_grad.max(g.abs());
                }
            }

            stats.iterations = iteration + 1;
            stats.final_loss = Some(loss);
            if max_grad < config.tol {
                stats.converged = true;
                break;
            }

            for c in 0..k {
                model.intercepts[c] -= config.learning_rate * grad_b[c];
                for (w, g) in model.weights[c].iter_mut().zip(&grad_w[c]) {
                    *w -= config.learning_rate * g;
                }
            }
        }

        if stats.converged {
            log::info!(
                "Logistic regression converged after {} iterations",
                stats.iterations
            );
        } else {
            log::warn!(
                "Logistic regression did not converge within {} iterations",
                config.max_iter
            );
        }

        Ok((model, stats))
    }

    fn probabilities(&self, features: &SparseVector) -> Vec<f64> {
        let scores: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| features.dot(w) + b)
            .collect();
        softmax(&scores)
    }

    /// Input dimension.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Reject parameters whose shapes disagree.
    pub fn validate(&self) -> Result<()> {
        check_rows("logistic regression", &self.classes, &self.weights, self.n_features)?;
        if self.intercepts.len() != self.classes.len() {
            return Err(ParlanceError::load(format!(
                "logistic regression has {} intercepts for {} classes",
                self.intercepts.len(),
                self.classes.len()
            )));
        }
        Ok(())
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

impl IntentClassifier for LogisticRegression {
    fn predict(&self, features: &SparseVector) -> Result<String> {
        let probs = self.probabilities(features);
        argmax(&probs)
            .map(|i| self.classes[i].clone())
            .ok_or_else(|| ParlanceError::prediction("model has no classes"))
    }

    fn predict_proba(&self, features: &SparseVector) -> Option<Vec<f64>> {
        Some(self.probabilities(features))
    }

    fn labels(&self) -> &[String] {
        &self.classes
    }

    fn name(&self) -> &str {
        "logistic_regression"
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

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_separable_classes() {
        let features = vec![
            sv(&[(0, 1.0)]),
            sv(&[(0, 0.8), (2, 0.6)]),
            sv(&[(1, 1.0)]),
            sv(&[(1, 0.8), (2, 0.6)]),
        ];
        let y = labels(&["listOfGames", "listOfGames", "timesPlayed", "timesPlayed"]);
        let (model, stats) =
            LogisticRegression::fit(&ClassifierConfig::default(), &features, &y, 3).unwrap();

        assert!(stats.iterations > 0);
        assert!(stats.final_loss.unwrap() < std::f64::consts::LN_2);
        assert_eq!(model.predict(&sv(&[(0, 1.0)])).unwrap(), "listOfGames");
        assert_eq!(model.predict(&sv(&[(1, 1.0)])).unwrap(), "timesPlayed");

        let probs = model.predict_proba(&sv(&[(0, 1.0)])).unwrap();
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!(probs[0] > 0.5);
    }

    #[test]
    fn test_empty_vector_follows_class_prior() {
        let features = vec![sv(&[(0, 1.0)]), sv(&[(0, 1.0)]), sv(&[(1, 1.0)])];
        let y = labels(&["a", "a", "b"]);
        let (model, _) =
            LogisticRegression::fit(&ClassifierConfig::default(), &features, &y, 2).unwrap();
        assert_eq!(model.predict(&SparseVector::default()).unwrap(), "a");
    }

    #[test]
    fn test_single_class_is_training_error() {
        let features = vec![sv(&[(0, 1.0)]), sv(&[(0, 1.0)])];
        let y = labels(&["stop", "stop"]);
        let result = LogisticRegression::fit(&ClassifierConfig::default(), &features, &y, 1);
        assert!(matches!(result, Err(ParlanceError::Training(_))));
    }

    #[test]
    fn test_validate_shapes() {
        let features = vec![sv(&[(0, 1.0)]), sv(&[(1, 1.0)])];
        let (model, _) =
            LogisticRegression::fit(&ClassifierConfig::default(), &features, &labels(&["a", "b"]), 2)
                .unwrap();
        assert!(model.validate().is_ok());

        let mut short_rows = model.clone();
        short_rows.weights = vec![vec![], vec![]];
        assert!(matches!(short_rows.validate(), Err(ParlanceError::Load(_))));

        let mut extra_intercept = model.clone();
        extra_intercept.intercepts.push(0.0);
        assert!(matches!(extra_intercept.validate(), Err(ParlanceError::Load(_))));

        let mut one_class = model;
        one_class.classes.truncate(1);
        assert!(matches!(one_class.validate(), Err(ParlanceError::Load(_))));
    }

    #[test]
    fn test_iteration_cap() {
        let config = ClassifierConfig {
            max_iter: 3,
            tol: 0.0,
            ..ClassifierConfig::default()
        };
        let features = vec![sv(&[(0, 1.0)]), sv(&[(1, 1.0)])];
        let (_, stats) =
            LogisticRegression::fit(&config, &features, &labels(&["a", "b"]), 2).unwrap();
        assert_eq!(stats.iterations, 3);
        assert!(!stats.converged);
    }
}
