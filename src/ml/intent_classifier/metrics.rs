//! Held-out evaluation report.
//!
//! Per-label precision, recall and F1 plus accuracy, macro and weighted
//! averages. A ratio whose denominator is zero is reported as 0.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Scores for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMetrics {
    /// Label name.
    pub label: String,
    /// Correct predictions among predictions of this label.
    pub precision: f64,
    /// Correct predictions among true instances of this label.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Number of true instances.
    pub support: usize,
}

/// Averaged scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Averages {
    /// Average precision.
    pub precision: f64,
    /// Average recall.
    pub recall: f64,
    /// Average F1.
    pub f1: f64,
    /// Total support.
    pub support: usize,
}

/// Classification report over a set of predictions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// One row per label found in either truth or predictions, sorted.
    pub labels: Vec<LabelMetrics>,
    /// Fraction of exact matches.
    pub accuracy: f64,
    /// Unweighted mean over labels.
    pub macro_avg: Averages,
    /// Mean weighted by support.
    pub weighted_avg: Averages,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Build a report from parallel slices of true and predicted labels.
pub fn classification_report(y_true: &[String], y_pred: &[String]) -> ClassificationReport {
    let labels: BTreeSet<&str> = y_true
        .iter()
        .chain(y_pred.iter())
        .map(String::as_str)
        .collect();
    let pairs: Vec<(&str, &str)> = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t.as_str(), p.as_str()))
        .collect();

    let rows: Vec<LabelMetrics> = labels
        .into_iter()
        .map(|label| {
            let tp = pairs.iter().filter(|(t, p)| *t == label && *p == label).count();
            let predicted = pairs.iter().filter(|(_, p)| *p == label).count();
            let support = pairs.iter().filter(|(t, _)| *t == label).count();
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            LabelMetrics {
                label: label.to_string(),
                precision,
                recall,
                f1: f1(precision, recall),
                support,
            }
        })
        .collect();

    let total = pairs.len();
    let correct = pairs.iter().filter(|(t, p)| t == p).count();
    let n_labels = rows.len();

    let macro_avg = Averages {
        precision: mean(rows.iter().map(|r| r.precision), n_labels),
        recall: mean(rows.iter().map(|r| r.recall), n_labels),
        f1: mean(rows.iter().map(|r| r.f1), n_labels),
        support: total,
    };
    let weighted = |value: fn(&LabelMetrics) -> f64| {
        if total == 0 {
            0.0
        } else {
            rows.iter()
                .map(|r| value(r) * r.support as f64)
                .sum::<f64>()
                / total as f64
        }
    };
    let weighted_avg = Averages {
        precision: weighted(|r| r.precision),
        recall: weighted(|r| r.recall),
        f1: weighted(|r| r.f1),
        support: total,
    };

    ClassificationReport {
        labels: rows,
        accuracy: ratio(correct, total),
        macro_avg,
        weighted_avg,
    }
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    if n == 0 { 0.0 } else { values.sum::<f64>() / n as f64 }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|r| r.label.len())
            .chain(["weighted avg".len()])
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for row in &self.labels {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                row.label, row.precision, row.recall, row.f1, row.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_report_values() {
        let y_true = strings(&["stop", "stop", "noNode", "yesNode"]);
        let y_pred = strings(&["stop", "noNode", "noNode", "stop"]);
        let report = classification_report(&y_true, &y_pred);

        assert_eq!(report.accuracy, 0.5);
        let labels: Vec<&str> = report.labels.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["noNode", "stop", "yesNode"]);

        let no = &report.labels[0];
        assert_eq!((no.precision, no.recall, no.support), (0.5, 1.0, 1));
        let stop = &report.labels[1];
        assert_eq!((stop.precision, stop.recall), (0.5, 0.5));
        let yes = &report.labels[2];
        assert_eq!((yes.precision, yes.recall, yes.f1), (0.0, 0.0, 0.0));

        assert_eq!(report.weighted_avg.support, 4);
        assert!((report.macro_avg.recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_label_only_predicted_has_zero_support() {
        let report = classification_report(&strings(&["stop"]), &strings(&["volumeUp"]));
        let volume = report.labels.iter().find(|r| r.label == "volumeUp").unwrap();
        assert_eq!(volume.support, 0);
        assert_eq!(volume.recall, 0.0);
        assert_eq!(volume.precision, 0.0);
    }

    #[test]
    fn test_empty_report() {
        let report = classification_report(&[], &[]);
        assert!(report.labels.is_empty());
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.weighted_avg.f1, 0.0);
    }

    #[test]
    fn test_display() {
        let report = classification_report(&strings(&["stop", "noNode"]), &strings(&["stop", "stop"]));
        let text = report.to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("accuracy"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("stop")));
    }
}
