//! Labeled training corpus.
//!
//! The corpus file is a JSON object with a `sentences` array:
//!
//! ```json
//! {
//!   "sentences": [
//!     {"text": "turn it up", "intent": "volumeUp", "training": true},
//!     {"text": "how many games have I played", "intent": "gamesCounter"}
//!   ]
//! }
//! ```
//!
//! Field values are read loosely: a record with a non-string `text` is
//! skipped instead of failing the whole file.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::types::{IntentSample, UNKNOWN_INTENT};
use crate::analysis::normalizer::normalize;
use crate::error::{ParlanceError, Result};

/// One raw record of the corpus file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CorpusRecord {
    /// Utterance; only strings are usable.
    #[serde(default)]
    pub text: Value,
    /// Intent label; missing, null or empty becomes [`UNKNOWN_INTENT`].
    #[serde(default)]
    pub intent: Value,
    /// Inclusion flag; `None` (absent) means included, an explicit `null`
    /// means excluded.
    #[serde(default, deserialize_with = "present")]
    pub training: Option<Value>,
}

impl CorpusRecord {
    /// Whether the record takes part in training.
    pub fn is_training(&self) -> bool {
        match &self.training {
            None => true,
            Some(value) => is_truthy(value),
        }
    }

    /// The label, with the unknown sentinel for missing values.
    ///
    /// Numbers and booleans are kept in their JSON spelling.
    pub fn label(&self) -> String {
        match &self.intent {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => {
                log::warn!("Intent {} is not a scalar, labeled {UNKNOWN_INTENT:?}", self.intent);
                UNKNOWN_INTENT.to_string()
            }
            _ => UNKNOWN_INTENT.to_string(),
        }
    }

    /// Turn the record into a sample, or `None` if it must be discarded.
    fn into_sample(self) -> Option<IntentSample> {
        if !self.is_training() {
            return None;
        }
        let raw = match &self.text {
            Value::String(s) if !s.trim().is_empty() => s,
            _ => return None,
        };
        let text = normalize(raw);
        if text.is_empty() {
            return None;
        }
        Some(IntentSample {
            text,
            intent: self.label(),
        })
    }
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[derive(Deserialize)]
struct CorpusFile {
    sentences: Vec<CorpusRecord>,
}

/// Filtered, normalized training examples.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    samples: Vec<IntentSample>,
    skipped: usize,
}

impl Corpus {
    /// Read and filter a corpus file.
    ///
    /// A missing file or malformed JSON is a [`ParlanceError::Data`] error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParlanceError::data(format!("cannot read corpus {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content).map_err(|e| match e {
            ParlanceError::Data(msg) => ParlanceError::data(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse a corpus document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CorpusFile = serde_json::from_str(json)
            .map_err(|e| ParlanceError::data(format!("malformed corpus: {e}")))?;
        Ok(Self::from_records(file.sentences))
    }

    /// Filter and normalize already-parsed records.
    pub fn from_records<I: IntoIterator<Item = CorpusRecord>>(records: I) -> Self {
        let mut samples = Vec::new();
        let mut skipped = 0;
        for record in records {
            match record.into_sample() {
                Some(sample) => samples.push(sample),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} corpus records (excluded, empty or non-string text)");
        }
        let unknown = samples
            .iter()
            .filter(|s| s.intent == UNKNOWN_INTENT)
            .count();
        if unknown > 0 {
            log::warn!("{unknown} corpus records have no intent and are labeled {UNKNOWN_INTENT:?}");
        }

        Self { samples, skipped }
    }

    /// Retained samples, in file order.
    pub fn samples(&self) -> &[IntentSample] {
        &self.samples
    }

    /// Consume the corpus and return its samples.
    pub fn into_samples(self) -> Vec<IntentSample> {
        self.samples
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample survived filtering.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct labels of the retained samples.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.samples.iter().map(|s| s.intent.as_str()).collect()
    }

    /// Number of discarded records.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtering_rules() {
        let corpus = Corpus::from_json_str(
            r#"{"sentences": [
                {"text": "Show me the games!", "intent": "listOfGames"},
                {"text": "excluded", "intent": "stop", "training": false},
                {"text": "null flag", "intent": "stop", "training": null},
                {"text": "   ", "intent": "stop"},
                {"text": 42, "intent": "stop"},
                {"intent": "stop"},
                {"text": "?!", "intent": "stop"},
                {"text": "no label here"},
                {"text": "empty label", "intent": ""},
                {"text": "numeric flag", "intent": "yesNode", "training": 1}
            ]}"#,
        )
        .unwrap();

        let texts: Vec<&str> = corpus.samples().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["show me the games", "no label here", "empty label", "numeric flag"]
        );
        assert_eq!(corpus.samples()[1].intent, UNKNOWN_INTENT);
        assert_eq!(corpus.samples()[2].intent, UNKNOWN_INTENT);
        assert_eq!(corpus.skipped(), 6);
        assert_eq!(
            corpus.labels().into_iter().collect::<Vec<_>>(),
            vec!["listOfGames", "unknown", "yesNode"]
        );
    }

    #[test]
    fn test_scalar_intents_keep_their_value() {
        let corpus = Corpus::from_json_str(
            r#"{"sentences": [
                {"text": "numbered", "intent": 42},
                {"text": "flagged", "intent": true},
                {"text": "listed", "intent": ["stop"]},
                {"text": "nulled", "intent": null}
            ]}"#,
        )
        .unwrap();

        let labels: Vec<&str> = corpus.samples().iter().map(|s| s.intent.as_str()).collect();
        assert_eq!(labels, vec!["42", "true", UNKNOWN_INTENT, UNKNOWN_INTENT]);
    }

    #[test]
    fn test_malformed_corpus_is_data_error() {
        assert!(matches!(
            Corpus::from_json_str("{not json"),
            Err(ParlanceError::Data(_))
        ));
        assert!(matches!(
            Corpus::from_json_str(r#"{"examples": []}"#),
            Err(ParlanceError::Data(_))
        ));
    }

    #[test]
    fn test_missing_file_is_data_error() {
        let result = Corpus::load("/definitely/not/here/corpus.json");
        assert!(matches!(result, Err(ParlanceError::Data(_))));
    }

    #[test]
    fn test_empty_sentences() {
        let corpus = Corpus::from_json_str(r#"{"sentences": []}"#).unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.len(), 0);
    }
}
