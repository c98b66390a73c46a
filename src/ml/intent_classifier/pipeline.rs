//! Fitted vectorizer + classifier, persisted as one artifact.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::{ClassifierStage, FitStats};
use super::config::{ClassifierConfig, VectorizerConfig};
use super::tfidf::TfIdfVectorizer;
use crate::error::{ParlanceError, Result};

/// On-disk form of a [`Pipeline`].
#[derive(Debug, Serialize, Deserialize)]
struct SerializablePipeline {
    vectorizer: VectorizerConfig,
    terms: Vec<String>,
    idf: Vec<f64>,
    n_documents: usize,
    classifier: ClassifierStage,
}

/// A fitted two-stage text classification pipeline.
///
/// Inputs must already be normalized; the resolver and the trainer both do
/// that with [`crate::analysis::normalizer::normalize`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    vectorizer: TfIdfVectorizer,
    classifier: ClassifierStage,
}

impl Pipeline {
    /// Fit both stages on normalized texts and their labels.
    pub fn fit(
        vectorizer_config: &VectorizerConfig,
        classifier_config: &ClassifierConfig,
        texts: &[String],
        labels: &[String],
    ) -> Result<(Self, FitStats)> {
        let mut vectorizer = TfIdfVectorizer::new(vectorizer_config.clone())?;
        let features = vectorizer.fit_transform(texts)?;
        let (classifier, stats) = ClassifierStage::fit(
            classifier_config,
            &features,
            labels,
            vectorizer.vocabulary_size(),
        )?;
        Ok((
            Self {
                vectorizer,
                classifier,
            },
            stats,
        ))
    }

    /// Predict a label for one normalized text.
    pub fn predict(&self, text: &str) -> Result<String> {
        let features = self.vectorizer.transform(text)?;
        self.classifier.as_classifier().predict(&features)
    }

    /// Predict a label and, when the classifier models probabilities, the
    /// probability of that label.
    pub fn predict_with_confidence(&self, text: &str) -> Result<(String, Option<f64>)> {
        let features = self.vectorizer.transform(text)?;
        let classifier = self.classifier.as_classifier();
        let label = classifier.predict(&features)?;
        let confidence = classifier
            .predict_proba(&features)
            .and_then(|probs| probs.into_iter().reduce(f64::max));
        Ok((label, confidence))
    }

    /// Predict labels for many normalized texts.
    pub fn predict_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        texts.iter().map(|t| self.predict(t)).collect()
    }

    /// The vectorizer stage.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// The classifier stage.
    pub fn classifier(&self) -> &ClassifierStage {
        &self.classifier
    }

    /// Labels the classifier can produce.
    pub fn labels(&self) -> &[String] {
        self.classifier.as_classifier().labels()
    }

    /// Encode the pipeline.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let data = SerializablePipeline {
            vectorizer: self.vectorizer.config().clone(),
            terms: self.vectorizer.terms().to_vec(),
            idf: self.vectorizer.idf().to_vec(),
            n_documents: self.vectorizer.n_documents(),
            classifier: self.classifier.clone(),
        };
        bincode::serde::encode_to_vec(&data, bincode::config::standard())
            .map_err(|e| ParlanceError::serialization(format!("Failed to encode pipeline: {e}")))
    }

    /// Decode a pipeline produced by [`Pipeline::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (data, _): (SerializablePipeline, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| ParlanceError::load(format!("Failed to decode pipeline: {e}")))?;

        let vectorizer =
            TfIdfVectorizer::from_parts(data.vectorizer, data.terms, data.idf, data.n_documents)?;
        data.classifier.validate()?;
        if data.classifier.n_features() != vectorizer.vocabulary_size() {
            return Err(ParlanceError::load(format!(
                "classifier expects {} features but vocabulary has {}",
                data.classifier.n_features(),
                vectorizer.vocabulary_size()
            )));
        }

        Ok(Self {
            vectorizer,
            classifier: data.classifier,
        })
    }

    /// Write the pipeline to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_bytes()?)?;
        log::info!("Saved pipeline to {}", path.display());
        Ok(())
    }

    /// Read a pipeline written by [`Pipeline::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            ParlanceError::load(format!("cannot read model {}: {e}", path.display()))
        })?;
        Self::from_bytes(&bytes)
    }
}
