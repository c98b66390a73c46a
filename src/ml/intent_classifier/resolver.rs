//! Rules first, statistical pipeline second.

use std::path::Path;

use super::pipeline::Pipeline;
use super::rules::RuleTable;
use super::types::Resolution;
use crate::analysis::normalizer::normalize;
use crate::error::Result;

/// Classifies single utterances.
///
/// A resolver is built once (usually from an artifact path), serves any
/// number of requests through `&self`, and holds no per-request state.
///
/// # Examples
///
/// ```
/// use parlance::ml::intent_classifier::{IntentResolver, ResolutionSource};
///
/// let resolver = IntentResolver::rules_only();
///
/// let resolution = resolver.resolve("yeah").unwrap();
/// assert_eq!(resolution.intent, "yesNode");
/// assert_eq!(resolution.confidence, Some(1.0));
///
/// let resolution = resolver.resolve("show me the games list").unwrap();
/// assert_eq!(resolution.intent, "unknown");
/// assert_eq!(resolution.source, ResolutionSource::Fallback);
/// ```
#[derive(Debug, Clone)]
pub struct IntentResolver {
    rules: RuleTable,
    pipeline: Option<Pipeline>,
}

impl IntentResolver {
    /// Wrap a fitted pipeline with the default rules.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            rules: RuleTable::default(),
            pipeline: Some(pipeline),
        }
    }

    /// Load the pipeline artifact at `path`.
    ///
    /// Fails with a load error when the file is missing or unreadable.
    pub fn from_artifact<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let pipeline = Pipeline::load(path)?;
        log::info!(
            "Loaded pipeline from {} ({} labels, {} terms)",
            path.display(),
            pipeline.labels().len(),
            pipeline.vectorizer().vocabulary_size()
        );
        Ok(Self::new(pipeline))
    }

    /// A degraded resolver without a model.
    ///
    /// Inputs no rule matches resolve to `"unknown"` with no confidence.
    pub fn rules_only() -> Self {
        Self {
            rules: RuleTable::default(),
            pipeline: None,
        }
    }

    /// Replace the rule table.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// Whether a statistical model is loaded.
    pub fn has_model(&self) -> bool {
        self.pipeline.is_some()
    }

    /// The loaded pipeline, if any.
    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    /// Classify one raw utterance.
    pub fn resolve(&self, text: &str) -> Result<Resolution> {
        if let Some(label) = self.rules.evaluate(text) {
            log::debug!("Rule matched {text:?} -> {label}");
            return Ok(Resolution::from_rule(label));
        }

        let Some(pipeline) = &self.pipeline else {
            log::debug!("No rule matched {text:?} and no model is loaded");
            return Ok(Resolution::fallback());
        };

        let normalized = normalize(text);
        let (label, confidence) = pipeline.predict_with_confidence(&normalized)?;
        log::debug!("Model predicted {normalized:?} -> {label} ({confidence:?})");
        Ok(Resolution::from_model(label, confidence))
    }
}
