//! Common types for intent classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label given to corpus examples that carry no intent.
pub const UNKNOWN_INTENT: &str = "unknown";

/// A retained training example.
///
/// `text` is already normalized and never empty; `intent` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSample {
    /// Normalized utterance text.
    pub text: String,
    /// Intent label.
    pub intent: String,
}

/// Which layer produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// A deterministic rule matched.
    Rule,
    /// The statistical pipeline predicted the label.
    Model,
    /// No rule matched and no model is loaded.
    Fallback,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::Rule => write!(f, "rule"),
            ResolutionSource::Model => write!(f, "model"),
            ResolutionSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// The answer to one classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Predicted intent label.
    pub intent: String,
    /// Confidence in `[0, 1]`, or `None` when the classifier cannot say.
    ///
    /// `None` means "unknown", which is different from a low confidence.
    pub confidence: Option<f64>,
    /// Layer that produced the label.
    pub source: ResolutionSource,
}

impl Resolution {
    /// A rule match: always full confidence.
    pub fn from_rule<S: Into<String>>(intent: S) -> Self {
        Self {
            intent: intent.into(),
            confidence: Some(1.0),
            source: ResolutionSource::Rule,
        }
    }

    /// A statistical prediction.
    pub fn from_model<S: Into<String>>(intent: S, confidence: Option<f64>) -> Self {
        Self {
            intent: intent.into(),
            confidence,
            source: ResolutionSource::Model,
        }
    }

    /// The rules-only answer when nothing matched.
    pub fn fallback() -> Self {
        Self {
            intent: UNKNOWN_INTENT.to_string(),
            confidence: None,
            source: ResolutionSource::Fallback,
        }
    }
}
