//! TF-IDF vectorizer for text feature extraction.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::config::VectorizerConfig;
use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::{LowercaseFilter, ShingleFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::{ParlanceError, Result};

/// A sparse feature vector with strictly increasing indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    /// Feature indices, ascending.
    pub indices: Vec<usize>,
    /// Values, parallel to `indices`.
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether every component is zero.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(index, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense vector.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter().map(|(i, v)| v * dense[i]).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Expand into a dense vector of length `dim`.
    pub fn to_dense(&self, dim: usize) -> Vec<f64> {
        let mut dense = vec![0.0; dim];
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

/// TF-IDF vectorizer for text feature extraction.
///
/// Terms are produced by a [`PipelineAnalyzer`] built from the
/// [`VectorizerConfig`]: `\b\w\w+\b` tokens, lowercased, English stop words
/// removed, then word n-grams. A fitted vectorizer weights raw term counts by
/// the smoothed IDF `ln((1 + n) / (1 + df)) + 1` and L2-normalizes each row.
#[derive(Clone)]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    /// Vocabulary: term -> index mapping.
    vocabulary: HashMap<String, usize>,
    /// Terms in index order (sorted).
    terms: Vec<String>,
    /// Inverse document frequency for each term.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.terms.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        let analyzer = Self::build_analyzer(&config)?;
        Ok(Self {
            config,
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
            n_documents: 0,
            analyzer,
        })
    }

    /// Rebuild a fitted vectorizer from its persisted state.
    pub fn from_parts(
        config: VectorizerConfig,
        terms: Vec<String>,
        idf: Vec<f64>,
        n_documents: usize,
    ) -> Result<Self> {
        if terms.len() != idf.len() {
            return Err(ParlanceError::load(format!(
                "vocabulary has {} terms but {} idf weights",
                terms.len(),
                idf.len()
            )));
        }
        let mut vectorizer = Self::new(config)?;
        vectorizer.vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        if vectorizer.vocabulary.len() != terms.len() {
            return Err(ParlanceError::load("vocabulary contains duplicate terms"));
        }
        vectorizer.terms = terms;
        vectorizer.idf = idf;
        vectorizer.n_documents = n_documents;
        Ok(vectorizer)
    }

    fn build_analyzer(config: &VectorizerConfig) -> Result<Arc<dyn Analyzer>> {
        let (min_n, max_n) = config.ngram_range;
        let mut analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new()?))
            .add_filter(Arc::new(LowercaseFilter::new()));
        if config.stop_words {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
        }
        let analyzer = analyzer
            .add_filter(Arc::new(ShingleFilter::new(min_n, max_n)?))
            .with_name("tfidf_terms");
        Ok(Arc::new(analyzer))
    }

    /// Fit the vocabulary and IDF weights on training documents.
    ///
    /// Terms found in fewer than `min_df` documents are dropped. Fails with a
    /// training error if nothing survives.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(ParlanceError::training("cannot fit vectorizer on zero documents"));
        }

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = self.analyze(doc)?.into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let (terms, idf): (Vec<String>, Vec<f64>) = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.config.min_df)
            .map(|(term, df)| (term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .unzip();

        if terms.is_empty() {
            return Err(ParlanceError::training(format!(
                "empty vocabulary: no term appears in at least {} documents",
                self.config.min_df
            )));
        }

        self.vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        self.terms = terms;
        self.idf = idf;
        self.n_documents = documents.len();

        log::debug!(
            "Fitted vectorizer: {} documents, {} terms",
            self.n_documents,
            self.terms.len()
        );
        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF vector.
    ///
    /// Unknown terms are ignored, so unseen text yields an empty vector.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        if !self.is_fitted() {
            return Err(ParlanceError::prediction("vectorizer is not fitted"));
        }

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(document)? {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let (indices, mut values): (Vec<usize>, Vec<f64>) = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .unzip();

        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut values {
                *v /= norm;
            }
        }

        Ok(SparseVector { indices, values })
    }

    /// Fit, then transform every training document.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        documents.iter().map(|d| self.transform(d)).collect()
    }

    fn analyze(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }

    /// Whether `fit` has run.
    pub fn is_fitted(&self) -> bool {
        !self.terms.is_empty()
    }

    /// The configuration this vectorizer was built with.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Vocabulary terms in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// IDF weights in index order.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of documents seen during fitting.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }
}
