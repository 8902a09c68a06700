use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, info};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::utils::l2_normalize;
use crate::error::{Result, SentimentError};

/// Settings for fitting a [`TfidfVectorizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Upper bound on the vocabulary size
    pub max_features: usize,
    /// Tokens shorter than this are not counted
    pub min_token_len: usize,
    /// Add one to document counts when computing IDF
    pub smooth_idf: bool,
    /// Scale every row to unit L2 norm
    pub normalize: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 2000,
            min_token_len: 2,
            smooth_idf: true,
            normalize: true,
        }
    }
}

impl VectorizerConfig {
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }

    pub fn with_smooth_idf(mut self, smooth_idf: bool) -> Self {
        self.smooth_idf = smooth_idf;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// TF-IDF vectorizer with a frozen, size-capped vocabulary.
///
/// Columns are ordered lexically by term. A document's row is its term
/// counts multiplied by the fitted IDF weights, optionally L2-normalized.
/// Documents without any known term map to an all-zero row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    fn tokens<'a>(&self, document: &'a str) -> impl Iterator<Item = &'a str> {
        tokenize(document, self.config.min_token_len)
    }

    /// Builds the vocabulary and IDF weights from a normalized corpus.
    ///
    /// The vocabulary keeps the `max_features` most frequent terms over the
    /// whole corpus; equal counts are broken by lexical order.
    pub fn fit(documents: &[String], config: VectorizerConfig) -> Result<Self> {
        if documents.is_empty() {
            return Err(SentimentError::DataFormat(
                "cannot fit a vectorizer on an empty corpus".into(),
            ));
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for document in documents {
            for token in tokenize(document, config.min_token_len) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
        let distinct = counts.len();

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(config.max_features);

        let mut terms: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();
        let vocabulary: BTreeMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for document in documents {
            let unique: HashSet<&str> = tokenize(document, config.min_token_len).collect();
            for term in unique {
                if let Some(&idx) = vocabulary.get(term) {
                    doc_freq[idx] += 1;
                }
            }
        }

        let n_docs = documents.len() as f64;
        let idf: Array1<f64> = doc_freq
            .into_iter()
            .map(|df| {
                let (n, df) = if config.smooth_idf {
                    (n_docs + 1.0, df as f64 + 1.0)
                } else {
                    (n_docs, (df as f64).max(1.0))
                };
                (n / df).ln() + 1.0
            })
            .collect();

        info!(
            "Fitted TF-IDF vocabulary: {} of {} distinct terms (cap {})",
            vocabulary.len(),
            distinct,
            config.max_features
        );

        Ok(Self {
            config,
            vocabulary,
            idf,
        })
    }

    /// Fits on the corpus and returns its feature matrix in one step.
    pub fn fit_transform(documents: &[String], config: VectorizerConfig) -> Result<(Self, Array2<f64>)> {
        let vectorizer = Self::fit(documents, config)?;
        let features = vectorizer.transform(documents);
        Ok((vectorizer, features))
    }

    /// Maps documents to a `documents × vocabulary` matrix.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let mut features = Array2::zeros((documents.len(), self.vocabulary_size()));
        for (document, mut row) in documents.iter().zip(features.rows_mut()) {
            for token in self.tokens(document.as_ref()) {
                if let Some(&idx) = self.vocabulary.get(token) {
                    row[idx] += 1.0;
                }
            }
            row *= &self.idf;
            if self.config.normalize {
                l2_normalize(row);
            }
        }
        debug!("Transformed {} documents", documents.len());
        features
    }

    /// Maps one document to a feature vector.
    pub fn transform_one(&self, document: &str) -> Array1<f64> {
        self.transform(&[document]).row(0).to_owned()
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }

    /// Terms in column order.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<(&str, usize)> =
            self.vocabulary.iter().map(|(t, &i)| (t.as_str(), i)).collect();
        terms.sort_by_key(|&(_, i)| i);
        terms.into_iter().map(|(t, _)| t).collect()
    }
}

fn tokenize(document: &str, min_len: usize) -> impl Iterator<Item = &str> {
    document
        .split_whitespace()
        .filter(move |token| token.chars().count() >= min_len)
}
