//! TF-IDF Vectorizer
//!
//! Word tokens of two or more characters, smoothed IDF and L2-normalised
//! rows. Vocabulary columns are ordered alphabetically.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Lowercase and split into word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Sorted terms; position = column
    vocabulary: Vec<String>,
    /// IDF weight per column
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and IDF weights from a corpus
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> ModelResult<Self> {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let unique: BTreeSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }

        let n = documents.len() as f64;
        let (vocabulary, idf) = doc_freq
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight as f32)
            })
            .unzip();

        Ok(Self { vocabulary, idf })
    }

    /// Fit and transform in one pass
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> ModelResult<(Self, Vec<Vec<f32>>)> {
        let vectorizer = Self::fit(documents)?;
        let rows = documents
            .iter()
            .map(|doc| vectorizer.transform(doc.as_ref()))
            .collect();
        Ok((vectorizer, rows))
    }

    /// Number of output columns
    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }

    /// Dense TF-IDF row for one document. Unknown terms are dropped.
    pub fn transform(&self, document: &str) -> Vec<f32> {
        let mut row = vec![0.0f32; self.width()];

        for token in tokenize(document) {
            if let Some(col) = self.column_of(&token) {
                row[col] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in row.iter_mut() {
                *value /= norm;
            }
        }

        row
    }

    /// Layout check: vocabulary and weights describe the same columns
    pub fn is_consistent(&self) -> bool {
        self.vocabulary.len() == self.idf.len()
            && self.vocabulary.windows(2).all(|w| w[0] < w[1])
    }
}
