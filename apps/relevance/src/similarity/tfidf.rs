//! TF-IDF cosine similarity over a corpus fit fresh for every comparison.
//!
//! Analyzer: lowercase, tokens of two or more word characters, English stop
//! words removed, unigrams plus bigrams of the remaining tokens.
//! Weighting: raw term counts × smoothed idf `ln((1 + n) / (1 + df)) + 1`,
//! rows L2-normalised. When the vocabulary exceeds the feature cap, the most
//! frequent terms across the corpus are kept (ties resolved alphabetically).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::SimilarityError;
use crate::similarity::stop_words::is_stop_word;
use crate::similarity::{to_percentage, WeightedTerm};

static TFIDF_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("tfidf token pattern is valid"));

pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Vectorizer parameters. Holds no fit state; every call to `fit_transform`
/// builds its own vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct TfidfVectorizer {
    max_features: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

/// Dense document-term matrix produced by one fit.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    vocabulary: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features: max_features.max(1),
        }
    }

    fn analyze(&self, doc: &str) -> Vec<String> {
        let lowered = doc.to_lowercase();
        let words: Vec<&str> = TFIDF_TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| !is_stop_word(w))
            .collect();

        let mut terms: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        terms.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
        terms
    }

    pub fn fit_transform(&self, docs: &[&str]) -> Result<TfidfMatrix, SimilarityError> {
        let counts: Vec<BTreeMap<String, usize>> = docs
            .iter()
            .map(|doc| {
                let mut tf = BTreeMap::new();
                for term in self.analyze(doc) {
                    *tf.entry(term).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut corpus_freq: BTreeMap<&str, usize> = BTreeMap::new();
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for (term, n) in tf {
                *corpus_freq.entry(term.as_str()).or_insert(0) += n;
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if corpus_freq.is_empty() {
            return Err(SimilarityError::EmptyVocabulary);
        }

        let mut vocabulary: Vec<&str> = corpus_freq.keys().copied().collect();
        if vocabulary.len() > self.max_features {
            // BTreeMap order is alphabetical and sort_by is stable, so ties stay alphabetical.
            vocabulary.sort_by(|a, b| corpus_freq[b].cmp(&corpus_freq[a]));
            vocabulary.truncate(self.max_features);
            vocabulary.sort_unstable();
        }

        let n_docs = docs.len() as f64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| ((1.0 + n_docs) / (1.0 + doc_freq[term] as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row: Vec<f64> = vocabulary
                    .iter()
                    .zip(&idf)
                    .map(|(term, idf)| tf.get(*term).copied().unwrap_or(0) as f64 * idf)
                    .collect();
                let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|w| *w /= norm);
                }
                row
            })
            .collect();

        debug!(features = vocabulary.len(), "tfidf vocabulary fit");

        Ok(TfidfMatrix {
            vocabulary: vocabulary.into_iter().map(str::to_string).collect(),
            rows,
        })
    }
}

impl TfidfMatrix {
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity between two rows; 0 when either row is all zeros.
    pub fn cosine(&self, a: usize, b: usize) -> f64 {
        let (ra, rb) = (&self.rows[a], &self.rows[b]);
        let dot: f64 = ra.iter().zip(rb).map(|(x, y)| x * y).sum();
        let na = ra.iter().map(|x| x * x).sum::<f64>().sqrt();
        let nb = rb.iter().map(|x| x * x).sum::<f64>().sqrt();
        if na == 0.0 || nb == 0.0 {
            0.0
        } else {
            dot / (na * nb)
        }
    }

    /// Highest-weighted non-zero terms of a row, weight-descending then alphabetical.
    pub fn top_terms(&self, row: usize, n: usize) -> Vec<WeightedTerm> {
        let mut terms: Vec<WeightedTerm> = self.rows[row]
            .iter()
            .zip(&self.vocabulary)
            .filter(|(w, _)| **w > 0.0)
            .map(|(w, term)| WeightedTerm {
                term: term.clone(),
                weight: *w,
            })
            .collect();
        terms.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.term.cmp(&b.term)));
        terms.truncate(n);
        terms
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfidfSimilarity {
    /// Cosine similarity in [0, 1].
    pub tfidf_similarity: f64,
    pub similarity_percentage: f64,
    pub text1_top_features: Vec<WeightedTerm>,
    pub text2_top_features: Vec<WeightedTerm>,
    pub vocabulary_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TfidfSimilarity {
    pub fn failed(err: &SimilarityError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Default::default()
        }
    }
}

/// TF-IDF cosine similarity between two texts, with the `top_n` heaviest
/// terms of each. Texts without any indexable term compare as 0%.
pub fn tfidf_similarity(
    text1: &str,
    text2: &str,
    vectorizer: &TfidfVectorizer,
    top_n: usize,
) -> Result<TfidfSimilarity, SimilarityError> {
    let matrix = match vectorizer.fit_transform(&[text1, text2]) {
        Ok(m) => m,
        Err(SimilarityError::EmptyVocabulary) => {
            debug!("tfidf: no indexable terms in either text, similarity is 0");
            return Ok(TfidfSimilarity::default());
        }
        Err(e) => return Err(e),
    };

    let score = matrix.cosine(0, 1);
    if !score.is_finite() {
        return Err(SimilarityError::NonFinite { method: "tfidf" });
    }
    let score = score.clamp(0.0, 1.0);

    Ok(TfidfSimilarity {
        tfidf_similarity: score,
        similarity_percentage: to_percentage(score),
        text1_top_features: matrix.top_terms(0, top_n),
        text2_top_features: matrix.top_terms(1, top_n),
        vocabulary_size: matrix.n_features(),
        error: None,
    })
}
