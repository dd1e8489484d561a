//! Okapi BM25 scoring on a two-document corpus built from the texts being compared.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::errors::SimilarityError;
use crate::similarity::{to_percentage, tokenize, WeightedTerm};

const K1: f64 = 1.5;
const B: f64 = 0.75;
/// Raw BM25 scores are divided by this before clamping to [0, 1].
pub const NORMALIZATION_DIVISOR: f64 = 10.0;
const TOP_TERMS: usize = 10;

/// BM25 index over a small tokenized corpus.
pub struct Bm25 {
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    avgdl: f64,
    idf: HashMap<String, f64>,
}

impl Bm25 {
    pub fn new(corpus: &[Vec<String>]) -> Self {
        let term_freqs: Vec<HashMap<String, usize>> = corpus
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for token in doc {
                    *tf.entry(token.clone()).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let doc_lens: Vec<usize> = corpus.iter().map(Vec::len).collect();
        let avgdl = if corpus.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f64 / corpus.len() as f64
        };

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for tf in &term_freqs {
            for term in tf.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        // Smoothed idf stays positive even when a term occurs in every document,
        // which is the common case for a two-document corpus.
        let n = corpus.len() as f64;
        let idf = doc_freq
            .into_iter()
            .map(|(term, df)| {
                let df = df as f64;
                (term.to_string(), (1.0 + (n - df + 0.5) / (df + 0.5)).ln())
            })
            .collect();

        Self {
            term_freqs,
            doc_lens,
            avgdl,
            idf,
        }
    }

    /// Score of document `doc` for `query`. Repeated query tokens count repeatedly.
    pub fn score(&self, query: &[String], doc: usize) -> f64 {
        if self.avgdl == 0.0 {
            return 0.0;
        }
        let tf = &self.term_freqs[doc];
        let len_norm = 1.0 - B + B * self.doc_lens[doc] as f64 / self.avgdl;

        query
            .iter()
            .filter_map(|q| {
                let freq = *tf.get(q)? as f64;
                let idf = self.idf.get(q).copied().unwrap_or(0.0);
                Some(idf * freq * (K1 + 1.0) / (freq + K1 * len_norm))
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bm25Similarity {
    /// Mean of the two directional scores.
    pub bm25_score: f64,
    /// `bm25_score / 10` clamped to [0, 1].
    pub normalized_score: f64,
    pub similarity_percentage: f64,
    /// Score of text1 when queried with text2's tokens.
    pub score1_vs_2: f64,
    /// Score of text2 when queried with text1's tokens.
    pub score2_vs_1: f64,
    /// Text2 terms ranked by how strongly they hit text1.
    pub top_matching_terms: Vec<WeightedTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Bm25Similarity {
    pub fn failed(err: &SimilarityError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Default::default()
        }
    }
}

pub fn bm25_similarity(text1: &str, text2: &str) -> Result<Bm25Similarity, SimilarityError> {
    let tokens1 = tokenize(text1);
    let tokens2 = tokenize(text2);
    let bm25 = Bm25::new(&[tokens1.clone(), tokens2.clone()]);

    let score1_vs_2 = bm25.score(&tokens2, 0);
    let score2_vs_1 = bm25.score(&tokens1, 1);
    let avg = (score1_vs_2 + score2_vs_1) / 2.0;
    if !avg.is_finite() {
        return Err(SimilarityError::NonFinite { method: "bm25" });
    }
    let normalized = (avg / NORMALIZATION_DIVISOR).clamp(0.0, 1.0);

    let unique_query: BTreeSet<&String> = tokens2.iter().collect();
    let mut top_matching_terms: Vec<WeightedTerm> = unique_query
        .into_iter()
        .map(|term| WeightedTerm {
            term: term.clone(),
            weight: bm25.score(std::slice::from_ref(term), 0),
        })
        .filter(|t| t.weight > 0.0)
        .collect();
    top_matching_terms
        .sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.term.cmp(&b.term)));
    top_matching_terms.truncate(TOP_TERMS);

    Ok(Bm25Similarity {
        bm25_score: avg,
        normalized_score: normalized,
        similarity_percentage: to_percentage(normalized),
        score1_vs_2,
        score2_vs_1,
        top_matching_terms,
        error: None,
    })
}
