//! Similarity primitives: pairwise comparison of two raw texts, each method
//! reporting a percentage in [0, 100] plus supporting detail.
//!
//! The comprehensive call runs all four methods independently. A method that
//! fails is reported as 0% with its `error` field set; the others still count.

pub mod bm25;
pub mod overlap;
mod stop_words;
pub mod tfidf;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use bm25::{bm25_similarity, Bm25Similarity};
pub use overlap::{
    find_key_differences, jaccard_similarity, word_overlap, JaccardSimilarity, KeyDifferences,
    WordOverlap,
};
pub use tfidf::{tfidf_similarity, TfidfSimilarity, TfidfVectorizer};

pub const TFIDF_WEIGHT: f64 = 0.4;
pub const BM25_WEIGHT: f64 = 0.3;
pub const JACCARD_WEIGHT: f64 = 0.2;
pub const OVERLAP_WEIGHT: f64 = 0.1;

const COMPREHENSIVE_TOP_FEATURES: usize = 10;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Lowercased word tokens, no stemming, no stop-word removal.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub(crate) fn to_percentage(fraction: f64) -> f64 {
    fraction * 100.0
}

/// A term and the weight a method assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualScores {
    pub tfidf: f64,
    pub bm25: f64,
    pub jaccard: f64,
    pub word_overlap: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub text1_word_count: usize,
    pub text2_word_count: usize,
    pub text1_unique_words: usize,
    pub text2_unique_words: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveSimilarity {
    pub weighted_average: f64,
    pub individual_scores: IndividualScores,
    pub tfidf: TfidfSimilarity,
    pub bm25: Bm25Similarity,
    pub jaccard: JaccardSimilarity,
    pub word_overlap: WordOverlap,
    pub text_statistics: TextStatistics,
}

/// Runs every method and blends them 0.4 TF-IDF / 0.3 BM25 / 0.2 Jaccard / 0.1 overlap.
pub fn comprehensive_similarity(text1: &str, text2: &str) -> ComprehensiveSimilarity {
    let tfidf = tfidf_similarity(
        text1,
        text2,
        &TfidfVectorizer::default(),
        COMPREHENSIVE_TOP_FEATURES,
    )
    .unwrap_or_else(|e| {
        warn!("TF-IDF similarity failed, counting it as 0: {e}");
        TfidfSimilarity::failed(&e)
    });
    let bm25 = bm25_similarity(text1, text2).unwrap_or_else(|e| {
        warn!("BM25 similarity failed, counting it as 0: {e}");
        Bm25Similarity::failed(&e)
    });
    let jaccard = jaccard_similarity(text1, text2);
    let overlap = word_overlap(text1, text2);

    let individual_scores = IndividualScores {
        tfidf: tfidf.similarity_percentage,
        bm25: bm25.similarity_percentage,
        jaccard: jaccard.similarity_percentage,
        word_overlap: overlap.similarity_percentage,
    };
    let weighted_average = individual_scores.tfidf * TFIDF_WEIGHT
        + individual_scores.bm25 * BM25_WEIGHT
        + individual_scores.jaccard * JACCARD_WEIGHT
        + individual_scores.word_overlap * OVERLAP_WEIGHT;

    let (tokens1, tokens2) = (tokenize(text1), tokenize(text2));
    let text_statistics = TextStatistics {
        text1_word_count: tokens1.len(),
        text2_word_count: tokens2.len(),
        text1_unique_words: tokens1.iter().collect::<HashSet<_>>().len(),
        text2_unique_words: tokens2.iter().collect::<HashSet<_>>().len(),
    };

    ComprehensiveSimilarity {
        weighted_average,
        individual_scores,
        tfidf,
        bm25,
        jaccard,
        word_overlap: overlap,
        text_statistics,
    }
}

/// Maps the cosine of two embedding vectors from [-1, 1] onto [0, 100].
/// Mismatched or zero-norm vectors score 0.
pub fn embedding_similarity_percentage(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let na = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let cosine = dot / (na * nb);
    if !cosine.is_finite() {
        return 0.0;
    }
    ((cosine + 1.0) * 50.0).clamp(0.0, 100.0)
}
