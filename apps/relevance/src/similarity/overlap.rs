//! Set-overlap measures over the word sets of two texts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::similarity::{to_percentage, tokenize};

const COMMON_SAMPLE: usize = 20;
const UNIQUE_SAMPLE: usize = 10;
const DIFFERENCE_SAMPLE: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JaccardSimilarity {
    pub jaccard_score: f64,
    pub similarity_percentage: f64,
    pub intersection_size: usize,
    pub union_size: usize,
    /// Samples only; capped for readability.
    pub common_tokens: Vec<String>,
    pub unique_to_text1: Vec<String>,
    pub unique_to_text2: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordOverlap {
    pub word_overlap_count: usize,
    pub overlap_ratio_text1: f64,
    pub overlap_ratio_text2: f64,
    pub average_overlap_ratio: f64,
    pub similarity_percentage: f64,
    pub text1_unique_words: usize,
    pub text2_unique_words: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyDifferences {
    pub only_in_text1: Vec<String>,
    pub only_in_text2: Vec<String>,
    pub common_tokens: Vec<String>,
    pub difference_percentage: f64,
    pub similarity_percentage: f64,
    pub total_unique_tokens: usize,
    pub text1_unique_count: usize,
    pub text2_unique_count: usize,
    pub common_count: usize,
}

fn word_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

fn sample<'a>(it: impl Iterator<Item = &'a String>, cap: usize) -> Vec<String> {
    it.take(cap).cloned().collect()
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// |A ∩ B| / |A ∪ B| over word sets. Two empty texts score 0.
pub fn jaccard_similarity(text1: &str, text2: &str) -> JaccardSimilarity {
    let (set1, set2) = (word_set(text1), word_set(text2));
    let intersection = set1.intersection(&set2).count();
    let union = set1.union(&set2).count();
    let score = ratio(intersection, union);

    JaccardSimilarity {
        jaccard_score: score,
        similarity_percentage: to_percentage(score),
        intersection_size: intersection,
        union_size: union,
        common_tokens: sample(set1.intersection(&set2), COMMON_SAMPLE),
        unique_to_text1: sample(set1.difference(&set2), UNIQUE_SAMPLE),
        unique_to_text2: sample(set2.difference(&set1), UNIQUE_SAMPLE),
    }
}

/// Mean of the shared fraction of each text's word set.
pub fn word_overlap(text1: &str, text2: &str) -> WordOverlap {
    let (set1, set2) = (word_set(text1), word_set(text2));
    let overlap = set1.intersection(&set2).count();
    let r1 = ratio(overlap, set1.len());
    let r2 = ratio(overlap, set2.len());
    let avg = (r1 + r2) / 2.0;

    WordOverlap {
        word_overlap_count: overlap,
        overlap_ratio_text1: r1,
        overlap_ratio_text2: r2,
        average_overlap_ratio: avg,
        similarity_percentage: to_percentage(avg),
        text1_unique_words: set1.len() - overlap,
        text2_unique_words: set2.len() - overlap,
    }
}

/// Words unique to each side and their share of the combined vocabulary.
pub fn find_key_differences(text1: &str, text2: &str) -> KeyDifferences {
    let (set1, set2) = (word_set(text1), word_set(text2));
    let only1 = set1.difference(&set2).count();
    let only2 = set2.difference(&set1).count();
    let common = set1.intersection(&set2).count();
    let total = set1.union(&set2).count();
    let difference = to_percentage(ratio(only1 + only2, total));

    KeyDifferences {
        only_in_text1: sample(set1.difference(&set2), DIFFERENCE_SAMPLE),
        only_in_text2: sample(set2.difference(&set1), DIFFERENCE_SAMPLE),
        common_tokens: sample(set1.intersection(&set2), DIFFERENCE_SAMPLE),
        difference_percentage: difference,
        similarity_percentage: 100.0 - difference,
        total_unique_tokens: total,
        text1_unique_count: only1,
        text2_unique_count: only2,
        common_count: common,
    }
}
