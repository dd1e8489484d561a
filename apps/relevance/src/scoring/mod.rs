//! Relevance Scorer: turns a `MatchReport` into a final 0–100 score and verdict.
//!
//! Pure function of (report, configuration): no I/O, no shared state.
//!
//! keyword   = exact·0.5 + fuzzy·0.3 + bm25·0.2                     (cap 100)
//! semantic  = tfidf, or tfidf·0.4 + embedding·0.6 when supplied      (cap 100)
//! bonus     = 5 experience + 3 degree + 7 exact skills above 80%     (cap 15)
//! base      = semantic·semantic_weight + keyword·keyword_weight      (cap 100)
//! final     = min(100, base + bonus), rounded to two decimals

pub mod gaps;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::ScoringConfig;
use crate::errors::{ConfigError, ScoringError};
use crate::matching::MatchReport;

pub use gaps::{
    generate_missing_elements, generate_skill_gap_analysis, MissingElements, Priority, RankedSkill,
    SkillGapAnalysis,
};

const EXACT_KEYWORD_WEIGHT: f64 = 0.5;
const FUZZY_KEYWORD_WEIGHT: f64 = 0.3;
const BM25_KEYWORD_WEIGHT: f64 = 0.2;

const TFIDF_SEMANTIC_WEIGHT: f64 = 0.4;
const EMBEDDING_SEMANTIC_WEIGHT: f64 = 0.6;

const EXPERIENCE_BONUS: f64 = 5.0;
const DEGREE_BONUS: f64 = 3.0;
const SKILL_MATCH_BONUS: f64 = 7.0;
/// Exact skill coverage must be strictly above this to earn `SKILL_MATCH_BONUS`.
const SKILL_MATCH_BONUS_ABOVE: f64 = 80.0;
const MAX_BONUS: f64 = 15.0;

const MAX_SCORE: f64 = 100.0;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    High,
    Medium,
    Low,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::High => "High",
            Verdict::Medium => "Medium",
            Verdict::Low => "Low",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightsUsed {
    pub semantic_weight: f64,
    pub keyword_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsUsed {
    pub high_threshold: f64,
    pub medium_threshold: f64,
}

/// Final score with every intermediate value and the configuration that
/// produced it. All scores are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub final_score: f64,
    pub verdict: Verdict,
    pub keyword_score: f64,
    pub semantic_score: f64,
    pub base_weighted_score: f64,
    pub bonus_score: f64,
    pub weights_used: WeightsUsed,
    pub thresholds: ThresholdsUsed,
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
    config: ScoringConfig,
}

impl RelevanceScorer {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn calculate_keyword_score(&self, report: &MatchReport) -> f64 {
        let score = report.exact_skill_match.match_percentage * EXACT_KEYWORD_WEIGHT
            + report.fuzzy_skill_match.fuzzy_match_percentage * FUZZY_KEYWORD_WEIGHT
            + report.bm25_match.similarity_percentage * BM25_KEYWORD_WEIGHT;
        score.min(MAX_SCORE)
    }

    pub fn calculate_semantic_score(
        &self,
        report: &MatchReport,
        embedding_similarity: Option<f64>,
    ) -> f64 {
        let tfidf = report.tfidf_match.similarity_percentage;
        let score = match embedding_similarity {
            Some(embedding) => {
                tfidf * TFIDF_SEMANTIC_WEIGHT + embedding * EMBEDDING_SEMANTIC_WEIGHT
            }
            None => tfidf,
        };
        score.min(MAX_SCORE)
    }

    pub fn calculate_bonus_score(&self, report: &MatchReport) -> f64 {
        let mut bonus = 0.0;
        if report.experience_match.has_experience {
            bonus += EXPERIENCE_BONUS;
        }
        if report.education_match.has_degree {
            bonus += DEGREE_BONUS;
        }
        if report.exact_skill_match.match_percentage > SKILL_MATCH_BONUS_ABOVE {
            bonus += SKILL_MATCH_BONUS;
        }
        f64::min(bonus, MAX_BONUS)
    }

    pub fn calculate_weighted_score(&self, keyword_score: f64, semantic_score: f64) -> f64 {
        let score = semantic_score * self.config.semantic_weight
            + keyword_score * self.config.keyword_weight;
        score.min(MAX_SCORE)
    }

    pub fn determine_verdict(&self, final_score: f64) -> Verdict {
        if final_score >= self.config.high_threshold {
            Verdict::High
        } else if final_score >= self.config.medium_threshold {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }

    /// Scores one match report. `embedding_similarity`, when supplied, must be
    /// a finite percentage. The verdict is taken from the rounded final score so
    /// the reported pair always agrees with the thresholds.
    pub fn calculate_comprehensive_score(
        &self,
        report: &MatchReport,
        embedding_similarity: Option<f64>,
    ) -> Result<ScoreBreakdown, ScoringError> {
        if let Some(e) = embedding_similarity {
            if !(0.0..=MAX_SCORE).contains(&e) {
                error!("rejecting embedding similarity {e}");
                return Err(ScoringError::InvalidEmbedding(e));
            }
        }

        let keyword_score = finite("keyword", self.calculate_keyword_score(report))?;
        let semantic_score = finite(
            "semantic",
            self.calculate_semantic_score(report, embedding_similarity),
        )?;
        let bonus_score = self.calculate_bonus_score(report);
        let base_weighted_score = finite(
            "base weighted",
            self.calculate_weighted_score(keyword_score, semantic_score),
        )?;

        let final_score = round2((base_weighted_score + bonus_score).clamp(0.0, MAX_SCORE));
        let verdict = self.determine_verdict(final_score);

        debug!(
            "score: keyword {keyword_score:.2} semantic {semantic_score:.2} \
             base {base_weighted_score:.2} bonus {bonus_score:.2} → {final_score} ({verdict})"
        );

        Ok(ScoreBreakdown {
            final_score,
            verdict,
            keyword_score: round2(keyword_score),
            semantic_score: round2(semantic_score),
            base_weighted_score: round2(base_weighted_score),
            bonus_score: round2(bonus_score),
            weights_used: WeightsUsed {
                semantic_weight: self.config.semantic_weight,
                keyword_weight: self.config.keyword_weight,
            },
            thresholds: ThresholdsUsed {
                high_threshold: self.config.high_threshold,
                medium_threshold: self.config.medium_threshold,
            },
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        error!("{name} score is not finite: {value}");
        Err(ScoringError::NonFinite(name))
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
