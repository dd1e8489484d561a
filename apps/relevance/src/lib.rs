//! Resume ↔ job relevance pipeline.
//!
//! Flow: similarity primitives and skill matching → `MatchReport` →
//!       `ScoreBreakdown` → feedback and suggestions → `EvaluationRecord`.

pub mod config;
pub mod errors;
pub mod evaluation;
pub mod feedback;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod scoring;
pub mod similarity;

pub use config::{Config, MatcherConfig, ScoringConfig};
pub use errors::{EvaluationError, MatchError, ScoringError};
pub use evaluation::{Evaluator, Regeneration, SemanticSimilarity};
pub use matching::{MatchReport, ResumeJobMatcher};
pub use models::{EvaluationRecord, JobProfile, ResumeProfile};
pub use scoring::{RelevanceScorer, ScoreBreakdown, Verdict};
