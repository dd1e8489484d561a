//! Evaluation: orchestrates the full pipeline for one resume/job pair.
//!
//! Flow: match → embedding similarity (optional) → score → gap analysis →
//!       feedback → suggestions and roadmap → `EvaluationRecord`.
//!
//! Only matching and scoring can abort a run. The embedding collaborator and
//! the text generator are best-effort and degrade to TF-IDF-only semantics
//! and rule-based feedback respectively.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{ConfigError, EvaluationError, MatchError};
use crate::feedback::{generate_improvement_suggestions, generate_skill_roadmap, FeedbackGenerator};
use crate::llm_client::TextGenerator;
use crate::matching::ResumeJobMatcher;
use crate::models::{EvaluationRecord, JobProfile, ResumeProfile};
use crate::scoring::{
    generate_missing_elements, generate_skill_gap_analysis, round2, RelevanceScorer,
};

// ────────────────────────────────────────────────────────────────────────────
// Collaborator seam
// ────────────────────────────────────────────────────────────────────────────

/// Embedding-based similarity between resume and job text, as a percentage
/// in [0, 100]. Implementations live outside the pipeline.
#[async_trait]
pub trait SemanticSimilarity: Send + Sync {
    async fn similarity(&self, resume_text: &str, job_text: &str) -> anyhow::Result<f64>;
}

/// Result of re-running an evaluation for an existing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regeneration {
    pub evaluation: EvaluationRecord,
    pub score_updated: bool,
    pub previous_score: f64,
    pub new_score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct Evaluator {
    matcher: ResumeJobMatcher,
    scorer: RelevanceScorer,
    feedback: FeedbackGenerator,
    semantic: Option<Arc<dyn SemanticSimilarity>>,
}

impl Evaluator {
    pub fn new(
        matcher: ResumeJobMatcher,
        scorer: RelevanceScorer,
        feedback: FeedbackGenerator,
    ) -> Self {
        Self {
            matcher,
            scorer,
            feedback,
            semantic: None,
        }
    }

    /// Builds every stage from loaded configuration.
    pub fn from_config(
        config: &Config,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            ResumeJobMatcher::new(config.matcher)?,
            RelevanceScorer::new(config.scoring)?,
            FeedbackGenerator::new(generator),
        ))
    }

    pub fn with_semantic_similarity(mut self, semantic: Arc<dyn SemanticSimilarity>) -> Self {
        self.semantic = Some(semantic);
        self
    }

    /// Parses both mappings at the boundary, then evaluates them.
    pub async fn evaluate_value(
        &self,
        resume: &Value,
        job: &Value,
    ) -> Result<EvaluationRecord, EvaluationError> {
        let resume = ResumeProfile::from_value(resume).map_err(MatchError::from)?;
        let job = JobProfile::from_value(job).map_err(MatchError::from)?;
        self.evaluate(&resume, &job).await
    }

    pub async fn evaluate(
        &self,
        resume: &ResumeProfile,
        job: &JobProfile,
    ) -> Result<EvaluationRecord, EvaluationError> {
        let started = Instant::now();

        // Step 1: Match
        info!(
            "Evaluating resume {:?} against '{}'",
            resume.id,
            job.display_title()
        );
        let report = self.matcher.comprehensive_match(resume, job)?;

        // Step 2: Embedding similarity (optional)
        let embedding = self.embedding_similarity(resume, job).await;

        // Step 3: Score
        let score = self
            .scorer
            .calculate_comprehensive_score(&report, embedding)?;
        info!("Relevance: {}/100 ({})", score.final_score, score.verdict);

        // Step 4: Gaps
        let missing = generate_missing_elements(&report);
        let skill_gaps = generate_skill_gap_analysis(&report);

        // Step 5: Feedback
        let feedback = self
            .feedback
            .generate_personalized_feedback(resume, job, &score, &report)
            .await;

        // Step 6: Suggestions and roadmap
        let improvement_suggestions = generate_improvement_suggestions(&missing, job);
        let skill_roadmap = generate_skill_roadmap(&resume.skills, &missing.skills);

        let record = EvaluationRecord {
            id: Uuid::new_v4(),
            resume_id: resume.id.clone(),
            job_id: job.id.clone(),
            relevance_score: score.final_score,
            keyword_score: score.keyword_score,
            semantic_score: score.semantic_score,
            verdict: score.verdict,
            missing_skills: missing.skills,
            missing_projects: missing.projects,
            missing_certifications: missing.certifications,
            missing_experience: missing.experience,
            feedback,
            improvement_suggestions,
            skill_roadmap,
            matched_skills: report.exact_skill_match.matched_skills,
            skill_gaps,
            evaluation_date: Utc::now(),
            processing_time_secs: round2(started.elapsed().as_secs_f64()),
        };

        info!(
            "Evaluation {} complete in {:.2}s",
            record.id, record.processing_time_secs
        );
        Ok(record)
    }

    /// Re-runs the pipeline for an existing record. The record keeps its id
    /// and keys; everything else is recomputed.
    pub async fn regenerate(
        &self,
        previous: &EvaluationRecord,
        resume: &ResumeProfile,
        job: &JobProfile,
    ) -> Result<Regeneration, EvaluationError> {
        let mut evaluation = self.evaluate(resume, job).await?;
        evaluation.id = previous.id;
        evaluation.resume_id = previous.resume_id.clone().or(evaluation.resume_id);
        evaluation.job_id = previous.job_id.clone().or(evaluation.job_id);

        let new_score = evaluation.relevance_score;
        let score_updated = new_score != previous.relevance_score;
        info!(
            "Regenerated evaluation {}: {} → {}",
            previous.id, previous.relevance_score, new_score
        );

        Ok(Regeneration {
            evaluation,
            score_updated,
            previous_score: previous.relevance_score,
            new_score,
        })
    }

    async fn embedding_similarity(&self, resume: &ResumeProfile, job: &JobProfile) -> Option<f64> {
        let semantic = self.semantic.as_ref()?;
        match semantic.similarity(&resume.clean_text, &job.clean_text).await {
            Ok(value) if (0.0..=100.0).contains(&value) => Some(value),
            Ok(value) => {
                warn!("Embedding similarity {value} is outside 0..=100, using TF-IDF only");
                None
            }
            Err(e) => {
                warn!("Embedding similarity failed, using TF-IDF only: {e:#}");
                None
            }
        }
    }
}
