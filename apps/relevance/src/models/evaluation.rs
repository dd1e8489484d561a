use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feedback::{ImprovementSuggestion, SkillRoadmap};
use crate::scoring::{SkillGapAnalysis, Verdict};

/// One completed evaluation, shaped for the persistence collaborator.
/// Records are keyed by (resume_id, job_id); `id` survives regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: Uuid,
    pub resume_id: Option<String>,
    pub job_id: Option<String>,

    pub relevance_score: f64,
    pub keyword_score: f64,
    pub semantic_score: f64,
    pub verdict: Verdict,

    pub missing_skills: Vec<String>,
    pub missing_projects: Vec<String>,
    pub missing_certifications: Vec<String>,
    pub missing_experience: Vec<String>,

    pub feedback: String,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    pub skill_roadmap: SkillRoadmap,
    pub matched_skills: Vec<String>,
    pub skill_gaps: SkillGapAnalysis,

    pub evaluation_date: DateTime<Utc>,
    pub processing_time_secs: f64,
}
