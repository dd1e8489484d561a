//! Match Aggregator: runs every matcher over one resume/job pair and merges
//! the results into a single `MatchReport`.
//!
//! Each similarity method recovers from its own failures (reported as 0% with
//! an `error` field). The aggregator itself fails only when an input mapping is
//! rejected at the boundary or when the merged report contains a value outside
//! [0, 100]; in both cases no report is returned.

pub mod fuzz;
pub mod skills;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::MatcherConfig;
use crate::errors::{ConfigError, MatchError};
use crate::models::{ExperienceRecord, JobProfile, ResumeProfile};
use crate::similarity::{
    bm25_similarity, tfidf_similarity, Bm25Similarity, TfidfSimilarity, TfidfVectorizer,
};

pub use skills::{
    exact_skill_match, fuzzy_skill_match, ExactMatchResult, FuzzyMatchResult, FuzzySkillMatch,
};

const EXPERIENCE_DETAILS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceMatch {
    pub resume_max_years: f64,
    pub has_experience: bool,
    pub experience_details: Vec<ExperienceRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationMatch {
    pub has_degree: bool,
    /// Non-empty degree names, in resume order.
    pub education_types: Vec<String>,
    pub education_details: Vec<crate::models::EducationRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    /// Exact required-skill coverage.
    pub skills_covered: f64,
    /// TF-IDF similarity percentage.
    pub text_similarity: f64,
    /// BM25 similarity percentage.
    pub keyword_relevance: f64,
}

/// Everything the scorer and feedback stages need about one resume/job pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Resume skills against the job's required skills.
    pub exact_skill_match: ExactMatchResult,
    /// Resume skills against required followed by preferred skills.
    pub fuzzy_skill_match: FuzzyMatchResult,
    /// Okapi BM25 averaged over both directions (each text as query against the other).
    pub bm25_match: Bm25Similarity,
    pub tfidf_match: TfidfSimilarity,
    pub experience_match: ExperienceMatch,
    pub education_match: EducationMatch,
    pub overall_metrics: OverallMetrics,
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher
// ────────────────────────────────────────────────────────────────────────────

/// Stateless across calls: the vectorizer keeps only its parameters and is
/// refit for every pair, so one matcher can serve concurrent evaluations.
#[derive(Debug, Clone)]
pub struct ResumeJobMatcher {
    config: MatcherConfig,
    vectorizer: TfidfVectorizer,
}

impl Default for ResumeJobMatcher {
    fn default() -> Self {
        let config = MatcherConfig::default();
        Self {
            vectorizer: TfidfVectorizer::new(config.max_features),
            config,
        }
    }
}

impl ResumeJobMatcher {
    pub fn new(config: MatcherConfig) -> Result<Self, ConfigError> {
        if config.fuzzy_threshold > 100 {
            return Err(ConfigError::FuzzyThreshold(config.fuzzy_threshold.into()));
        }
        Ok(Self {
            vectorizer: TfidfVectorizer::new(config.max_features),
            config,
        })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Parses both mappings at the boundary, then matches them.
    pub fn comprehensive_match_value(
        &self,
        resume: &Value,
        job: &Value,
    ) -> Result<MatchReport, MatchError> {
        let resume = ResumeProfile::from_value(resume)?;
        let job = JobProfile::from_value(job)?;
        self.comprehensive_match(&resume, &job)
    }

    pub fn comprehensive_match(
        &self,
        resume: &ResumeProfile,
        job: &JobProfile,
    ) -> Result<MatchReport, MatchError> {
        let exact = exact_skill_match(&resume.skills, &job.required_skills);
        let fuzzy = fuzzy_skill_match(&resume.skills, &job.all_skills(), self.config.fuzzy_threshold);
        debug!(
            "skills: exact {:.2}% fuzzy {:.2}% ({} job skills)",
            exact.match_percentage,
            fuzzy.fuzzy_match_percentage,
            job.required_skills.len() + job.preferred_skills.len()
        );

        let bm25 = bm25_similarity(&resume.clean_text, &job.clean_text).unwrap_or_else(|e| {
            warn!("BM25 keyword match failed, counting it as 0: {e}");
            Bm25Similarity::failed(&e)
        });
        let tfidf = tfidf_similarity(
            &resume.clean_text,
            &job.clean_text,
            &self.vectorizer,
            self.config.top_job_features,
        )
        .unwrap_or_else(|e| {
            warn!("TF-IDF match failed, counting it as 0: {e}");
            TfidfSimilarity::failed(&e)
        });

        let experience_match = ExperienceMatch {
            resume_max_years: resume.max_years(),
            has_experience: !resume.experience.is_empty(),
            experience_details: resume
                .experience
                .iter()
                .take(EXPERIENCE_DETAILS)
                .cloned()
                .collect(),
        };

        let education_match = EducationMatch {
            has_degree: !resume.education.is_empty(),
            education_types: resume
                .education
                .iter()
                .map(|e| e.degree.trim())
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect(),
            education_details: resume.education.clone(),
        };

        let overall_metrics = OverallMetrics {
            skills_covered: exact.match_percentage,
            text_similarity: tfidf.similarity_percentage,
            keyword_relevance: bm25.similarity_percentage,
        };

        let report = MatchReport {
            exact_skill_match: exact,
            fuzzy_skill_match: fuzzy,
            bm25_match: bm25,
            tfidf_match: tfidf,
            experience_match,
            education_match,
            overall_metrics,
        };
        check_report(&report)?;

        info!(
            "match complete: skills {:.2}% text {:.2}% keywords {:.2}%",
            report.overall_metrics.skills_covered,
            report.overall_metrics.text_similarity,
            report.overall_metrics.keyword_relevance
        );
        Ok(report)
    }
}

fn check_report(report: &MatchReport) -> Result<(), MatchError> {
    let percentages = [
        (
            "exact_skill_match.match_percentage",
            report.exact_skill_match.match_percentage,
        ),
        (
            "fuzzy_skill_match.fuzzy_match_percentage",
            report.fuzzy_skill_match.fuzzy_match_percentage,
        ),
        (
            "bm25_match.similarity_percentage",
            report.bm25_match.similarity_percentage,
        ),
        (
            "tfidf_match.similarity_percentage",
            report.tfidf_match.similarity_percentage,
        ),
    ];
    for (field, value) in percentages {
        if !(0.0..=100.0).contains(&value) {
            return Err(MatchError::OutOfRange { field, value });
        }
    }

    let years = report.experience_match.resume_max_years;
    if !years.is_finite() || years < 0.0 {
        return Err(MatchError::OutOfRange {
            field: "experience_match.resume_max_years",
            value: years,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_resume() -> Value {
        json!({
            "skills": ["Python", "SQL", "Tableau"],
            "experience": [
                {"title": "Data Analyst", "company": "Acme", "years": 3},
                {"title": "Intern", "years": "unknown"},
                "Volunteer tutor",
                {"title": "Freelancer", "years": 1}
            ],
            "education": [{"degree": "B.Sc Statistics"}, "MOOC certificates"],
            "clean_text": "Data analyst with Python and SQL. Built Tableau dashboards and ETL jobs."
        })
    }

    fn sample_job() -> Value {
        json!({
            "title": "Data Analyst",
            "company": "Globex",
            "required_skills": ["python", "sql", "aws"],
            "preferred_skills": ["Tableau"],
            "clean_text": "Data analyst role requiring Python, SQL and AWS to build dashboards."
        })
    }

    #[test]
    fn test_comprehensive_match_merges_all_matchers() {
        let matcher = ResumeJobMatcher::default();
        let report = matcher
            .comprehensive_match_value(&sample_resume(), &sample_job())
            .unwrap();

        assert!((report.exact_skill_match.match_percentage - 66.67).abs() < 0.01);
        assert_eq!(report.exact_skill_match.missing_skills, vec!["aws"]);
        // fuzzy runs over required + preferred
        assert_eq!(report.fuzzy_skill_match.fuzzy_match_percentage, 75.0);
        assert!(report.tfidf_match.similarity_percentage > 0.0);
        assert!(report.bm25_match.similarity_percentage > 0.0);

        assert_eq!(
            report.overall_metrics.skills_covered,
            report.exact_skill_match.match_percentage
        );
        assert_eq!(
            report.overall_metrics.text_similarity,
            report.tfidf_match.similarity_percentage
        );
        assert_eq!(
            report.overall_metrics.keyword_relevance,
            report.bm25_match.similarity_percentage
        );
    }

    #[test]
    fn test_experience_and_education_details() {
        let report = ResumeJobMatcher::default()
            .comprehensive_match_value(&sample_resume(), &sample_job())
            .unwrap();

        assert!(report.experience_match.has_experience);
        assert_eq!(report.experience_match.resume_max_years, 3.0);
        assert_eq!(report.experience_match.experience_details.len(), 3);
        assert!(report.education_match.has_degree);
        assert_eq!(report.education_match.education_types, vec!["B.Sc Statistics"]);
        assert_eq!(report.education_match.education_details.len(), 2);
    }

    #[test]
    fn test_empty_profiles_degrade_to_zero() {
        let report = ResumeJobMatcher::default()
            .comprehensive_match_value(&json!({}), &json!({}))
            .unwrap();

        assert_eq!(report.exact_skill_match.match_percentage, 0.0);
        assert_eq!(report.fuzzy_skill_match.fuzzy_match_percentage, 0.0);
        assert_eq!(report.tfidf_match.similarity_percentage, 0.0);
        assert_eq!(report.bm25_match.similarity_percentage, 0.0);
        assert!(!report.experience_match.has_experience);
        assert!(!report.education_match.has_degree);
    }

    #[test]
    fn test_rejected_mapping_yields_no_report() {
        let err = ResumeJobMatcher::default()
            .comprehensive_match_value(&json!("not a mapping"), &sample_job())
            .unwrap_err();
        assert!(matches!(err, MatchError::Profile(_)));
    }

    #[test]
    fn test_out_of_range_report_is_rejected() {
        let mut report = MatchReport::default();
        report.tfidf_match.similarity_percentage = 140.0;
        assert!(matches!(
            check_report(&report),
            Err(MatchError::OutOfRange {
                field: "tfidf_match.similarity_percentage",
                ..
            })
        ));

        let mut report = MatchReport::default();
        report.bm25_match.similarity_percentage = f64::NAN;
        assert!(check_report(&report).is_err());
    }

    #[test]
    fn test_custom_fuzzy_threshold_is_used() {
        let matcher = ResumeJobMatcher::new(MatcherConfig {
            fuzzy_threshold: 100,
            ..MatcherConfig::default()
        })
        .unwrap();
        let report = matcher
            .comprehensive_match_value(&sample_resume(), &sample_job())
            .unwrap();
        assert_eq!(report.fuzzy_skill_match.threshold_used, 100);
    }

    #[test]
    fn test_invalid_fuzzy_threshold_rejected() {
        let err = ResumeJobMatcher::new(MatcherConfig {
            fuzzy_threshold: 101,
            ..MatcherConfig::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::FuzzyThreshold(101));
    }

    #[test]
    fn test_repeated_matches_are_identical() {
        let matcher = ResumeJobMatcher::default();
        let a = matcher
            .comprehensive_match_value(&sample_resume(), &sample_job())
            .unwrap();
        let b = matcher
            .comprehensive_match_value(&sample_resume(), &sample_job())
            .unwrap();
        assert_eq!(a, b);
    }
}
