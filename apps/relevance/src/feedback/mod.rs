//! Feedback Generator: candidate-facing prose about one evaluation.
//!
//! The generative path is best-effort. Missing credentials, transport errors
//! and empty replies all end in the deterministic tiered feedback, which is
//! the availability guarantee of the pipeline.

pub mod prompts;
pub mod suggestions;

use std::sync::Arc;

use tracing::{info, warn};

use crate::feedback::prompts::{FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::matching::MatchReport;
use crate::models::{JobProfile, ResumeProfile};
use crate::scoring::ScoreBreakdown;

pub use suggestions::{
    generate_improvement_suggestions, generate_skill_roadmap, learning_resources,
    ImprovementSuggestion, RoadmapPhase, SkillRoadmap, SuggestionKind,
};

/// Generated feedback longer than this is cut at a word boundary.
pub const MAX_FEEDBACK_WORDS: usize = 300;

const PROMPT_REQUIRED_SKILLS: usize = 10;
const PROMPT_PREFERRED_SKILLS: usize = 5;
const PROMPT_RESUME_SKILLS: usize = 10;
const PROMPT_MATCH_SKILLS: usize = 5;

#[derive(Clone, Default)]
pub struct FeedbackGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl FeedbackGenerator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        if generator.is_none() {
            warn!("no text generator configured; feedback will be rule-based");
        }
        Self { generator }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Never fails: any generative failure is logged and replaced by
    /// `fallback_feedback`.
    pub async fn generate_personalized_feedback(
        &self,
        resume: &ResumeProfile,
        job: &JobProfile,
        score: &ScoreBreakdown,
        report: &MatchReport,
    ) -> String {
        let Some(generator) = &self.generator else {
            return fallback_feedback(score, report);
        };

        let prompt = build_feedback_prompt(resume, job, score, report);
        match generator.generate(&prompt, FEEDBACK_SYSTEM).await {
            Ok(text) if !text.trim().is_empty() => {
                info!("generated personalized feedback for '{}'", job.display_title());
                cap_words(text.trim(), MAX_FEEDBACK_WORDS)
            }
            Ok(_) => {
                warn!("text generator returned empty feedback, using rule-based feedback");
                fallback_feedback(score, report)
            }
            Err(e) => {
                warn!("feedback generation failed, using rule-based feedback: {e}");
                fallback_feedback(score, report)
            }
        }
    }
}

fn listed(skills: &[String], n: usize) -> String {
    if skills.is_empty() {
        return "None".to_string();
    }
    skills.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub(crate) fn build_feedback_prompt(
    resume: &ResumeProfile,
    job: &JobProfile,
    score: &ScoreBreakdown,
    report: &MatchReport,
) -> String {
    let exact = &report.exact_skill_match;
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{job_title}", job.display_title())
        .replace("{company}", job.display_company())
        .replace(
            "{required_skills}",
            &listed(&job.required_skills, PROMPT_REQUIRED_SKILLS),
        )
        .replace(
            "{preferred_skills}",
            &listed(&job.preferred_skills, PROMPT_PREFERRED_SKILLS),
        )
        .replace("{final_score}", &format!("{:.1}", score.final_score))
        .replace("{verdict}", &score.verdict.to_string())
        .replace("{resume_skills}", &listed(&resume.skills, PROMPT_RESUME_SKILLS))
        .replace(
            "{matched_skills}",
            &listed(&exact.matched_skills, PROMPT_MATCH_SKILLS),
        )
        .replace(
            "{missing_skills}",
            &listed(&exact.missing_skills, PROMPT_MATCH_SKILLS),
        )
        .replace(
            "{has_experience}",
            yes_no(report.experience_match.has_experience),
        )
        .replace("{has_degree}", yes_no(report.education_match.has_degree))
}

/// Rule-based feedback keyed on the score tier. Deterministic.
pub fn fallback_feedback(score: &ScoreBreakdown, report: &MatchReport) -> String {
    let matched = report.exact_skill_match.matched_skills.len();
    let missing = &report.exact_skill_match.missing_skills;
    let first = |n: usize| missing.iter().take(n).cloned().collect::<Vec<_>>().join(", ");

    let mut parts: Vec<String> = Vec::new();
    if score.final_score >= score.thresholds.high_threshold {
        parts.push(
            "Excellent match! Your resume shows strong alignment with the job requirements."
                .to_string(),
        );
        parts.push(format!(
            "You have {matched} key skills that match perfectly."
        ));
        if !missing.is_empty() {
            parts.push(format!(
                "To further strengthen your profile, consider gaining experience in: {}.",
                first(3)
            ));
        }
    } else if score.final_score >= score.thresholds.medium_threshold {
        parts.push(
            "Good foundation! Your resume has moderate alignment with the job requirements."
                .to_string(),
        );
        parts.push(format!("You match {matched} key skills."));
        if !missing.is_empty() {
            parts.push(format!(
                "Focus on developing these critical skills: {}.",
                first(5)
            ));
        }
        parts.push("Consider adding relevant projects or certifications in these areas.".to_string());
    } else {
        parts.push(
            "Significant gaps identified. Your resume needs substantial improvements for this role."
                .to_string(),
        );
        if !missing.is_empty() {
            parts.push(format!("Priority skills to develop: {}.", first(5)));
        }
        parts.push(
            "Consider taking online courses, building projects, or gaining certifications in these areas."
                .to_string(),
        );
        parts.push("Focus on the most in-demand skills first.".to_string());
    }
    parts.join(" ")
}

/// Truncates after `max` words, keeping the spacing before the cut.
pub(crate) fn cap_words(text: &str, max: usize) -> String {
    let mut words = 0;
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
            if words > max {
                return format!("{}...", text[..i].trim_end());
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::scoring::{ThresholdsUsed, Verdict, WeightsUsed};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    fn breakdown(final_score: f64, verdict: Verdict) -> ScoreBreakdown {
        ScoreBreakdown {
            final_score,
            verdict,
            keyword_score: 0.0,
            semantic_score: 0.0,
            base_weighted_score: 0.0,
            bonus_score: 0.0,
            weights_used: WeightsUsed {
                semantic_weight: 0.6,
                keyword_weight: 0.4,
            },
            thresholds: ThresholdsUsed {
                high_threshold: 75.0,
                medium_threshold: 50.0,
            },
        }
    }

    fn report(matched: &[&str], missing: &[&str]) -> MatchReport {
        let mut report = MatchReport::default();
        report.exact_skill_match.matched_skills = matched.iter().map(|s| s.to_string()).collect();
        report.exact_skill_match.missing_skills = missing.iter().map(|s| s.to_string()).collect();
        report
    }

    #[test]
    fn test_fallback_tiers() {
        let r = report(&["python", "sql"], &["aws", "docker", "kafka", "go"]);

        let high = fallback_feedback(&breakdown(80.0, Verdict::High), &r);
        assert!(high.starts_with("Excellent match!"));
        assert!(high.contains("You have 2 key skills"));
        assert!(high.contains("aws, docker, kafka."));

        let medium = fallback_feedback(&breakdown(60.0, Verdict::Medium), &r);
        assert!(medium.starts_with("Good foundation!"));
        assert!(medium.contains("aws, docker, kafka, go."));

        let low = fallback_feedback(&breakdown(20.0, Verdict::Low), &r);
        assert!(low.starts_with("Significant gaps identified."));
        assert!(low.contains("Priority skills to develop: aws"));
    }

    #[test]
    fn test_fallback_tiers_follow_breakdown_thresholds() {
        let r = report(&["python"], &["aws"]);
        let mut strict = breakdown(80.0, Verdict::Medium);
        strict.thresholds = ThresholdsUsed {
            high_threshold: 90.0,
            medium_threshold: 70.0,
        };
        assert!(fallback_feedback(&strict, &r).starts_with("Good foundation!"));

        strict.final_score = 60.0;
        assert!(fallback_feedback(&strict, &r).starts_with("Significant gaps identified."));

        strict.final_score = 90.0;
        assert!(fallback_feedback(&strict, &r).starts_with("Excellent match!"));
    }

    #[test]
    fn test_fallback_skips_empty_missing_clause() {
        let r = report(&["python"], &[]);
        let high = fallback_feedback(&breakdown(90.0, Verdict::High), &r);
        assert!(!high.contains("consider gaining"));
        let low = fallback_feedback(&breakdown(10.0, Verdict::Low), &r);
        assert!(!low.contains("Priority skills"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let r = report(&["python"], &["aws"]);
        let s = breakdown(55.0, Verdict::Medium);
        assert_eq!(fallback_feedback(&s, &r), fallback_feedback(&s, &r));
    }

    #[tokio::test]
    async fn test_no_generator_uses_fallback() {
        let feedback = FeedbackGenerator::new(None);
        let r = report(&[], &["aws"]);
        let s = breakdown(30.0, Verdict::Low);
        let text = feedback
            .generate_personalized_feedback(&ResumeProfile::default(), &JobProfile::default(), &s, &r)
            .await;
        assert_eq!(text, fallback_feedback(&s, &r));
        assert!(!text.is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back() {
        let failing = Arc::new(FailingGenerator {
            calls: AtomicUsize::new(0),
        });
        let feedback = FeedbackGenerator::new(Some(failing.clone()));
        let r = report(&["python"], &["aws"]);
        let s = breakdown(77.0, Verdict::High);
        let text = feedback
            .generate_personalized_feedback(&ResumeProfile::default(), &JobProfile::default(), &s, &r)
            .await;
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert!(text.starts_with("Excellent match!"));
    }

    #[tokio::test]
    async fn test_empty_generation_falls_back() {
        let feedback = FeedbackGenerator::new(Some(Arc::new(FixedGenerator("   ".to_string()))));
        let r = report(&[], &[]);
        let s = breakdown(10.0, Verdict::Low);
        let text = feedback
            .generate_personalized_feedback(&ResumeProfile::default(), &JobProfile::default(), &s, &r)
            .await;
        assert!(text.starts_with("Significant gaps identified."));
    }

    #[tokio::test]
    async fn test_generated_feedback_is_word_capped() {
        let long = "word ".repeat(400);
        let feedback = FeedbackGenerator::new(Some(Arc::new(FixedGenerator(long))));
        let text = feedback
            .generate_personalized_feedback(
                &ResumeProfile::default(),
                &JobProfile::default(),
                &breakdown(50.0, Verdict::Medium),
                &MatchReport::default(),
            )
            .await;
        assert_eq!(text.split_whitespace().count(), MAX_FEEDBACK_WORDS);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_prompt_carries_profile_context() {
        let resume = ResumeProfile {
            skills: vec!["Python".to_string(), "SQL".to_string()],
            ..Default::default()
        };
        let job = JobProfile {
            title: "Data Analyst".to_string(),
            required_skills: (0..12).map(|i| format!("req{i}")).collect(),
            ..Default::default()
        };
        let mut r = report(&["python"], &["aws"]);
        r.education_match.has_degree = true;

        let prompt = build_feedback_prompt(&resume, &job, &breakdown(76.0, Verdict::High), &r);
        assert!(prompt.contains("Position: Data Analyst at Company"));
        assert!(prompt.contains("req9"));
        assert!(!prompt.contains("req10"));
        assert!(prompt.contains("Preferred Skills: None"));
        assert!(prompt.contains("Overall Relevance Score: 76.0/100"));
        assert!(prompt.contains("Verdict: High suitability"));
        assert!(prompt.contains("Has Work Experience: No"));
        assert!(prompt.contains("Has Degree: Yes"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_cap_words_keeps_short_text() {
        assert_eq!(cap_words("a  b\nc", 3), "a  b\nc");
        assert_eq!(cap_words("a b c d", 2), "a b...");
    }
}
