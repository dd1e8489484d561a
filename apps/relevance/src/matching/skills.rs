//! Exact and fuzzy comparison of a candidate's skills against a job's skills.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::matching::fuzz::best_ratio;

pub const DEFAULT_FUZZY_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExactMatchResult {
    /// Lowercased job skills found verbatim among the resume skills.
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_percentage: f64,
    pub matched_count: usize,
    pub total_required: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySkillMatch {
    pub job_skill: String,
    pub resume_skill: String,
    pub similarity: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatchResult {
    pub matched_skills: Vec<FuzzySkillMatch>,
    pub missing_skills: Vec<String>,
    pub skill_similarities: BTreeMap<String, u8>,
    pub fuzzy_match_percentage: f64,
    pub threshold_used: u8,
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Case-insensitive membership of each job skill in the resume skills.
/// An empty job list yields 0%, not an error.
pub fn exact_skill_match(resume_skills: &[String], job_skills: &[String]) -> ExactMatchResult {
    let have: HashSet<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();

    let (matched, missing): (Vec<String>, Vec<String>) = job_skills
        .iter()
        .map(|s| s.to_lowercase())
        .partition(|s| have.contains(s));

    ExactMatchResult {
        match_percentage: percentage(matched.len(), job_skills.len()),
        matched_count: matched.len(),
        total_required: job_skills.len(),
        matched_skills: matched,
        missing_skills: missing,
    }
}

/// For every job skill, the best-scoring resume skill under `best_ratio`.
/// The first resume skill reaching the maximum wins ties. A job skill is
/// matched when that best score is at least `threshold`.
pub fn fuzzy_skill_match(
    resume_skills: &[String],
    job_skills: &[String],
    threshold: u8,
) -> FuzzyMatchResult {
    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();
    let mut skill_similarities = BTreeMap::new();

    for job_skill in job_skills {
        let mut best: Option<(&String, u8)> = None;
        for resume_skill in resume_skills {
            let score = best_ratio(job_skill, resume_skill);
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((resume_skill, score));
            }
        }

        match best {
            Some((resume_skill, score)) if score >= threshold => {
                skill_similarities.insert(job_skill.clone(), score);
                matched_skills.push(FuzzySkillMatch {
                    job_skill: job_skill.clone(),
                    resume_skill: resume_skill.clone(),
                    similarity: score,
                });
            }
            _ => missing_skills.push(job_skill.clone()),
        }
    }

    FuzzyMatchResult {
        fuzzy_match_percentage: percentage(matched_skills.len(), job_skills.len()),
        matched_skills,
        missing_skills,
        skill_similarities,
        threshold_used: threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_scenario() {
        let r = exact_skill_match(&skills(&["python", "sql"]), &skills(&["python", "sql", "aws"]));
        assert!((r.match_percentage - 66.67).abs() < 0.01);
        assert_eq!(r.matched_skills, vec!["python", "sql"]);
        assert_eq!(r.missing_skills, vec!["aws"]);
        assert_eq!(r.matched_count, 2);
        assert_eq!(r.total_required, 3);
    }

    #[test]
    fn test_exact_match_empty_job_list() {
        let r = exact_skill_match(&skills(&["python"]), &[]);
        assert_eq!(r.match_percentage, 0.0);
        assert!(r.matched_skills.is_empty());
        assert!(r.missing_skills.is_empty());
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let r = exact_skill_match(&skills(&["Python", "SQL"]), &skills(&["python", "Sql"]));
        assert_eq!(r.match_percentage, 100.0);
    }

    #[test]
    fn test_exact_match_bounded() {
        let r = exact_skill_match(&skills(&["a", "b", "c"]), &skills(&["a"]));
        assert_eq!(r.match_percentage, 100.0);
    }

    #[test]
    fn test_fuzzy_matches_spelling_variants() {
        let r = fuzzy_skill_match(
            &skills(&["Machine Learning", "PostgreSQL"]),
            &skills(&["learning machine", "Postgres", "Kubernetes"]),
            DEFAULT_FUZZY_THRESHOLD,
        );
        assert_eq!(r.matched_skills.len(), 2);
        assert_eq!(r.missing_skills, vec!["Kubernetes"]);
        assert_eq!(r.skill_similarities["Postgres"], 100);
        assert!((r.fuzzy_match_percentage - 66.67).abs() < 0.01);
        assert_eq!(r.threshold_used, 80);
    }

    #[test]
    fn test_fuzzy_matches_skill_at_edge_of_longer_skill() {
        let r = fuzzy_skill_match(
            &skills(&["Amazon AWS"]),
            &skills(&["AWS3"]),
            DEFAULT_FUZZY_THRESHOLD,
        );
        assert_eq!(r.matched_skills.len(), 1);
        assert_eq!(r.skill_similarities["AWS3"], 86);
        assert!(r.missing_skills.is_empty());
    }

    #[test]
    fn test_fuzzy_tie_goes_to_first_candidate() {
        let r = fuzzy_skill_match(
            &skills(&["aws lambda", "aws s3"]),
            &skills(&["aws"]),
            DEFAULT_FUZZY_THRESHOLD,
        );
        assert_eq!(r.matched_skills[0].resume_skill, "aws lambda");
    }

    #[test]
    fn test_fuzzy_never_below_exact() {
        let resume = skills(&["Python", "SQL", "Docker"]);
        let job = skills(&["python", "sql", "aws", "docker compose"]);
        let exact = exact_skill_match(&resume, &job);
        for threshold in [0, 50, 80, 100] {
            let fuzzy = fuzzy_skill_match(&resume, &job, threshold);
            assert!(fuzzy.fuzzy_match_percentage >= exact.match_percentage);
        }
    }

    #[test]
    fn test_fuzzy_without_candidates_marks_all_missing() {
        let r = fuzzy_skill_match(&[], &skills(&["rust"]), 0);
        assert!(r.matched_skills.is_empty());
        assert_eq!(r.missing_skills, vec!["rust"]);
        assert_eq!(r.fuzzy_match_percentage, 0.0);
    }

    #[test]
    fn test_fuzzy_empty_job_list() {
        let r = fuzzy_skill_match(&skills(&["rust"]), &[], 80);
        assert_eq!(r.fuzzy_match_percentage, 0.0);
    }
}
