//! What the candidate lacks relative to the job, derived from a match report.

use serde::{Deserialize, Serialize};

use crate::matching::MatchReport;

const MISSING_SKILLS_LISTED: usize = 10;
const CRITICAL_SKILLS_LISTED: usize = 5;
/// Fuzzy matches below this similarity count as partial.
const PARTIAL_MATCH_BELOW: u8 = 90;

const SUGGESTED_CERTIFICATIONS: [&str; 3] = [
    "AWS Certification",
    "Google Cloud Certification",
    "Project Management Certification",
];

const SUGGESTED_PROJECTS: [&str; 3] = [
    "End-to-end web application project",
    "Machine learning project with real data",
    "Mobile application development",
];

const SUGGESTED_EXPERIENCE: [&str; 3] = [
    "Industry-specific experience",
    "Leadership experience",
    "Team collaboration experience",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// High for the first three entries of a ranked list, Medium for the next three.
    pub fn for_rank(index: usize) -> Self {
        match index {
            0..=2 => Priority::High,
            3..=5 => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingElements {
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub projects: Vec<String>,
    pub experience: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSkill {
    pub skill: String,
    pub importance: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGapAnalysis {
    pub matched_skills: Vec<String>,
    pub partially_matched_skills: Vec<String>,
    pub missing_critical_skills: Vec<String>,
    pub skill_match_percentage: f64,
    pub skill_importance: Vec<RankedSkill>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Missing required skills plus fixed certification, project and experience
/// suggestions. The fixed lists do not depend on the job.
pub fn generate_missing_elements(report: &MatchReport) -> MissingElements {
    MissingElements {
        skills: report
            .exact_skill_match
            .missing_skills
            .iter()
            .take(MISSING_SKILLS_LISTED)
            .cloned()
            .collect(),
        certifications: owned(&SUGGESTED_CERTIFICATIONS),
        projects: owned(&SUGGESTED_PROJECTS),
        experience: owned(&SUGGESTED_EXPERIENCE),
    }
}

pub fn generate_skill_gap_analysis(report: &MatchReport) -> SkillGapAnalysis {
    let exact = &report.exact_skill_match;

    SkillGapAnalysis {
        matched_skills: exact.matched_skills.clone(),
        partially_matched_skills: report
            .fuzzy_skill_match
            .matched_skills
            .iter()
            .filter(|m| m.similarity < PARTIAL_MATCH_BELOW)
            .map(|m| m.job_skill.clone())
            .collect(),
        missing_critical_skills: exact
            .missing_skills
            .iter()
            .take(CRITICAL_SKILLS_LISTED)
            .cloned()
            .collect(),
        skill_match_percentage: exact.match_percentage,
        skill_importance: exact
            .missing_skills
            .iter()
            .take(MISSING_SKILLS_LISTED)
            .enumerate()
            .map(|(i, skill)| RankedSkill {
                skill: skill.clone(),
                importance: Priority::for_rank(i),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::FuzzySkillMatch;

    fn report_missing(n: usize) -> MatchReport {
        let mut report = MatchReport::default();
        report.exact_skill_match.missing_skills = (0..n).map(|i| format!("skill{i}")).collect();
        report
    }

    #[test]
    fn test_missing_elements_caps_skills_at_ten() {
        let elements = generate_missing_elements(&report_missing(14));
        assert_eq!(elements.skills.len(), 10);
        assert_eq!(elements.skills[0], "skill0");
        assert_eq!(elements.certifications.len(), 3);
        assert_eq!(elements.projects.len(), 3);
        assert_eq!(elements.experience.len(), 3);
    }

    #[test]
    fn test_missing_elements_with_nothing_missing() {
        let elements = generate_missing_elements(&MatchReport::default());
        assert!(elements.skills.is_empty());
        assert_eq!(elements.certifications[0], "AWS Certification");
    }

    #[test]
    fn test_importance_ranking() {
        let analysis = generate_skill_gap_analysis(&report_missing(12));
        assert_eq!(analysis.skill_importance.len(), 10);
        assert_eq!(analysis.skill_importance[2].importance, Priority::High);
        assert_eq!(analysis.skill_importance[3].importance, Priority::Medium);
        assert_eq!(analysis.skill_importance[5].importance, Priority::Medium);
        assert_eq!(analysis.skill_importance[6].importance, Priority::Low);
        assert_eq!(analysis.missing_critical_skills.len(), 5);
    }

    #[test]
    fn test_partial_matches_below_90() {
        let mut report = MatchReport::default();
        report.fuzzy_skill_match.matched_skills = vec![
            FuzzySkillMatch {
                job_skill: "postgres".to_string(),
                resume_skill: "PostgreSQL".to_string(),
                similarity: 100,
            },
            FuzzySkillMatch {
                job_skill: "pyhton".to_string(),
                resume_skill: "python".to_string(),
                similarity: 83,
            },
        ];
        let analysis = generate_skill_gap_analysis(&report);
        assert_eq!(analysis.partially_matched_skills, vec!["pyhton"]);
    }
}
