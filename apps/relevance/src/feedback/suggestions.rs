//! Structured, non-prose improvement guidance: per-skill suggestions with
//! learning resources, and a phased learning roadmap.

use serde::{Deserialize, Serialize};

use crate::models::JobProfile;
use crate::scoring::{MissingElements, Priority};

const MAX_SUGGESTIONS: usize = 8;
const SKILL_SUGGESTIONS: usize = 5;
const PHASE_SKILLS: usize = 3;
const INTERMEDIATE_FROM: usize = 5;

const CORE_SKILLS: [&str; 5] = ["python", "javascript", "sql", "react", "java"];

const FOUNDATION_SKILLS: [&str; 5] = ["python", "java", "javascript", "html", "css"];
const FRAMEWORK_SKILLS: [&str; 5] = ["react", "angular", "vue", "nodejs", "django"];
const SPECIALIZED_SKILLS: [&str; 4] = ["aws", "docker", "kubernetes", "tensorflow"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Skill,
    Project,
    Certification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub priority: Priority,
    pub suggestion: String,
    pub action: String,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: u8,
    pub title: String,
    pub duration: String,
    pub skills: Vec<String>,
    pub goals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRoadmap {
    pub current_level: String,
    pub target_level: String,
    pub timeline: String,
    pub phases: Vec<RoadmapPhase>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Learning resources for a skill; generic pointers for unknown skills.
pub fn learning_resources(skill: &str) -> Vec<String> {
    let resources: &[&str] = match skill.trim().to_lowercase().as_str() {
        "python" => &["Python.org Tutorial", "Codecademy Python", "Real Python"],
        "javascript" => &["MDN Web Docs", "freeCodeCamp", "JavaScript.info"],
        "react" => &["React Official Docs", "React Tutorial", "Create React App"],
        "sql" => &["W3Schools SQL", "SQLBolt", "MySQL Tutorial"],
        "aws" => &["AWS Training", "A Cloud Guru", "AWS Documentation"],
        "docker" => &["Docker Official Tutorial", "Docker Hub", "Play with Docker"],
        "git" => &["Git Tutorial", "GitHub Learning Lab", "Atlassian Git Tutorials"],
        _ => &["Google Search", "YouTube Tutorials", "Online Courses"],
    };
    owned(resources)
}

/// Up to five skill suggestions, then one project and one certification
/// suggestion when those lists are non-empty. At most eight entries.
///
/// The job is accepted for future tailoring; suggestions currently depend
/// only on `missing`.
pub fn generate_improvement_suggestions(
    missing: &MissingElements,
    _job: &JobProfile,
) -> Vec<ImprovementSuggestion> {
    let mut suggestions: Vec<ImprovementSuggestion> = missing
        .skills
        .iter()
        .take(SKILL_SUGGESTIONS)
        .map(|skill| {
            let priority = if CORE_SKILLS.contains(&skill.to_lowercase().as_str()) {
                Priority::High
            } else {
                Priority::Medium
            };
            ImprovementSuggestion {
                kind: SuggestionKind::Skill,
                priority,
                suggestion: format!("Learn {skill}"),
                action: format!("Take an online course or build a project using {skill}"),
                resources: learning_resources(skill),
            }
        })
        .collect();

    if !missing.projects.is_empty() {
        suggestions.push(ImprovementSuggestion {
            kind: SuggestionKind::Project,
            priority: Priority::High,
            suggestion: "Build relevant projects".to_string(),
            action: "Create 2-3 projects that demonstrate the required skills".to_string(),
            resources: owned(&["GitHub", "Personal Portfolio", "Kaggle (for data science)"]),
        });
    }

    if !missing.certifications.is_empty() {
        suggestions.push(ImprovementSuggestion {
            kind: SuggestionKind::Certification,
            priority: Priority::Medium,
            suggestion: "Obtain relevant certifications".to_string(),
            action: "Get certified in cloud platforms or technologies mentioned in the job"
                .to_string(),
            resources: owned(&["Coursera", "AWS Training", "Google Cloud Training"]),
        });
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn phase_skills(target: &[String], vocabulary: &[&str]) -> Vec<String> {
    target
        .iter()
        .filter(|s| vocabulary.contains(&s.to_lowercase().as_str()))
        .take(PHASE_SKILLS)
        .cloned()
        .collect()
}

/// Three-phase plan from foundation to specialized tooling. Phases with no
/// matching target skill are omitted; phase numbers stay fixed.
pub fn generate_skill_roadmap(current_skills: &[String], target_skills: &[String]) -> SkillRoadmap {
    let current_level = if current_skills.len() < INTERMEDIATE_FROM {
        "Beginner"
    } else {
        "Intermediate"
    };

    let plan = [
        (
            1,
            "Foundation Skills",
            "4-6 weeks",
            &FOUNDATION_SKILLS[..],
            "Build strong programming fundamentals",
        ),
        (
            2,
            "Framework & Libraries",
            "6-8 weeks",
            &FRAMEWORK_SKILLS[..],
            "Learn popular frameworks and libraries",
        ),
        (
            3,
            "Specialized Technologies",
            "4-6 weeks",
            &SPECIALIZED_SKILLS[..],
            "Master industry-specific tools",
        ),
    ];

    let phases = plan
        .into_iter()
        .filter_map(|(phase, title, duration, vocabulary, goals)| {
            let skills = phase_skills(target_skills, vocabulary);
            (!skills.is_empty()).then(|| RoadmapPhase {
                phase,
                title: title.to_string(),
                duration: duration.to_string(),
                skills,
                goals: goals.to_string(),
            })
        })
        .collect();

    SkillRoadmap {
        current_level: current_level.to_string(),
        target_level: "Job-ready".to_string(),
        timeline: "3-6 months".to_string(),
        phases,
    }
}
