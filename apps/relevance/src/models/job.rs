use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ProfileError;
use crate::models::{nullable_string, parse_mapping, skill_list, string_list};

/// Structured job posting data produced by the extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobProfile {
    pub id: Option<String>,
    #[serde(deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(deserialize_with = "nullable_string")]
    pub company: String,
    #[serde(deserialize_with = "skill_list")]
    pub required_skills: Vec<String>,
    #[serde(deserialize_with = "skill_list")]
    pub preferred_skills: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub education_requirements: Vec<String>,
    /// Free-form minimum experience descriptor, e.g. "2+ years".
    pub experience_requirements: Option<String>,
    #[serde(deserialize_with = "nullable_string", alias = "description")]
    pub clean_text: String,
}

impl JobProfile {
    pub fn from_value(value: &Value) -> Result<Self, ProfileError> {
        parse_mapping("job", value)
    }

    /// Required skills followed by preferred skills, as fed to fuzzy matching.
    pub fn all_skills(&self) -> Vec<String> {
        self.required_skills
            .iter()
            .chain(self.preferred_skills.iter())
            .cloned()
            .collect()
    }

    pub fn display_title(&self) -> &str {
        non_blank(&self.title).unwrap_or("Position")
    }

    pub fn display_company(&self) -> &str {
        non_blank(&self.company).unwrap_or("Company")
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
