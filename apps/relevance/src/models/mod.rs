//! Input and output records exchanged with the collaborators around the pipeline.
//!
//! Profiles arrive as loose JSON mappings from the extraction layer. Every key
//! is optional: lists default to empty, strings to "", numbers to absent.
//! Keys present with the wrong shape are rejected at the boundary.

pub mod evaluation;
pub mod job;
pub mod resume;

use std::collections::HashSet;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::ProfileError;

pub use evaluation::EvaluationRecord;
pub use job::JobProfile;
pub use resume::{EducationRecord, ExperienceRecord, ResumeProfile};

/// `null` and absent both mean "no entries".
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Like `string_list`, then drops case-insensitive duplicates and blanks,
/// keeping the first spelling seen.
pub(crate) fn skill_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(dedup_case_insensitive(string_list(deserializer)?))
}

pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn dedup_case_insensitive(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

pub(crate) fn parse_mapping<T>(profile: &'static str, value: &Value) -> Result<T, ProfileError>
where
    T: for<'de> Deserialize<'de>,
{
    let found = match value {
        Value::Object(_) => None,
        Value::Null => Some("null"),
        Value::Bool(_) => Some("a boolean"),
        Value::Number(_) => Some("a number"),
        Value::String(_) => Some("a string"),
        Value::Array(_) => Some("an array"),
    };
    if let Some(found) = found {
        return Err(ProfileError::NotAMapping { profile, found });
    }
    T::deserialize(value).map_err(|source| ProfileError::Malformed { profile, source })
}
