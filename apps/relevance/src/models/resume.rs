use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ProfileError;
use crate::models::{nullable_string, parse_mapping, skill_list, string_list};

/// Structured resume data produced by the extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProfile {
    /// Identifier assigned by the persistence layer, if any.
    pub id: Option<String>,
    #[serde(deserialize_with = "skill_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "record_list")]
    pub experience: Vec<ExperienceRecord>,
    #[serde(deserialize_with = "record_list")]
    pub education: Vec<EducationRecord>,
    #[serde(deserialize_with = "string_list")]
    pub projects: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "nullable_string")]
    pub clean_text: String,
}

impl ResumeProfile {
    pub fn from_value(value: &Value) -> Result<Self, ProfileError> {
        parse_mapping("resume", value)
    }

    /// Largest parseable `years` across experience records, 0 when none parse.
    pub fn max_years(&self) -> f64 {
        self.experience
            .iter()
            .filter_map(|e| e.years)
            .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.max(y))))
            .unwrap_or(0.0)
    }
}

/// One work-experience entry. Extraction sometimes yields bare strings;
/// those become a record with only `description` set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawExperience")]
pub struct ExperienceRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    /// `None` when the source value was missing or not numeric.
    pub years: Option<f64>,
    pub description: String,
}

/// One education entry: degree plus free-form context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEducation")]
pub struct EducationRecord {
    pub degree: String,
    pub institution: Option<String>,
    pub context: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExperience {
    Text(String),
    Record {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        company: Option<String>,
        #[serde(default)]
        years: Option<Value>,
        #[serde(default, alias = "text")]
        description: Option<String>,
    },
}

impl From<RawExperience> for ExperienceRecord {
    fn from(raw: RawExperience) -> Self {
        match raw {
            RawExperience::Text(description) => ExperienceRecord {
                description,
                ..Default::default()
            },
            RawExperience::Record {
                title,
                company,
                years,
                description,
            } => ExperienceRecord {
                title,
                company,
                years: years.as_ref().and_then(parse_years),
                description: description.unwrap_or_default(),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEducation {
    Text(String),
    Record {
        #[serde(default)]
        degree: Option<String>,
        #[serde(default)]
        institution: Option<String>,
        #[serde(default, alias = "text", alias = "description")]
        context: Option<String>,
    },
}

impl From<RawEducation> for EducationRecord {
    fn from(raw: RawEducation) -> Self {
        match raw {
            RawEducation::Text(context) => EducationRecord {
                context,
                ..Default::default()
            },
            RawEducation::Record {
                degree,
                institution,
                context,
            } => EducationRecord {
                degree: degree.unwrap_or_default(),
                institution,
                context: context.unwrap_or_default(),
            },
        }
    }
}

fn parse_years(value: &Value) -> Option<f64> {
    let years = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (years.is_finite() && years >= 0.0).then_some(years)
}

fn record_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
