use serde_json::{json, Value};
use thiserror::Error;

/// Rejection of an input mapping at the boundary where the extraction
/// collaborator hands data to the pipeline.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{profile} profile must be a JSON object, got {found}")]
    NotAMapping {
        profile: &'static str,
        found: &'static str,
    },

    #[error("{profile} profile is malformed: {source}")]
    Malformed {
        profile: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single similarity method. Recovered at the method boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    #[error("empty vocabulary: texts contain no indexable terms")]
    EmptyVocabulary,

    #[error("{method} produced a non-finite similarity")]
    NonFinite { method: &'static str },
}

/// Top-level aggregator failure. A report is never partially returned.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid input: {0}")]
    Profile(#[from] ProfileError),

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("embedding similarity must be a finite percentage in 0..=100, got {0}")]
    InvalidEmbedding(f64),

    #[error("{0} score is not finite")]
    NonFinite(&'static str),
}

/// Failure of a full evaluation run. Feedback never fails, so only the
/// match and score stages can abort an evaluation.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("matching failed: {0}")]
    Match(#[from] MatchError),

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("environment variable '{key}' has invalid value '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("invalid weights: {0}")]
    Weights(String),

    #[error("invalid thresholds: {0}")]
    Thresholds(String),

    #[error("fuzzy match threshold must be within 0..=100, got {0}")]
    FuzzyThreshold(u32),
}

/// Renders any pipeline failure as the `{"error": "..."}` mapping stored by
/// the persistence layer in place of a report.
pub fn error_payload(err: &dyn std::error::Error) -> Value {
    json!({ "error": err.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_has_single_error_key() {
        let err = MatchError::OutOfRange {
            field: "tfidf_match.similarity_percentage",
            value: 140.0,
        };
        let payload = error_payload(&err);
        let obj = payload.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj["error"].as_str().unwrap().contains("out of range"));
    }

    #[test]
    fn test_scoring_error_message_names_value() {
        let err = ScoringError::InvalidEmbedding(f64::NAN);
        assert!(err.to_string().contains("NaN"));
    }
}
