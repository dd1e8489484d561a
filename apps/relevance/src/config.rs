use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Weights and verdict thresholds consumed by the relevance scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub semantic_weight: f64,
    pub keyword_weight: f64,
    pub high_threshold: f64,
    pub medium_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.6,
            keyword_weight: 0.4,
            high_threshold: 75.0,
            medium_threshold: 50.0,
        }
    }
}

impl ScoringConfig {
    /// Weights must be finite and non-negative; they are not required to sum to 1.
    /// Thresholds must satisfy 0 <= medium <= high <= 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, w) in [
            ("semantic_weight", self.semantic_weight),
            ("keyword_weight", self.keyword_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::Weights(format!(
                    "{name} must be a finite non-negative number, got {w}"
                )));
            }
        }

        let (high, medium) = (self.high_threshold, self.medium_threshold);
        if !high.is_finite() || !medium.is_finite() {
            return Err(ConfigError::Thresholds(
                "thresholds must be finite".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&medium) || !(0.0..=100.0).contains(&high) || medium > high {
            return Err(ConfigError::Thresholds(format!(
                "expected 0 <= medium ({medium}) <= high ({high}) <= 100"
            )));
        }
        Ok(())
    }
}

/// Parameters of the match aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum fuzzy score (0–100) for a job skill to count as matched.
    pub fuzzy_threshold: u8,
    /// Feature cap of the TF-IDF vectorizer.
    pub max_features: usize,
    /// Number of top-weighted job terms reported by the TF-IDF match.
    pub top_job_features: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 80,
            max_features: 5000,
            top_job_features: 20,
        }
    }
}

/// Settings for the generative-text client. Absent key = deterministic feedback only.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub max_retries: u32,
    pub timeout: Duration,
}

/// Application configuration loaded from environment variables.
/// Every key is optional; defaults reproduce the stock scoring behaviour.
#[derive(Debug, Clone)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub matcher: MatcherConfig,
    pub llm: LlmSettings,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = ScoringConfig::default();
        let scoring = ScoringConfig {
            semantic_weight: env_or("SEMANTIC_WEIGHT", defaults.semantic_weight)?,
            keyword_weight: env_or("KEYWORD_WEIGHT", defaults.keyword_weight)?,
            high_threshold: env_or("HIGH_RELEVANCE_THRESHOLD", defaults.high_threshold)?,
            medium_threshold: env_or("MEDIUM_RELEVANCE_THRESHOLD", defaults.medium_threshold)?,
        };
        scoring.validate()?;

        let fuzzy: u32 = env_or("FUZZY_MATCH_THRESHOLD", 80)?;
        let fuzzy_threshold = u8::try_from(fuzzy)
            .ok()
            .filter(|t| *t <= 100)
            .ok_or(ConfigError::FuzzyThreshold(fuzzy))?;

        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(Config {
            scoring,
            matcher: MatcherConfig {
                fuzzy_threshold,
                ..MatcherConfig::default()
            },
            llm: LlmSettings {
                api_key,
                max_retries: env_or("LLM_MAX_RETRIES", 3)?,
                timeout: Duration::from_secs(env_or("LLM_TIMEOUT_SECS", 60)?),
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    parse_or(key, std::env::var(key).ok(), default)
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = ScoringConfig {
            high_threshold: 40.0,
            medium_threshold: 60.0,
            ..ScoringConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Thresholds(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = ScoringConfig {
            keyword_weight: -0.1,
            ..ScoringConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Weights(_))));
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        let config = ScoringConfig {
            semantic_weight: 0.7,
            keyword_weight: 0.7,
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_or_uses_default_when_absent() {
        let v: f64 = parse_or("SEMANTIC_WEIGHT", None, 0.6).unwrap();
        assert_eq!(v, 0.6);
    }

    #[test]
    fn test_parse_or_trims_and_parses() {
        let v: f64 = parse_or("KEYWORD_WEIGHT", Some(" 0.25 ".to_string()), 0.4).unwrap();
        assert_eq!(v, 0.25);
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        let err = parse_or::<f64>("KEYWORD_WEIGHT", Some("heavy".to_string()), 0.4).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                key: "KEYWORD_WEIGHT",
                value: "heavy".to_string()
            }
        );
    }
}
