use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relevance::errors::error_payload;
use relevance::llm_client::{self, LlmClient, TextGenerator};
use relevance::{Config, Evaluator, SemanticSimilarity};

/// Scores one resume against one job description and prints the evaluation.
#[derive(Debug, Parser)]
#[command(name = "relevance", version)]
struct Args {
    /// Resume profile (JSON mapping).
    resume: PathBuf,

    /// Job profile (JSON mapping).
    job: PathBuf,

    /// Embedding similarity (0-100) computed elsewhere for this pair.
    #[arg(long, value_name = "PERCENT")]
    embedding_similarity: Option<f64>,

    /// Pretty-print the evaluation record.
    #[arg(long)]
    pretty: bool,
}

/// Embedding similarity supplied on the command line.
struct StaticSimilarity(f64);

#[async_trait]
impl SemanticSimilarity for StaticSimilarity {
    async fn similarity(&self, _resume_text: &str, _job_text: &str) -> Result<f64> {
        Ok(self.0)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting relevance v{}", env!("CARGO_PKG_VERSION"));

    let generator: Option<Arc<dyn TextGenerator>> = match &config.llm.api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), config.llm.timeout, config.llm.max_retries)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(client))
        }
        None => None,
    };

    let mut evaluator = Evaluator::from_config(&config, generator)?;
    if let Some(percent) = args.embedding_similarity {
        if !(0.0..=100.0).contains(&percent) {
            bail!("--embedding-similarity must be within 0-100, got {percent}");
        }
        evaluator = evaluator.with_semantic_similarity(Arc::new(StaticSimilarity(percent)));
    }

    let resume = load_json(&args.resume)?;
    let job = load_json(&args.job)?;
    let record = match evaluator.evaluate_value(&resume, &job).await {
        Ok(record) => record,
        Err(e) => {
            println!("{}", error_payload(&e));
            return Err(e.into());
        }
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{output}");

    Ok(())
}

fn load_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {} as JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_json_reads_mapping() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"skills": ["Rust"]}}"#).unwrap();
        let value = load_json(file.path()).unwrap();
        assert_eq!(value["skills"][0], "Rust");
    }

    #[test]
    fn test_load_json_reports_path_on_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_json(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "relevance",
            "resume.json",
            "job.json",
            "--embedding-similarity",
            "72.5",
            "--pretty",
        ]);
        assert_eq!(args.embedding_similarity, Some(72.5));
        assert!(args.pretty);
    }
}
