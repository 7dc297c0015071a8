//! Doubles - find duplicate yes/no questions
//!
//! Reads a CSV of questions, clusters near-duplicate phrasings, prints a
//! report and exports unique, duplicate and foreign partitions.

mod cli;

use clap::Parser;
use doubles_core::{error::Result, DoublesConfig, SimilarityBackend};
use std::path::PathBuf;
use tracing::{debug, warn, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "doubles")]
#[command(about = "Find duplicate and opposite questions in a question list", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the input .csv file
    #[arg(short, long)]
    ifile: Option<PathBuf>,

    /// Path for the results export; partitions are written next to it
    #[arg(short, long)]
    ofile: Option<PathBuf>,

    /// Perform dry run, i.e. no export files created
    #[arg(short, long)]
    dry: bool,

    /// Show a progress bar
    #[arg(short, long)]
    progress: bool,

    /// Settings file (YAML or TOML); defaults to ./settings.yaml if present
    #[arg(short, long, env = "DOUBLES_CONFIG")]
    config: Option<PathBuf>,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Similarity threshold override (strictly exceeded to match)
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Similarity backend override
    #[arg(long, value_enum)]
    similarity: Option<SimilarityBackend>,

    /// Flag non-English questions and keep them out of clustering
    #[arg(long)]
    detect_foreign: bool,

    /// Also write a JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    /// Layer command-line overrides on top of file and environment settings
    fn apply_overrides(&self, config: &mut DoublesConfig) -> Result<()> {
        if let Some(threshold) = self.threshold {
            config.scores.ss_match = threshold;
        }
        if let Some(backend) = self.similarity {
            config.similarity.backend = backend;
        }
        if self.detect_foreign {
            config.language.detect_foreign = true;
        }
        config.validate()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Use specified level for doubles, but WARN for noisy model-loading crates
    let level = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!(
        "doubles={level},doubles_core={level},ort=warn,hf_hub=warn"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Doubles v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = DoublesConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config)?;

    let Some(ifile) = cli.ifile.clone() else {
        warn!("No questions file specified.");
        return Ok(());
    };

    cli::run::handle(
        config,
        ifile,
        cli.ofile.clone(),
        cli.dry,
        cli.progress,
        cli.report.clone(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use doubles_core::DoublesError;

    #[test]
    fn test_overrides_layer_onto_config() {
        let cli = Cli::try_parse_from([
            "doubles",
            "-t",
            "0.6",
            "--similarity",
            "lexical",
            "--detect-foreign",
        ])
        .unwrap();
        let mut config = DoublesConfig::default();
        cli.apply_overrides(&mut config).unwrap();

        assert!((config.scores.ss_match - 0.6).abs() < 1e-6);
        assert_eq!(config.similarity.backend, SimilarityBackend::Lexical);
        assert!(config.language.detect_foreign);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["doubles"]).unwrap();
        let mut config = DoublesConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config, DoublesConfig::default());
    }

    #[test]
    fn test_threshold_override_validated() {
        let cli = Cli::try_parse_from(["doubles", "--threshold", "1.0"]).unwrap();
        let mut config = DoublesConfig::default();
        let result = cli.apply_overrides(&mut config);
        assert!(matches!(result, Err(DoublesError::Validation(_))));
    }
}
