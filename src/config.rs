//! Configuration for doubles
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional settings file (YAML or TOML, chosen by extension), then
//! `DOUBLES_<SECTION>__<KEY>` environment variables. CLI flags are applied
//! on top by the binary.

use crate::error::{DoublesError, Result};
use crate::similarity::LocalEmbeddingOracle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "settings.yaml";

/// Environment variable prefix
const ENV_PREFIX: &str = "DOUBLES";

/// Top-level configuration record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoublesConfig {
    pub app: AppConfig,
    pub scores: ScoreConfig,
    pub progress: ProgressConfig,
    pub language: LanguageConfig,
    pub dedup: DedupConfig,
    pub similarity: SimilarityConfig,
    pub embedding: EmbeddingConfig,
}

/// Display-only application identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "doubles".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Similarity a pair must strictly exceed to count as duplicates
    pub ss_match: f32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self { ss_match: 0.8 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Progress bar width in cells
    pub width: u16,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { width: 50 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Flag non-English questions and keep them out of clustering
    pub detect_foreign: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub opposite_rule: OppositeRule,
}

/// How a duplicate is classified as an opposite (negative) match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OppositeRule {
    /// The candidate contains a standalone "not"
    #[default]
    NegationCue,
    /// The candidate's expected answer differs from the anchor's
    AnswerMismatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub backend: SimilarityBackend,
}

/// Which similarity oracle scores question pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBackend {
    /// Sentence embeddings from a local fastembed model
    #[default]
    Embedding,
    /// Token-set overlap; offline and deterministic
    Lexical,
}

impl std::fmt::Display for SimilarityBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimilarityBackend::Embedding => write!(f, "embedding"),
            SimilarityBackend::Lexical => write!(f, "lexical"),
        }
    }
}

/// Local embedding model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub cache_dir: PathBuf,
    pub show_download_progress: bool,
    /// Number of distinct texts whose embeddings are kept in memory
    pub cache_capacity: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-MiniLM-L6-v2".to_string(),
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("doubles")
                .join("models"),
            show_download_progress: true,
            cache_capacity: 4096,
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<()> {
        if !LocalEmbeddingOracle::is_supported_model(&self.model) {
            return Err(DoublesError::Config(config::ConfigError::Message(format!(
                "Unsupported embedding model: '{}'",
                self.model
            ))));
        }
        if self.cache_capacity == 0 {
            return Err(DoublesError::Validation(
                "embedding.cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl DoublesConfig {
    /// Load configuration from an explicit settings file, or from
    /// `settings.yaml` in the working directory if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_string_lossy().to_string(), true),
            None => (DEFAULT_SETTINGS_FILE.to_string(), false),
        };
        debug!("Loading settings from {} (required: {})", file, required);

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&file).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: DoublesConfig = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check value ranges; only the threshold and embedding settings can be invalid
    pub fn validate(&self) -> Result<()> {
        let threshold = self.scores.ss_match;
        if !(0.0..1.0).contains(&threshold) {
            return Err(DoublesError::Validation(format!(
                "scores.ss_match must be in [0, 1), got {}",
                threshold
            )));
        }
        if self.progress.width == 0 {
            return Err(DoublesError::Validation(
                "progress.width must be at least 1".to_string(),
            ));
        }
        if self.similarity.backend == SimilarityBackend::Embedding {
            self.embedding.validate()?;
        }
        Ok(())
    }
}
