//! Local embedding oracle using fastembed
//!
//! Embeds both comparison texts with a locally-run sentence embedding model
//! (ONNX Runtime via fastembed) and scores them with cosine similarity.
//!
//! Models are automatically downloaded on first use to the cache directory
//! and subsequent runs load from cache.

use super::{cosine_similarity, empty_text_score, SimilarityOracle};
use crate::config::EmbeddingConfig;
use crate::error::{DoublesError, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tokio::task;
use tracing::{debug, info};

/// Embedding-backed similarity oracle
pub struct LocalEmbeddingOracle {
    model: Mutex<TextEmbedding>,
    /// Embeddings by comparison text; the similarity itself is never cached
    cache: Mutex<LruCache<String, Arc<Vec<f32>>>>,
    config: EmbeddingConfig,
}

impl LocalEmbeddingOracle {
    /// Load the configured model.
    ///
    /// This will download the model if not already cached (may take 30-120 seconds
    /// depending on model size and network speed).
    pub async fn new(config: EmbeddingConfig) -> Result<Self> {
        config.validate()?;

        info!(
            "Initializing local embedding model: model={}, cache={:?}",
            config.model, config.cache_dir
        );

        let embedding_model = Self::model_name_to_enum(&config.model)?;

        let mut init_options = InitOptions::default();
        init_options.model_name = embedding_model;
        init_options.show_download_progress = config.show_download_progress;
        init_options.cache_dir = config.cache_dir.clone();

        // Load model in blocking task (may download if not cached)
        let model = task::spawn_blocking(move || TextEmbedding::try_new(init_options))
            .await
            .map_err(|e| DoublesError::Other(format!("Task join error: {}", e)))?
            .map_err(|e| DoublesError::Embedding(format!("Failed to load model: {}", e)))?;

        let capacity = NonZeroUsize::new(config.cache_capacity).ok_or_else(|| {
            DoublesError::Validation("embedding.cache_capacity must be at least 1".to_string())
        })?;

        info!("Local embedding model ready");

        Ok(Self {
            model: Mutex::new(model),
            cache: Mutex::new(LruCache::new(capacity)),
            config,
        })
    }

    /// Whether `model_name` maps to a model this oracle can load
    pub fn is_supported_model(model_name: &str) -> bool {
        Self::model_name_to_enum(model_name).is_ok()
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    /// Map model name string to fastembed's EmbeddingModel enum
    fn model_name_to_enum(model_name: &str) -> Result<EmbeddingModel> {
        match model_name {
            "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            "bge-large-en-v1.5" => Ok(EmbeddingModel::BGELargeENV15),
            "nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
            _ => Err(DoublesError::Config(config::ConfigError::Message(format!(
                "Unsupported model: '{}'",
                model_name
            )))),
        }
    }

    fn cached(&self, text: &str) -> Result<Option<Arc<Vec<f32>>>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|e| DoublesError::Oracle(format!("Cache lock failed: {}", e)))?;
        Ok(cache.get(text).cloned())
    }

    /// Embedding for `text`, computing and caching it on a miss
    fn embedding(&self, text: &str) -> Result<Arc<Vec<f32>>> {
        if let Some(hit) = self.cached(text)? {
            return Ok(hit);
        }

        debug!("Embedding text ({} chars)", text.len());
        let mut embeddings = {
            let mut model = self
                .model
                .lock()
                .map_err(|e| DoublesError::Oracle(format!("Model lock failed: {}", e)))?;
            model
                .embed(vec![text.to_string()], None)
                .map_err(|e| DoublesError::Oracle(format!("Embedding generation failed: {}", e)))?
        };

        let embedding = Arc::new(
            embeddings
                .pop()
                .ok_or_else(|| DoublesError::Oracle("No embedding returned".to_string()))?,
        );

        let mut cache = self
            .cache
            .lock()
            .map_err(|e| DoublesError::Oracle(format!("Cache lock failed: {}", e)))?;
        cache.put(text.to_string(), Arc::clone(&embedding));

        Ok(embedding)
    }
}

impl SimilarityOracle for LocalEmbeddingOracle {
    fn similarity(&self, text_a: &str, text_b: &str) -> Result<f32> {
        if let Some(score) = empty_text_score(text_a, text_b) {
            return Ok(score);
        }
        let a = self.embedding(text_a)?;
        let b = self.embedding(text_b)?;
        Ok(cosine_similarity(&a, &b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_mapping() {
        assert!(LocalEmbeddingOracle::is_supported_model("all-MiniLM-L6-v2"));
        assert!(LocalEmbeddingOracle::is_supported_model("bge-base-en-v1.5"));
        assert!(LocalEmbeddingOracle::is_supported_model("nomic-embed-text-v1.5"));

        assert!(!LocalEmbeddingOracle::is_supported_model("invalid-model"));
    }

    // Downloads the model on first run:
    // cargo test --lib similarity::local -- --ignored --test-threads=1
    #[tokio::test]
    #[ignore = "downloads an embedding model"]
    async fn test_paraphrases_score_higher_than_unrelated() {
        let oracle = LocalEmbeddingOracle::new(EmbeddingConfig::default())
            .await
            .unwrap();

        let similar = oracle.similarity("right footware", "correct footware").unwrap();
        let different = oracle.similarity("right footware", "shirt nice bright").unwrap();

        assert!(similar > different);
        assert!(similar > 0.5);
    }

    #[tokio::test]
    #[ignore = "downloads an embedding model"]
    async fn test_identical_texts_score_one() {
        let oracle = LocalEmbeddingOracle::new(EmbeddingConfig::default())
            .await
            .unwrap();
        let score = oracle.similarity("hard hat site", "hard hat site").unwrap();
        assert!((score - 1.0).abs() < 1e-3);
        assert_eq!(oracle.similarity("", "hard hat").unwrap(), 0.0);
    }
}
