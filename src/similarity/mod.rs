//! Similarity oracles for question comparison
//!
//! Provides a local embedding oracle (fastembed) and an offline lexical
//! oracle. The deduplicator only depends on the `SimilarityOracle` trait.

pub mod lexical;
pub mod local;

pub use lexical::LexicalOracle;
pub use local::LocalEmbeddingOracle;

use crate::config::{DoublesConfig, SimilarityBackend};
use crate::error::Result;

/// Scores how alike two comparison texts are; higher means more similar.
///
/// Implementations are expected to be symmetric and return values in
/// `[0, 1]`, but callers do not verify either. An error aborts the pass.
#[cfg_attr(test, mockall::automock)]
pub trait SimilarityOracle: Send + Sync {
    fn similarity(&self, text_a: &str, text_b: &str) -> Result<f32>;
}

/// Build the oracle selected in the configuration
pub async fn from_config(config: &DoublesConfig) -> Result<Box<dyn SimilarityOracle>> {
    match config.similarity.backend {
        SimilarityBackend::Embedding => Ok(Box::new(
            LocalEmbeddingOracle::new(config.embedding.clone()).await?,
        )),
        SimilarityBackend::Lexical => Ok(Box::new(LexicalOracle::new())),
    }
}

/// Score for pairs where at least one text is empty: two empty texts
/// are identical, an empty text is unlike anything else.
pub(crate) fn empty_text_score(text_a: &str, text_b: &str) -> Option<f32> {
    match (text_a.is_empty(), text_b.is_empty()) {
        (true, true) => Some(1.0),
        (true, false) | (false, true) => Some(0.0),
        (false, false) => None,
    }
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
