//! Token-overlap similarity
//!
//! Jaccard index of the whitespace-separated token sets. Needs no model,
//! which makes it the backend for offline runs, tests and benchmarks.

use super::{empty_text_score, SimilarityOracle};
use crate::error::Result;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct LexicalOracle;

impl LexicalOracle {
    pub fn new() -> Self {
        Self
    }
}

fn token_set(text: &str) -> BTreeSet<&str> {
    text.split_whitespace().collect()
}

fn jaccard(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f32 {
    let inter = a.intersection(b).count() as f32;
    let union = a.union(b).count() as f32;
    if union == 0.0 {
        0.0
    } else {
        inter / union
    }
}

impl SimilarityOracle for LexicalOracle {
    fn similarity(&self, text_a: &str, text_b: &str) -> Result<f32> {
        if let Some(score) = empty_text_score(text_a, text_b) {
            return Ok(score);
        }
        Ok(jaccard(&token_set(text_a), &token_set(text_b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_and_disjoint() {
        let oracle = LexicalOracle::new();
        assert_eq!(oracle.similarity("shirt nice bright", "bright nice shirt").unwrap(), 1.0);
        assert_eq!(oracle.similarity("right footware", "shirt bright").unwrap(), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let oracle = LexicalOracle::new();
        // {right, footware} vs {correct, footware}: 1 shared of 3
        let score = oracle.similarity("right footware", "correct footware").unwrap();
        assert!((score - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_symmetric() {
        let oracle = LexicalOracle::new();
        let ab = oracle.similarity("wear hard hat site", "hard hat").unwrap();
        let ba = oracle.similarity("hard hat", "wear hard hat site").unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_empty_texts() {
        let oracle = LexicalOracle::new();
        assert_eq!(oracle.similarity("", "").unwrap(), 1.0);
        assert_eq!(oracle.similarity("", "footware").unwrap(), 0.0);
    }
}
