//! Doubles - duplicate question detection
//!
//! Groups near-duplicate phrasings in a list of yes/no questions, flags
//! duplicates that carry the opposite expected answer, and splits the input
//! into unique, duplicate and foreign-language partitions.
//!
//! # Architecture
//!
//! - **Normalize**: canonical comparison text, negation cue, language flag
//! - **Dedup**: the greedy reference-and-scan clustering pass
//! - **Similarity**: injected oracles (local embeddings, lexical overlap)
//! - **Storage**: CSV record reader and partition writer
//! - **Report**: console and JSON rendering of a finished run
//!
//! # Example
//!
//! ```
//! use doubles_core::{Deduplicator, LexicalOracle, QuestionRecord, QuestionStore};
//!
//! let records = vec![
//!     QuestionRecord::new(1, "Do you have the right footware?", true),
//!     QuestionRecord::new(2, "Have you got the right footware?", true),
//! ];
//! let mut store = QuestionStore::from_records(records, None)?;
//! let oracle = LexicalOracle::new();
//! let clustering = store.process(&Deduplicator::new(&oracle, 0.5), None)?;
//! assert_eq!(clustering.stats.num_duplicates, 1);
//! # Ok::<(), doubles_core::DoublesError>(())
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod language;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod similarity;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{DoublesConfig, OppositeRule, SimilarityBackend};
pub use dedup::{Clustering, Deduplicator};
pub use error::{DoublesError, Result};
pub use language::{FunctionWordDetector, Language, LanguageDetector};
pub use progress::{CliProgress, ProgressSink};
pub use report::Report;
pub use similarity::{LexicalOracle, LocalEmbeddingOracle, SimilarityOracle};
pub use storage::{
    CsvPartitionSink, CsvQuestionSource, PartitionSink, Partitions, QuestionSource,
};
pub use store::QuestionStore;
pub use types::{
    ClusterState, DedupStats, NormalizedQuestion, ProcessStatus, QuestionId, QuestionRecord,
};
