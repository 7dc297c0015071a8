//! Core data types for the doubles question deduplicator
//!
//! Question records are loaded once and never mutated. Each one gets a
//! normalized form at load time and a cluster state that only the
//! deduplicator writes during a single processing pass.

use serde::{Deserialize, Serialize};

/// Stable external identifier of a question, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for QuestionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A question as read from the input, preserved verbatim for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub raw_text: String,
    /// Expected response: true = yes, false = no
    pub expected_answer: bool,
}

impl QuestionRecord {
    pub fn new(
        id: impl Into<QuestionId>,
        raw_text: impl Into<String>,
        expected_answer: bool,
    ) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
            expected_answer,
        }
    }
}

/// Comparison form of a question plus cheap lexical signals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuestion {
    pub id: QuestionId,
    pub expected_answer: bool,
    /// Lower-cased, punctuation-stripped, stop-word-filtered text; never shown to users
    pub comparison_text: String,
    /// The raw token stream contained a standalone "not"
    pub has_negation_cue: bool,
    /// Language detection reported a non-English language
    pub is_foreign: bool,
}

/// Per-question clustering result, populated monotonically in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    pub is_reference: bool,
    pub is_duplicate: bool,
    pub is_unique: bool,
    pub is_opposite: bool,
    pub duplicate_of: Option<QuestionId>,
    /// Ids matched to this question while it was the anchor, in match order
    pub duplicate_members: Vec<QuestionId>,
}

impl Default for ClusterState {
    fn default() -> Self {
        Self {
            is_reference: false,
            is_duplicate: false,
            is_unique: true,
            is_opposite: false,
            duplicate_of: None,
            duplicate_members: Vec::new(),
        }
    }
}

impl ClusterState {
    /// Record a match against `anchor`. Never moves a question back to unique.
    pub(crate) fn mark_duplicate(&mut self, anchor: QuestionId, opposite: bool) {
        self.is_duplicate = true;
        self.is_unique = false;
        self.is_opposite = opposite;
        self.duplicate_of = Some(anchor);
    }
}

/// Outcome status of a processing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Fewer than two questions; nothing was compared
    InsufficientData,
    /// Every position was visited
    Completed,
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessStatus::InsufficientData => write!(f, "insufficient data"),
            ProcessStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Aggregate counters for one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    pub num_q: usize,
    pub num_references: usize,
    pub num_duplicates: usize,
    pub num_negatives: usize,
    pub num_foreign: usize,
    /// Duplicates whose negation cue and answer disagreement did not line up
    pub num_inconsistent: usize,
    /// Similarity evaluations performed
    pub comparisons: usize,
}

impl DedupStats {
    /// Share of input questions found to be duplicates, in percent
    pub fn duplicate_percent(&self) -> f64 {
        if self.num_q == 0 {
            return 0.0;
        }
        self.num_duplicates as f64 / self.num_q as f64 * 100.0
    }
}
