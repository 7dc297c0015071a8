//! Input and output collaborators for question sets
//!
//! The core never touches files. A `QuestionSource` yields validated
//! records in input order; a `PartitionSink` receives the finished result
//! split into unique, duplicate and foreign partitions.

pub mod csv_reader;
pub mod csv_writer;

pub use csv_reader::CsvQuestionSource;
pub use csv_writer::CsvPartitionSink;

use crate::dedup::Clustering;
use crate::error::Result;
use crate::types::{NormalizedQuestion, QuestionId, QuestionRecord};

/// Produces question records in their significant input order
pub trait QuestionSource {
    fn read_questions(&mut self) -> Result<Vec<QuestionRecord>>;
}

/// Persists the three partitions of a finished run
pub trait PartitionSink {
    fn write_partitions(&mut self, partitions: &Partitions<'_>) -> Result<()>;
}

/// A duplicate with the reference it was matched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateRow<'a> {
    pub record: &'a QuestionRecord,
    pub duplicate_of: QuestionId,
}

/// Disjoint split of the input, each part in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitions<'a> {
    pub unique: Vec<&'a QuestionRecord>,
    pub duplicate: Vec<DuplicateRow<'a>>,
    pub foreign: Vec<&'a QuestionRecord>,
}

impl<'a> Partitions<'a> {
    /// Split `records` by their cluster state. Only questions the pass
    /// excluded as foreign land in the foreign partition; without foreign
    /// exclusion a flagged question is unique or duplicate like any other.
    pub fn from_clustering(
        records: &'a [QuestionRecord],
        normalized: &[NormalizedQuestion],
        clustering: &Clustering,
    ) -> Self {
        let mut partitions = Partitions::default();
        for ((record, question), state) in records.iter().zip(normalized).zip(&clustering.states) {
            match state.duplicate_of {
                Some(anchor) if state.is_duplicate => partitions.duplicate.push(DuplicateRow {
                    record,
                    duplicate_of: anchor,
                }),
                _ if clustering.is_excluded(question) => partitions.foreign.push(record),
                _ => partitions.unique.push(record),
            }
        }
        partitions
    }

    pub fn len(&self) -> usize {
        self.unique.len() + self.duplicate.len() + self.foreign.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Text written for an expected answer
pub(crate) fn answer_label(answer: bool) -> &'static str {
    if answer {
        "yes"
    } else {
        "no"
    }
}

/// Parse an expected answer; `None` for anything that is not a boolean
pub(crate) fn parse_answer(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}
