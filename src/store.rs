//! Question store: loaded records, their normalized forms, and the result
//! of the single clustering pass run over them.

use crate::dedup::{Clustering, Deduplicator};
use crate::error::{DoublesError, Result};
use crate::language::LanguageDetector;
use crate::normalize::normalize_all;
use crate::progress::ProgressSink;
use crate::storage::{PartitionSink, Partitions, QuestionSource};
use crate::types::{NormalizedQuestion, QuestionRecord};
use std::collections::HashSet;
use tracing::info;

pub struct QuestionStore {
    records: Vec<QuestionRecord>,
    normalized: Vec<NormalizedQuestion>,
    clustering: Option<Clustering>,
}

impl QuestionStore {
    /// Read every record from `source` and normalize it
    pub fn load(
        source: &mut dyn QuestionSource,
        detector: Option<&dyn LanguageDetector>,
    ) -> Result<Self> {
        info!("Initialising question store.");
        let records = source.read_questions()?;
        Self::from_records(records, detector)
    }

    /// Build a store from records already in input order. Ids must be unique.
    pub fn from_records(
        records: Vec<QuestionRecord>,
        detector: Option<&dyn LanguageDetector>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(repeated) = records.iter().find(|r| !seen.insert(r.id)) {
            return Err(DoublesError::DuplicateId(repeated.id.0));
        }

        let normalized = normalize_all(&records, detector)?;
        Ok(Self {
            records,
            normalized,
            clustering: None,
        })
    }

    pub fn num_q(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn normalized(&self) -> &[NormalizedQuestion] {
        &self.normalized
    }

    pub fn clustering(&self) -> Option<&Clustering> {
        self.clustering.as_ref()
    }

    /// Run the clustering pass. A store is processed at most once.
    pub fn process(
        &mut self,
        dedup: &Deduplicator<'_>,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<&Clustering> {
        if self.clustering.is_some() {
            return Err(DoublesError::Validation(
                "question store has already been processed".to_string(),
            ));
        }
        let clustering = dedup.process(&self.normalized, progress)?;
        let clustering: &Clustering = self.clustering.insert(clustering);
        Ok(clustering)
    }

    /// Unique, duplicate and foreign partitions; `None` before processing
    pub fn partitions(&self) -> Option<Partitions<'_>> {
        self.clustering
            .as_ref()
            .map(|c| Partitions::from_clustering(&self.records, &self.normalized, c))
    }

    /// Hand the partitions to `sink`
    pub fn export(&self, sink: &mut dyn PartitionSink) -> Result<()> {
        let partitions = self.partitions().ok_or_else(|| {
            DoublesError::Validation("questions must be processed before export".to_string())
        })?;
        sink.write_partitions(&partitions)
    }
}
