//! Result reporting
//!
//! Builds a serializable summary of a finished run and renders it as the
//! console report or as JSON. Nothing here feeds back into clustering.

use crate::config::{DoublesConfig, OppositeRule, SimilarityBackend};
use crate::error::{DoublesError, Result};
use crate::store::QuestionStore;
use crate::types::{DedupStats, ProcessStatus, QuestionId, QuestionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Question as shown in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub text: String,
    pub answer: bool,
}

impl From<&QuestionRecord> for QuestionSummary {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            id: record.id,
            text: record.raw_text.clone(),
            answer: record.expected_answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    #[serde(flatten)]
    pub question: QuestionSummary,
    pub opposite: bool,
}

/// A unique question and the duplicates attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub reference: QuestionSummary,
    pub members: Vec<MemberSummary>,
}

/// Settings that shaped the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub threshold: f32,
    pub similarity: SimilarityBackend,
    pub opposite_rule: OppositeRule,
    pub detect_foreign: bool,
}

/// Full report of a processed question store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub app_name: String,
    pub app_version: String,
    pub generated_at: DateTime<Utc>,
    pub settings: RunSettings,
    pub status: ProcessStatus,
    pub stats: DedupStats,
    pub clusters: Vec<ClusterSummary>,
    pub foreign: Vec<QuestionSummary>,
}

impl Report {
    /// Summarize a processed store. Clusters follow input order.
    pub fn build(store: &QuestionStore, config: &DoublesConfig) -> Result<Self> {
        let clustering = store.clustering().ok_or_else(|| {
            DoublesError::Validation("questions must be processed before reporting".to_string())
        })?;
        let records = store.records();

        let record_for = |id: QuestionId| {
            clustering
                .position(id)
                .map(|pos| &records[pos])
                .ok_or_else(|| DoublesError::Validation(format!("unknown question id {}", id)))
        };

        let mut clusters = Vec::new();
        let mut foreign = Vec::new();
        for ((record, question), state) in records
            .iter()
            .zip(store.normalized())
            .zip(&clustering.states)
        {
            if state.is_duplicate {
                continue;
            }
            if clustering.is_excluded(question) {
                foreign.push(QuestionSummary::from(record));
                continue;
            }

            let mut members = Vec::with_capacity(state.duplicate_members.len());
            for member_id in &state.duplicate_members {
                let member = record_for(*member_id)?;
                let opposite = clustering
                    .state(*member_id)
                    .map(|s| s.is_opposite)
                    .unwrap_or(false);
                members.push(MemberSummary {
                    question: QuestionSummary::from(member),
                    opposite,
                });
            }
            clusters.push(ClusterSummary {
                reference: QuestionSummary::from(record),
                members,
            });
        }

        Ok(Self {
            app_name: config.app.name.clone(),
            app_version: config.app.version.clone(),
            generated_at: Utc::now(),
            settings: RunSettings {
                threshold: config.scores.ss_match,
                similarity: config.similarity.backend,
                opposite_rule: config.dedup.opposite_rule,
                detect_foreign: config.language.detect_foreign,
            },
            status: clustering.status,
            stats: clustering.stats.clone(),
            clusters,
            foreign,
        })
    }

    /// Console report: statistics, then each unique question numbered in
    /// order with its duplicates indented beneath it.
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json + "\n")?;
        info!("Report written to {}", path.as_ref().display());
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "*".repeat(80);
        let stats = &self.stats;

        writeln!(f, "{}", rule)?;
        writeln!(f, "Questions in original file      : {}", stats.num_q)?;
        writeln!(f, "Duplicate questions found      : {}", stats.num_duplicates)?;
        writeln!(
            f,
            "Duplicate questions (%)        : {:.1}",
            stats.duplicate_percent()
        )?;
        writeln!(f, "Negative (opposite) duplicates : {}", stats.num_negatives)?;
        writeln!(f, "Answer inconsistencies         : {}", stats.num_inconsistent)?;
        writeln!(f, "Foreign language questions     : {}", stats.num_foreign)?;
        writeln!(f, "Status                         : {}", self.status)?;
        writeln!(f, "{}", rule)?;

        writeln!(f, "{}", rule)?;
        for (idx, cluster) in self.clusters.iter().enumerate() {
            writeln!(
                f,
                "({:05}) {} ({})",
                idx + 1,
                cluster.reference.text,
                cluster.reference.id
            )?;
            for member in &cluster.members {
                let marker = if member.opposite { " [Opposite]" } else { "" };
                writeln!(
                    f,
                    "\t[{}] {}{}",
                    member.question.id, member.question.text, marker
                )?;
            }
        }
        if !self.foreign.is_empty() {
            writeln!(f, "{}", rule)?;
            for question in &self.foreign {
                writeln!(f, "[foreign] {} ({})", question.text, question.id)?;
            }
        }
        writeln!(f, "{}", rule)
    }
}
