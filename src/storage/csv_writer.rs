//! CSV partition writer
//!
//! For an output path `<dir>/<stem>.csv` the three partitions are written
//! to `<stem>_unique.csv`, `<stem>_duplicate.csv` and `<stem>_foreign.csv`
//! in the same directory. Header rows are always written.

use super::{answer_label, PartitionSink, Partitions};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes each partition to its own CSV file
#[derive(Debug, Clone)]
pub struct CsvPartitionSink {
    pub unique_path: PathBuf,
    pub duplicate_path: PathBuf,
    pub foreign_path: PathBuf,
}

impl CsvPartitionSink {
    /// Derive the three partition files from the requested output path
    pub fn for_output(output: impl AsRef<Path>) -> Self {
        let output = output.as_ref();
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "questions".to_string());
        let dir = output.parent().unwrap_or_else(|| Path::new(""));
        let path = |suffix: &str| dir.join(format!("{}_{}.csv", stem, suffix));

        Self {
            unique_path: path("unique"),
            duplicate_path: path("duplicate"),
            foreign_path: path("foreign"),
        }
    }
}

impl PartitionSink for CsvPartitionSink {
    fn write_partitions(&mut self, partitions: &Partitions<'_>) -> Result<()> {
        let mut unique = csv::Writer::from_path(&self.unique_path)?;
        unique.write_record(["id", "question", "answer"])?;
        for record in &partitions.unique {
            unique.write_record([
                record.id.to_string().as_str(),
                record.raw_text.as_str(),
                answer_label(record.expected_answer),
            ])?;
        }
        unique.flush()?;

        let mut duplicate = csv::Writer::from_path(&self.duplicate_path)?;
        duplicate.write_record(["id", "question", "answer", "duplicate_of"])?;
        for row in &partitions.duplicate {
            duplicate.write_record([
                row.record.id.to_string().as_str(),
                row.record.raw_text.as_str(),
                answer_label(row.record.expected_answer),
                row.duplicate_of.to_string().as_str(),
            ])?;
        }
        duplicate.flush()?;

        let mut foreign = csv::Writer::from_path(&self.foreign_path)?;
        foreign.write_record(["id", "question", "answer"])?;
        for record in &partitions.foreign {
            foreign.write_record([
                record.id.to_string().as_str(),
                record.raw_text.as_str(),
                answer_label(record.expected_answer),
            ])?;
        }
        foreign.flush()?;

        info!(
            "Exported {} unique, {} duplicate and {} foreign question(s) to {}",
            partitions.unique.len(),
            partitions.duplicate.len(),
            partitions.foreign.len(),
            self.unique_path
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
        Ok(())
    }
}
