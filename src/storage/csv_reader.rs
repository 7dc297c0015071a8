//! CSV question reader
//!
//! Expects a header row. Columns are found by name, case-insensitively:
//! `question` and `answer` are required, `id` is optional. Without an `id`
//! column questions are numbered from 1 in row order.

use super::{parse_answer, QuestionSource};
use crate::error::{DoublesError, Result};
use crate::types::{QuestionId, QuestionRecord};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Reads question records from CSV
pub struct CsvQuestionSource<R: Read> {
    reader: csv::Reader<R>,
}

impl CsvQuestionSource<BufReader<File>> {
    /// Open a CSV file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read> CsvQuestionSource<R> {
    pub fn from_reader(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);
        Self { reader }
    }
}

/// Positions of the columns we read
struct Columns {
    id: Option<usize>,
    question: usize,
    answer: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let missing = |name: &str| DoublesError::InvalidRecord {
            line: 1,
            reason: format!("missing '{}' column", name),
        };
        Ok(Self {
            id: find("id"),
            question: find("question").ok_or_else(|| missing("question"))?,
            answer: find("answer").ok_or_else(|| missing("answer"))?,
        })
    }
}

impl<R: Read> QuestionSource for CsvQuestionSource<R> {
    fn read_questions(&mut self) -> Result<Vec<QuestionRecord>> {
        let columns = Columns::from_headers(self.reader.headers()?)?;

        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for (row, result) in self.reader.records().enumerate() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(row as u64 + 2);
            let field = |pos: usize, name: &str| {
                record.get(pos).ok_or_else(|| DoublesError::InvalidRecord {
                    line,
                    reason: format!("missing '{}' value", name),
                })
            };

            let id = match columns.id {
                Some(pos) => {
                    let raw = field(pos, "id")?.trim();
                    raw.parse::<i64>().map_err(|_| DoublesError::InvalidRecord {
                        line,
                        reason: format!("id '{}' is not an integer", raw),
                    })?
                }
                None => row as i64 + 1,
            };

            let question = field(columns.question, "question")?;
            let raw_answer = field(columns.answer, "answer")?;
            let answer = parse_answer(raw_answer).ok_or_else(|| DoublesError::InvalidRecord {
                line,
                reason: format!("answer '{}' is not yes/no", raw_answer),
            })?;

            if !seen.insert(id) {
                return Err(DoublesError::DuplicateId(id));
            }
            records.push(QuestionRecord::new(QuestionId(id), question, answer));
        }

        info!("Number of questions read: {}", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Result<Vec<QuestionRecord>> {
        CsvQuestionSource::from_reader(csv.as_bytes()).read_questions()
    }

    #[test]
    fn test_reads_id_question_answer() {
        let records = read(
            "id,question,answer\n\
             7,Do you have the right footware?,yes\n\
             9,\"Is it cold, today?\",NO\n",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], QuestionRecord::new(7, "Do you have the right footware?", true));
        assert_eq!(records[1].raw_text, "Is it cold, today?");
        assert!(!records[1].expected_answer);
    }

    #[test]
    fn test_headers_any_case_and_order_without_id() {
        let records = read("Answer,Question\nyes,First?\nno,Second?\n").unwrap();
        assert_eq!(records[0].id, QuestionId(1));
        assert_eq!(records[1].id, QuestionId(2));
        assert_eq!(records[1].raw_text, "Second?");
    }

    #[test]
    fn test_rejects_bad_answer() {
        let err = read("question,answer\nIs it?,maybe\n").unwrap_err();
        assert!(matches!(err, DoublesError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_rejects_bad_id() {
        let err = read("id,question,answer\nx1,Is it?,yes\n").unwrap_err();
        assert!(matches!(err, DoublesError::InvalidRecord { .. }));
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let err = read("id,question,answer\n1,A?,yes\n1,B?,no\n").unwrap_err();
        assert!(matches!(err, DoublesError::DuplicateId(1)));
    }

    #[test]
    fn test_rejects_missing_column() {
        let err = read("id,question\n1,A?\n").unwrap_err();
        assert!(matches!(err, DoublesError::InvalidRecord { line: 1, .. }));
    }

    #[test]
    fn test_empty_file_has_no_questions() {
        assert!(read("id,question,answer\n").unwrap().is_empty());
    }
}
