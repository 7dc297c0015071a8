//! End-to-end tests: CSV in, clustering, CSV partitions out

use doubles_core::{
    error::Result, CsvPartitionSink, CsvQuestionSource, Deduplicator, DoublesError,
    FunctionWordDetector, LexicalOracle, OppositeRule, ProcessStatus, QuestionId, QuestionStore,
    Report, SimilarityOracle,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Oracle scoring the two footware phrasings as near-identical and
/// everything else as unrelated
struct FootwareOracle;

impl SimilarityOracle for FootwareOracle {
    fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let pair = [a, b];
        if a == b {
            Ok(1.0)
        } else if pair.contains(&"right footware") && pair.contains(&"correct footware") {
            Ok(0.93)
        } else {
            Ok(0.2)
        }
    }
}

struct FailingOracle;

impl SimilarityOracle for FailingOracle {
    fn similarity(&self, _a: &str, _b: &str) -> Result<f32> {
        Err(DoublesError::Oracle("model unavailable".to_string()))
    }
}

fn write_input(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("questions.csv");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_footware_questions_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(
        temp_dir.path(),
        "Question,Answer\n\
         Do you have the right footware?,yes\n\
         Do you have the correct footware?,yes\n\
         Is your shirt nice and bright?,yes\n",
    );

    let mut source = CsvQuestionSource::open(&input).unwrap();
    let mut store = QuestionStore::load(&mut source, None).unwrap();
    assert_eq!(store.num_q(), 3);

    let oracle = FootwareOracle;
    let clustering = store
        .process(&Deduplicator::new(&oracle, 0.8), None)
        .unwrap();

    assert_eq!(clustering.status, ProcessStatus::Completed);
    assert!(clustering.states[0].is_unique);
    assert!(clustering.states[1].is_duplicate);
    assert_eq!(clustering.states[1].duplicate_of, Some(QuestionId(1)));
    assert!(clustering.states[2].is_unique);
    assert_eq!(clustering.stats.num_duplicates, 1);

    let mut sink = CsvPartitionSink::for_output(temp_dir.path().join("results.csv"));
    store.export(&mut sink).unwrap();

    let unique = fs::read_to_string(temp_dir.path().join("results_unique.csv")).unwrap();
    assert_eq!(
        unique,
        "id,question,answer\n\
         1,Do you have the right footware?,yes\n\
         3,Is your shirt nice and bright?,yes\n"
    );
    let duplicate = fs::read_to_string(temp_dir.path().join("results_duplicate.csv")).unwrap();
    assert_eq!(
        duplicate,
        "id,question,answer,duplicate_of\n2,Do you have the correct footware?,yes,1\n"
    );
    let foreign = fs::read_to_string(temp_dir.path().join("results_foreign.csv")).unwrap();
    assert_eq!(foreign, "id,question,answer\n");
}

#[test]
fn test_single_question_reports_insufficient_data() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "id,question,answer\n5,Is it raining?,no\n");

    let mut source = CsvQuestionSource::open(&input).unwrap();
    let mut store = QuestionStore::load(&mut source, None).unwrap();
    let oracle = FailingOracle;
    let clustering = store
        .process(&Deduplicator::new(&oracle, 0.8), None)
        .unwrap();

    // The failing oracle proves no comparison happened
    assert_eq!(clustering.status, ProcessStatus::InsufficientData);
    assert!(clustering.states[0].is_unique);
    assert_eq!(clustering.stats.comparisons, 0);
}

#[test]
fn test_oracle_failure_is_fatal() {
    let records = vec![
        doubles_core::QuestionRecord::new(1, "Is it raining?", false),
        doubles_core::QuestionRecord::new(2, "Is it snowing?", false),
    ];
    let mut store = QuestionStore::from_records(records, None).unwrap();
    let oracle = FailingOracle;
    let result = store.process(&Deduplicator::new(&oracle, 0.8), None);

    assert!(matches!(result, Err(DoublesError::Oracle(_))));
    assert!(store.clustering().is_none());
}

#[test]
fn test_negated_phrasings_with_lexical_oracle() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(
        temp_dir.path(),
        "id,question,answer\n\
         10,Do you wear a hard hat on site?,yes\n\
         11,Do you not wear a hard hat on site?,no\n\
         12,Is the hard hat worn on site?,no\n\
         13,Are the fire exits clear?,yes\n",
    );

    let mut source = CsvQuestionSource::open(&input).unwrap();
    let mut store = QuestionStore::load(&mut source, None).unwrap();
    let oracle = LexicalOracle::new();
    let clustering = store
        .process(&Deduplicator::new(&oracle, 0.5), None)
        .unwrap();

    // "wear hard hat site" vs "hard hat worn site": 3 of 5 tokens shared
    assert_eq!(clustering.state(QuestionId(11)).unwrap().duplicate_of, Some(QuestionId(10)));
    assert_eq!(clustering.state(QuestionId(12)).unwrap().duplicate_of, Some(QuestionId(10)));
    assert!(clustering.state(QuestionId(11)).unwrap().is_opposite);
    assert!(!clustering.state(QuestionId(12)).unwrap().is_opposite);
    assert_eq!(clustering.stats.num_negatives, 1);
    // 12 flips the answer without saying "not"
    assert_eq!(clustering.stats.num_inconsistent, 1);
    assert!(clustering.state(QuestionId(13)).unwrap().is_reference);
}

#[test]
fn test_answer_mismatch_rule_end_to_end() {
    let records = vec![
        doubles_core::QuestionRecord::new(1, "Do you wear gloves?", true),
        doubles_core::QuestionRecord::new(2, "Do you wear gloves?", false),
    ];
    let mut store = QuestionStore::from_records(records, None).unwrap();
    let oracle = LexicalOracle::new();
    let clustering = store
        .process(
            &Deduplicator::new(&oracle, 0.8).with_opposite_rule(OppositeRule::AnswerMismatch),
            None,
        )
        .unwrap();

    assert!(clustering.states[1].is_opposite);
    assert_eq!(clustering.stats.num_negatives, 1);
    assert_eq!(clustering.stats.num_inconsistent, 1);
}

#[test]
fn test_foreign_questions_go_to_foreign_partition() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(
        temp_dir.path(),
        "id,question,answer\n\
         1,Do you have the right footware?,yes\n\
         2,Avez-vous les bonnes chaussures pour le travail?,yes\n\
         3,Have you got the right footware?,yes\n\
         4,Haben Sie die richtigen Schuhe für die Arbeit?,yes\n",
    );

    let detector = FunctionWordDetector::new();
    let mut source = CsvQuestionSource::open(&input).unwrap();
    let mut store = QuestionStore::load(&mut source, Some(&detector)).unwrap();
    let oracle = LexicalOracle::new();
    let clustering = store
        .process(
            &Deduplicator::new(&oracle, 0.5).with_foreign_exclusion(true),
            None,
        )
        .unwrap();

    let stats = clustering.stats.clone();
    assert_eq!(stats.num_foreign, 2);
    assert_eq!(stats.num_duplicates, 1);
    assert_eq!(stats.num_references + stats.num_duplicates + stats.num_foreign, 4);

    let mut sink = CsvPartitionSink::for_output(temp_dir.path().join("out.csv"));
    store.export(&mut sink).unwrap();
    let foreign = fs::read_to_string(&sink.foreign_path).unwrap();
    assert_eq!(
        foreign,
        "id,question,answer\n\
         2,Avez-vous les bonnes chaussures pour le travail?,yes\n\
         4,Haben Sie die richtigen Schuhe für die Arbeit?,yes\n"
    );

    let report = Report::build(&store, &doubles_core::DoublesConfig::default()).unwrap();
    assert_eq!(report.foreign.len(), 2);
    assert_eq!(report.clusters.len(), 1);
}

#[test]
fn test_malformed_input_rejected_before_processing() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(
        temp_dir.path(),
        "id,question,answer\n1,Is it raining?,yes\n2,Is it snowing?,perhaps\n",
    );

    let mut source = CsvQuestionSource::open(&input).unwrap();
    let result = QuestionStore::load(&mut source, None);
    assert!(matches!(result, Err(DoublesError::InvalidRecord { line: 3, .. })));
}
