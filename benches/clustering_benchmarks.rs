//! Benchmarks for the clustering pass
//!
//! The pass is quadratic when few questions match and close to linear when
//! most of them collapse into a handful of clusters.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use doubles_core::{Deduplicator, LexicalOracle, QuestionRecord, QuestionStore};

const SUBJECTS: [&str; 8] = [
    "hard hat",
    "safety boots",
    "hi-vis vest",
    "ear defenders",
    "gloves",
    "goggles",
    "harness",
    "dust mask",
];

/// `n` questions, each a paraphrase of one of the subjects
fn create_clustered_questions(n: usize) -> Vec<QuestionRecord> {
    (0..n)
        .map(|i| {
            let subject = SUBJECTS[i % SUBJECTS.len()];
            let text = match i % 3 {
                0 => format!("Do you wear the {} on site?", subject),
                1 => format!("Is the {} worn on site?", subject),
                _ => format!("Do you not wear the {} on site?", subject),
            };
            QuestionRecord::new(i as i64 + 1, text, i % 3 != 2)
        })
        .collect()
}

/// Every question is compared with every later one
fn create_distinct_questions(n: usize) -> Vec<QuestionRecord> {
    (0..n)
        .map(|i| {
            QuestionRecord::new(
                i as i64 + 1,
                format!("Is checklist item item{} complete?", i),
                true,
            )
        })
        .collect()
}

fn bench_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustered_questions");
    let oracle = LexicalOracle::new();

    for size in [100, 500, 1000] {
        let records = create_clustered_questions(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let mut store = QuestionStore::from_records(records.clone(), None).unwrap();
                let dedup = Deduplicator::new(&oracle, 0.5);
                black_box(store.process(&dedup, None).unwrap().stats.num_duplicates)
            });
        });
    }

    group.finish();
}

fn bench_distinct(c: &mut Criterion) {
    let mut group = c.benchmark_group("distinct_questions");
    let oracle = LexicalOracle::new();

    for size in [100, 300] {
        let records = create_distinct_questions(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let mut store = QuestionStore::from_records(records.clone(), None).unwrap();
                let dedup = Deduplicator::new(&oracle, 0.8);
                black_box(store.process(&dedup, None).unwrap().stats.comparisons)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_clustered, bench_distinct);
criterion_main!(benches);
