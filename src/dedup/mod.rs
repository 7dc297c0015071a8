//! Greedy reference-and-scan clustering of near-duplicate questions
//!
//! One left-to-right pass. The first question not yet clustered becomes a
//! reference (anchor); every later question that is not already a duplicate
//! is compared against it and attached when the similarity strictly exceeds
//! the threshold. A question therefore always belongs to the earliest
//! reference it matches, and clusters are never merged or revisited.
//!
//! Cluster state lives in a single `Vec<ClusterState>` owned by the pass and
//! handed back in a [`Clustering`] when the pass completes. Oracle errors
//! abort the pass; no partial clustering is returned.

use crate::config::{DoublesConfig, OppositeRule};
use crate::error::{DoublesError, Result};
use crate::progress::ProgressSink;
use crate::similarity::SimilarityOracle;
use crate::types::{ClusterState, DedupStats, NormalizedQuestion, ProcessStatus, QuestionId};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// How a matched pair is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchVerdict {
    /// Counted as a negative/opposite duplicate
    pub opposite: bool,
    /// Negation cue and answer disagreement do not line up
    pub inconsistent: bool,
}

/// Classify a duplicate of `anchor`. The negation cue and the answer
/// mismatch should agree; when they do not, the pair is flagged but the
/// match itself stands.
pub fn classify_match(
    anchor: &NormalizedQuestion,
    candidate: &NormalizedQuestion,
    rule: OppositeRule,
) -> MatchVerdict {
    let answers_differ = anchor.expected_answer != candidate.expected_answer;
    let cue = candidate.has_negation_cue;
    let opposite = match rule {
        OppositeRule::NegationCue => cue,
        OppositeRule::AnswerMismatch => answers_differ,
    };
    MatchVerdict {
        opposite,
        inconsistent: cue != answers_differ,
    }
}

/// Result of one processing pass
#[derive(Debug, Clone)]
pub struct Clustering {
    pub status: ProcessStatus,
    pub stats: DedupStats,
    /// One entry per input question, in input order
    pub states: Vec<ClusterState>,
    index: HashMap<QuestionId, usize>,
    foreign_excluded: bool,
}

impl Clustering {
    /// Input position of the question with `id`
    pub fn position(&self, id: QuestionId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn state(&self, id: QuestionId) -> Option<&ClusterState> {
        self.position(id).map(|pos| &self.states[pos])
    }

    /// Whether `question` was kept out of the pass as foreign. Matches the
    /// eligibility rule the pass itself applied.
    pub fn is_excluded(&self, question: &NormalizedQuestion) -> bool {
        self.foreign_excluded && question.is_foreign
    }

    /// Check the structural invariants of a finished pass against the
    /// questions it was computed from.
    pub fn check_invariants(&self, questions: &[NormalizedQuestion]) -> Result<()> {
        if questions.len() != self.states.len() {
            return Err(DoublesError::Validation(format!(
                "{} questions but {} cluster states",
                questions.len(),
                self.states.len()
            )));
        }

        let mut seen_members: HashMap<QuestionId, QuestionId> = HashMap::new();
        for (pos, (question, state)) in questions.iter().zip(&self.states).enumerate() {
            if state.is_reference && state.is_duplicate {
                return Err(DoublesError::Validation(format!(
                    "question {} is both reference and duplicate",
                    question.id
                )));
            }
            if state.is_unique == state.is_duplicate {
                return Err(DoublesError::Validation(format!(
                    "question {} has is_unique == is_duplicate",
                    question.id
                )));
            }
            if let Some(anchor_id) = state.duplicate_of {
                let anchor_pos = self.position(anchor_id).ok_or_else(|| {
                    DoublesError::Validation(format!("unknown anchor id {}", anchor_id))
                })?;
                if anchor_pos >= pos || !self.states[anchor_pos].is_reference {
                    return Err(DoublesError::Validation(format!(
                        "question {} points at {} which is not an earlier reference",
                        question.id, anchor_id
                    )));
                }
            }
            for member in &state.duplicate_members {
                if let Some(previous) = seen_members.insert(*member, question.id) {
                    return Err(DoublesError::Validation(format!(
                        "question {} is a member of both {} and {}",
                        member, previous, question.id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Clusters normalized questions using an injected similarity oracle
pub struct Deduplicator<'a> {
    oracle: &'a dyn SimilarityOracle,
    threshold: f32,
    opposite_rule: OppositeRule,
    exclude_foreign: bool,
}

impl<'a> Deduplicator<'a> {
    /// `threshold` is compared with strict `>`
    pub fn new(oracle: &'a dyn SimilarityOracle, threshold: f32) -> Self {
        Self {
            oracle,
            threshold,
            opposite_rule: OppositeRule::default(),
            exclude_foreign: false,
        }
    }

    pub fn from_config(oracle: &'a dyn SimilarityOracle, config: &DoublesConfig) -> Self {
        Self::new(oracle, config.scores.ss_match)
            .with_opposite_rule(config.dedup.opposite_rule)
            .with_foreign_exclusion(config.language.detect_foreign)
    }

    pub fn with_opposite_rule(mut self, rule: OppositeRule) -> Self {
        self.opposite_rule = rule;
        self
    }

    /// Keep foreign questions out of both the anchor selection and the scan
    pub fn with_foreign_exclusion(mut self, exclude: bool) -> Self {
        self.exclude_foreign = exclude;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Single eligibility predicate used at both skip points
    fn is_eligible(&self, question: &NormalizedQuestion) -> bool {
        !(self.exclude_foreign && question.is_foreign)
    }

    /// Run one clustering pass over `questions` in order
    pub fn process(
        &self,
        questions: &[NormalizedQuestion],
        mut progress: Option<&mut dyn ProgressSink>,
    ) -> Result<Clustering> {
        info!("Processing questions...");

        let n = questions.len();
        let index: HashMap<QuestionId, usize> = questions
            .iter()
            .enumerate()
            .map(|(pos, q)| (q.id, pos))
            .collect();
        if index.len() != n {
            return Err(DoublesError::Validation(format!(
                "{} questions but only {} distinct ids",
                n,
                index.len()
            )));
        }
        let mut states = vec![ClusterState::default(); n];
        let mut stats = DedupStats {
            num_q: n,
            num_foreign: questions.iter().filter(|q| !self.is_eligible(q)).count(),
            ..Default::default()
        };

        if n < 2 {
            warn!("Status: {} ({} question(s))", ProcessStatus::InsufficientData, n);
            return Ok(Clustering {
                status: ProcessStatus::InsufficientData,
                stats,
                states,
                index,
                foreign_excluded: self.exclude_foreign,
            });
        }

        for i in 0..n {
            let anchor = &questions[i];
            if let Some(sink) = progress.as_deref_mut() {
                sink.report(((i + 1) * 100 / n) as u8, anchor.id);
            }

            if states[i].is_reference || states[i].is_duplicate || !self.is_eligible(anchor) {
                continue;
            }

            states[i].is_reference = true;
            stats.num_references += 1;
            debug!("Ref. question, id: {}, text: {}", anchor.id, anchor.comparison_text);

            for j in (i + 1)..n {
                let candidate = &questions[j];
                if states[j].is_duplicate || !self.is_eligible(candidate) {
                    continue;
                }

                let similarity = self
                    .oracle
                    .similarity(&anchor.comparison_text, &candidate.comparison_text)?;
                stats.comparisons += 1;

                if similarity > self.threshold {
                    let verdict = classify_match(anchor, candidate, self.opposite_rule);
                    states[j].mark_duplicate(anchor.id, verdict.opposite);
                    states[i].duplicate_members.push(candidate.id);
                    stats.num_duplicates += 1;

                    if verdict.opposite {
                        stats.num_negatives += 1;
                        debug!(
                            "OPPOSITE, id: {}, text: {}, similarity: {:.3}",
                            candidate.id, candidate.comparison_text, similarity
                        );
                    } else {
                        debug!(
                            "DUPLICATE, id: {}, text: {}, similarity: {:.3}",
                            candidate.id, candidate.comparison_text, similarity
                        );
                    }

                    if verdict.inconsistent {
                        stats.num_inconsistent += 1;
                        warn!(
                            "Answer inconsistency: question {} duplicates {} (negation cue: {}, answers differ: {})",
                            candidate.id,
                            anchor.id,
                            candidate.has_negation_cue,
                            anchor.expected_answer != candidate.expected_answer
                        );
                    }
                } else {
                    debug!(
                        "Checked question, id: {}, text: {}, similarity: {:.3}",
                        candidate.id, candidate.comparison_text, similarity
                    );
                }
            }
        }

        info!(
            "Found {} duplicate(s) ({} negative) among {} questions using {} comparisons",
            stats.num_duplicates, stats.num_negatives, n, stats.comparisons
        );

        Ok(Clustering {
            status: ProcessStatus::Completed,
            stats,
            states,
            index,
            foreign_excluded: self.exclude_foreign,
        })
    }
}
