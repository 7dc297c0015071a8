//! Question normalization
//!
//! Turns raw question text into the canonical string used for similarity
//! comparison and derives the negation cue. Language detection is optional
//! and injected by the caller.

pub mod stop_words;

use crate::error::Result;
use crate::language::LanguageDetector;
use crate::types::{NormalizedQuestion, QuestionRecord};

/// Characters trimmed from both ends of every token
const TRIM_CHARS: [char; 4] = ['?', ',', '.', '!'];

/// Token marking a negated phrasing
const NEGATION_TOKEN: &str = "not";

/// Lexical part of normalization: comparison text and negation cue
pub fn comparison_form(raw_text: &str) -> (String, bool) {
    let lowered = raw_text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    // Checked before stripping, so "not?" does not count
    let has_negation_cue = tokens.iter().any(|t| *t == NEGATION_TOKEN);

    let comparison_text = tokens
        .iter()
        .map(|t| t.trim_matches(&TRIM_CHARS[..]))
        .filter(|t| !t.is_empty() && !stop_words::is_stop_word(t))
        .collect::<Vec<_>>()
        .join(" ");

    (comparison_text, has_negation_cue)
}

/// Normalize one record. With a detector, the raw text is also classified
/// and `is_foreign` set when it is not English.
pub fn normalize(
    record: &QuestionRecord,
    detector: Option<&dyn LanguageDetector>,
) -> Result<NormalizedQuestion> {
    let (comparison_text, has_negation_cue) = comparison_form(&record.raw_text);

    let is_foreign = match detector {
        Some(d) => !d.is_english(&record.raw_text)?,
        None => false,
    };

    Ok(NormalizedQuestion {
        id: record.id,
        expected_answer: record.expected_answer,
        comparison_text,
        has_negation_cue,
        is_foreign,
    })
}

/// Normalize every record, preserving order
pub fn normalize_all(
    records: &[QuestionRecord],
    detector: Option<&dyn LanguageDetector>,
) -> Result<Vec<NormalizedQuestion>> {
    records.iter().map(|r| normalize(r, detector)).collect()
}
