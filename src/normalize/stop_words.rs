//! English stop words removed before similarity comparison.
//!
//! A closed list of high-frequency function words. "not" is included on
//! purpose: a negated phrasing should compare as a near-duplicate of its
//! positive form, and the negation is tracked separately as a cue.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // articles & determiners
        "the", "a", "an", "this", "that", "these", "those",
        // be-verbs
        "is", "are", "was", "were", "be", "been", "being", "am",
        // auxiliaries
        "have", "has", "had", "do", "does", "did",
        // modals
        "will", "would", "shall", "should", "may", "might", "can", "could", "must",
        // prepositions
        "to", "of", "in", "for", "on", "with", "at", "by", "from", "into", "about",
        // conjunctions & negation
        "and", "or", "but", "not", "no", "if", "then", "than", "so", "as",
        // contracted auxiliaries
        "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't",
        "can't", "won't", "haven't", "hasn't",
        // pronouns
        "i", "you", "he", "she", "it", "we", "they",
        "me", "him", "her", "us", "them",
        "my", "your", "his", "our", "their", "its",
        // interrogatives
        "who", "what", "which", "when", "where", "how", "why",
        // adverbs
        "very", "also", "just", "too",
        // other high-frequency structural words
        "any", "some", "there", "here",
    ]
    .into_iter()
    .collect()
});

/// Whether `token` (already lower-cased and stripped) is a stop word
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}
