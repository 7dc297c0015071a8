//! Language identification for question text
//!
//! The deduplicator only needs to know whether a question is English.
//! `FunctionWordDetector` decides this from closed-class word evidence,
//! which works on short questions where character statistics do not.

use crate::error::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Detected language of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    French,
    German,
    Spanish,
    Italian,
    Dutch,
    Portuguese,
    /// Written mostly in a non-Latin script
    Other,
    /// Latin script without function-word evidence
    Unknown,
}

impl Language {
    /// ISO 639-1 code, `und` where undetermined
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Portuguese => "pt",
            Language::Other | Language::Unknown => "und",
        }
    }
}

/// Language oracle consumed by the normalizer
pub trait LanguageDetector: Send + Sync {
    /// Classify `text`
    fn detect(&self, text: &str) -> Result<Language>;

    /// Whether `text` should be treated as English. Undetermined Latin
    /// text counts as English so that short noun-only questions survive.
    fn is_english(&self, text: &str) -> Result<bool> {
        Ok(matches!(
            self.detect(text)?,
            Language::English | Language::Unknown
        ))
    }
}

fn word_set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

static PROFILES: Lazy<Vec<(Language, HashSet<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            Language::English,
            word_set(&[
                "the", "a", "an", "is", "are", "was", "were", "do", "does", "did", "have",
                "has", "you", "your", "i", "my", "we", "our", "it", "to", "of", "and", "or",
                "in", "on", "with", "for", "not", "can", "will", "should", "this", "that",
                "at", "be", "any", "there",
            ]),
        ),
        (
            Language::French,
            word_set(&[
                "le", "la", "les", "un", "une", "des", "est", "sont", "vous", "votre", "vos",
                "nous", "je", "et", "ou", "de", "du", "pour", "avec", "dans", "sur", "pas",
                "ne", "que", "qui", "avez", "êtes", "il", "elle", "ce", "cette", "au", "aux",
            ]),
        ),
        (
            Language::German,
            word_set(&[
                "der", "die", "das", "ein", "eine", "ist", "sind", "sie", "ihr", "ihre",
                "haben", "hast", "habe", "und", "oder", "nicht", "mit", "für", "auf", "zu",
                "ich", "wir", "es", "den", "dem", "des", "kein", "keine", "sich",
            ]),
        ),
        (
            Language::Spanish,
            word_set(&[
                "el", "la", "los", "las", "un", "una", "es", "son", "usted", "su", "sus",
                "tiene", "tienes", "y", "o", "de", "del", "para", "con", "en", "no", "que",
                "está", "están", "yo", "nosotros", "por", "se",
            ]),
        ),
        (
            Language::Italian,
            word_set(&[
                "il", "lo", "la", "gli", "le", "un", "una", "è", "sono", "hai", "ha",
                "avete", "tuo", "tua", "suo", "e", "o", "di", "del", "della", "per", "con",
                "non", "che", "io", "noi", "si",
            ]),
        ),
        (
            Language::Dutch,
            word_set(&[
                "de", "het", "een", "is", "zijn", "heeft", "hebt", "heb", "u", "uw", "jij",
                "je", "jouw", "en", "of", "van", "voor", "met", "niet", "ik", "wij", "op",
                "te", "dat", "er",
            ]),
        ),
        (
            Language::Portuguese,
            word_set(&[
                "o", "os", "as", "um", "uma", "é", "são", "você", "seu", "sua", "tem",
                "têm", "e", "ou", "de", "do", "da", "para", "com", "em", "não", "que",
                "eu", "nós", "está", "estão",
            ]),
        ),
    ]
});

/// Detector scoring closed-class word hits per language
#[derive(Debug, Clone, Default)]
pub struct FunctionWordDetector;

impl FunctionWordDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for FunctionWordDetector {
    fn detect(&self, text: &str) -> Result<Language> {
        let lowered = text.to_lowercase();

        let letters: Vec<char> = lowered.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            return Ok(Language::Unknown);
        }
        let latin = letters.iter().filter(|c| is_latin(**c)).count();
        if latin * 2 < letters.len() {
            return Ok(Language::Other);
        }

        let words: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphabetic() || c == '\''))
            .filter(|w| !w.is_empty())
            .collect();

        // Ties keep the earlier profile, so English wins a draw
        let mut best = (Language::Unknown, 0usize);
        for (language, profile) in PROFILES.iter() {
            let hits = words.iter().filter(|w| profile.contains(*w)).count();
            if hits > best.1 {
                best = (*language, hits);
            }
        }

        Ok(best.0)
    }
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c)
}
