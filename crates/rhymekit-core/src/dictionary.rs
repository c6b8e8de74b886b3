//! Pronouncing dictionary parsing and lookup.
//!
//! The source format is the CMU Pronouncing Dictionary layout, one entry per
//! line:
//!
//! ```text
//! ;;; comment lines start with three semicolons
//! ORANGE  AO1 R AH0 N JH
//! ORANGE(1)  AO1 R IH0 N JH
//! ```
//!
//! The headword's `(N)` variant suffix is dropped, so every variant of a word
//! is stored under one key. Vowel phonemes end in a stress digit; the digits
//! are collected separately so the syllable count is their number.

use std::collections::HashMap;
use std::sync::LazyLock;

use camino::Utf8Path;
use regex::Regex;

use crate::error::{DictionaryError, DictionaryResult};
use crate::phonetics::{Stress, stress_of};

/// Prefix of a comment line.
const COMMENT_PREFIX: &str = ";;;";

/// Trailing variant marker on a headword, e.g. `word(2)`.
static VARIANT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d+\)$").expect("valid regex"));

/// One pronunciation of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pronunciation {
    phones: Vec<String>,
    stresses: Vec<Stress>,
}

impl Pronunciation {
    /// Build a pronunciation from phoneme tokens, collecting vowel stresses.
    pub fn from_phones(phones: Vec<String>) -> Self {
        let stresses = phones.iter().filter_map(|p| stress_of(p)).collect();
        Self { phones, stresses }
    }

    /// Phoneme tokens with stress digits intact.
    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    /// Stress of each vowel, in order.
    pub fn stresses(&self) -> &[Stress] {
        &self.stresses
    }

    /// Number of syllables (vowel phonemes).
    pub fn syllable_count(&self) -> usize {
        self.stresses.len()
    }
}

/// Pick the pronunciation with the most syllables; the first one wins ties.
pub fn best_of(pronunciations: &[Pronunciation]) -> Option<&Pronunciation> {
    pronunciations.iter().reduce(|best, candidate| {
        if candidate.syllable_count() > best.syllable_count() {
            candidate
        } else {
            best
        }
    })
}

/// Normalize a query word for lookup: lowercase, keep only `[a-z'-]`.
pub fn normalize_query(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || matches!(c, '\'' | '-'))
        .collect()
}

/// Word → pronunciations, in source order.
#[derive(Debug, Clone, Default)]
pub struct PronouncingDictionary {
    entries: Vec<(String, Vec<Pronunciation>)>,
    positions: HashMap<String, usize>,
}

impl PronouncingDictionary {
    /// Parse dictionary text. Malformed lines are skipped.
    #[tracing::instrument(skip(text), fields(text_len = text.len()))]
    pub fn parse(text: &str) -> Self {
        let mut dict = Self::default();
        let mut skipped = 0usize;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }
            // cmudict.dict carries inline comments: `achill AE1 K IH0 L # place, irish`
            let mut tokens = line
                .split_whitespace()
                .take_while(|token| !token.starts_with('#'));
            let Some(headword) = tokens.next() else {
                skipped += 1;
                continue;
            };
            let phones: Vec<String> = tokens.map(str::to_string).collect();
            if phones.is_empty() {
                skipped += 1;
                continue;
            }

            let word = VARIANT_SUFFIX.replace(headword, "").to_lowercase();
            dict.insert(word, Pronunciation::from_phones(phones));
        }

        tracing::debug!(
            words = dict.len(),
            skipped_lines = skipped,
            "parsed pronouncing dictionary"
        );
        dict
    }

    /// Read and parse a dictionary file.
    ///
    /// A missing file or one with no usable entries is an error; the engine
    /// cannot run without a dictionary.
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub fn from_path(path: &Utf8Path) -> DictionaryResult<Self> {
        let text =
            std::fs::read_to_string(path.as_std_path()).map_err(|source| DictionaryError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let dict = Self::parse(&text);
        if dict.is_empty() {
            return Err(DictionaryError::Empty {
                path: path.to_path_buf(),
            });
        }
        tracing::info!(words = dict.len(), "loaded pronouncing dictionary");
        Ok(dict)
    }

    fn insert(&mut self, word: String, pronunciation: Pronunciation) {
        if let Some(&pos) = self.positions.get(&word) {
            self.entries[pos].1.push(pronunciation);
        } else {
            self.positions.insert(word.clone(), self.entries.len());
            self.entries.push((word, vec![pronunciation]));
        }
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no words.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(word, pronunciations)` in the order words first appear in
    /// the source.
    pub fn words(&self) -> impl Iterator<Item = (&str, &[Pronunciation])> {
        self.entries
            .iter()
            .map(|(word, prons)| (word.as_str(), prons.as_slice()))
    }

    /// Resolve a query to its dictionary key and pronunciations.
    ///
    /// Tries the normalized form first, then the normalized form without
    /// apostrophes.
    pub fn resolve(&self, word: &str) -> Option<(&str, &[Pronunciation])> {
        let normalized = normalize_query(word);
        let pos = self.positions.get(&normalized).copied().or_else(|| {
            if normalized.contains('\'') {
                self.positions.get(&normalized.replace('\'', "")).copied()
            } else {
                None
            }
        })?;
        let (key, prons) = &self.entries[pos];
        Some((key.as_str(), prons.as_slice()))
    }

    /// All pronunciations of a word; empty when the word is unknown.
    pub fn pronunciations(&self, word: &str) -> &[Pronunciation] {
        self.resolve(word)
            .map(|(_, prons)| prons)
            .unwrap_or_default()
    }

    /// The pronunciation with the most syllables.
    pub fn best_pronunciation(&self, word: &str) -> Option<&Pronunciation> {
        best_of(self.pronunciations(word))
    }

    /// Syllables in the best pronunciation; 0 for unknown words.
    pub fn syllable_count(&self, word: &str) -> usize {
        self.best_pronunciation(word)
            .map_or(0, Pronunciation::syllable_count)
    }
}
