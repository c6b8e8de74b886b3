//! The rhyme engine: a loaded dictionary, its index, and the filter settings.
//!
//! Build one [`RhymeEngine`] at startup and pass it to whatever needs it.
//! Everything after construction is a read-only query, so an engine can be
//! shared across threads behind an [`Arc`]. [`SharedEngine`] wraps the
//! one-time load for callers that want it on first use.
//!
//! ```
//! use rhymekit_core::RhymeEngine;
//!
//! let engine = RhymeEngine::from_text("NIGHT  N AY1 T\nLIGHT  L AY1 T\n");
//! assert_eq!(engine.syllable_count("night"), 1);
//! assert_eq!(engine.near_rhymes("night", 10), ["light"]);
//! ```

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};

use crate::dictionary::{PronouncingDictionary, best_of};
use crate::error::DictionaryResult;
use crate::index::{IndexStats, RhymeIndex};
use crate::matcher::{self, MatchSettings, RhymeOrder, ScoredCandidate};
use crate::phonetics;

/// A pronouncing dictionary with its rhyme index.
#[derive(Debug, Clone)]
pub struct RhymeEngine {
    dict: PronouncingDictionary,
    index: RhymeIndex,
    settings: MatchSettings,
}

impl RhymeEngine {
    /// Index an already parsed dictionary.
    pub fn new(dict: PronouncingDictionary) -> Self {
        let index = RhymeIndex::build(&dict);
        Self {
            dict,
            index,
            settings: MatchSettings::default(),
        }
    }

    /// Parse and index dictionary text.
    pub fn from_text(text: &str) -> Self {
        Self::new(PronouncingDictionary::parse(text))
    }

    /// Load and index a dictionary file.
    pub fn load(path: &Utf8Path) -> DictionaryResult<Self> {
        PronouncingDictionary::from_path(path).map(Self::new)
    }

    /// Replace the filter settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: MatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Filter settings in effect.
    pub const fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// The underlying dictionary.
    pub const fn dictionary(&self) -> &PronouncingDictionary {
        &self.dict
    }

    /// Index bucket counts.
    pub const fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// Whether the dictionary knows `word`.
    pub fn contains(&self, word: &str) -> bool {
        self.dict.resolve(word).is_some()
    }

    /// Syllables in the word's best pronunciation; 0 when unknown.
    pub fn syllable_count(&self, word: &str) -> usize {
        self.dict.syllable_count(word)
    }

    /// The word's rhyme tail, stress digits stripped.
    pub fn rhyme_tail(&self, word: &str) -> Option<Vec<String>> {
        self.dict
            .best_pronunciation(word)
            .and_then(phonetics::rhyme_tail)
    }

    /// The word's perfect-rhyme key.
    pub fn perfect_key(&self, word: &str) -> Option<String> {
        self.dict
            .best_pronunciation(word)
            .and_then(phonetics::perfect_key)
    }

    /// Every other word with the same perfect key, in dictionary order.
    pub fn perfect_rhyme_group(&self, word: &str) -> Vec<String> {
        let Some((key, prons)) = self.dict.resolve(word) else {
            return Vec::new();
        };
        let Some(perfect) = best_of(prons).and_then(phonetics::perfect_key) else {
            return Vec::new();
        };
        self.index
            .perfect_bucket(&perfect)
            .iter()
            .filter(|w| w.as_str() != key)
            .cloned()
            .collect()
    }

    /// Up to `limit` words sharing the word's last vowel sound.
    pub fn near_rhyme_candidates(&self, word: &str, limit: usize) -> Vec<String> {
        matcher::near_rhyme_candidates(&self.dict, &self.index, word, limit)
    }

    /// Candidates that pass the near-rhyme gates, in input order.
    pub fn filter_near_rhymes<S: AsRef<str>>(&self, word: &str, candidates: &[S]) -> Vec<String> {
        matcher::filter_near_rhymes(&self.dict, word, candidates, &self.settings)
    }

    /// Candidates that pass the near-rhyme gates, with scores.
    pub fn score_near_rhymes<S: AsRef<str>>(
        &self,
        word: &str,
        candidates: &[S],
    ) -> Vec<ScoredCandidate> {
        matcher::score_candidates(&self.dict, word, candidates, &self.settings)
    }

    /// Retrieve and filter near rhymes in one step.
    pub fn near_rhymes(&self, word: &str, limit: usize) -> Vec<String> {
        let candidates = self.near_rhyme_candidates(word, limit);
        self.filter_near_rhymes(word, &candidates)
    }

    /// Retrieve, filter, score, and order near rhymes.
    #[tracing::instrument(skip(self))]
    pub fn ranked_near_rhymes(
        &self,
        word: &str,
        limit: usize,
        order: RhymeOrder,
    ) -> Vec<ScoredCandidate> {
        let candidates = self.near_rhyme_candidates(word, limit);
        let mut scored = self.score_near_rhymes(word, &candidates);
        matcher::apply_order(&mut scored, order);
        tracing::debug!(
            candidates = candidates.len(),
            kept = scored.len(),
            "near rhyme query"
        );
        scored
    }
}

/// A dictionary path whose engine is built on first use and then reused.
///
/// Concurrent first callers wait for a single build. A failed build is not
/// cached, so a later call retries.
#[derive(Debug)]
pub struct SharedEngine {
    path: Utf8PathBuf,
    settings: MatchSettings,
    engine: OnceLock<Arc<RhymeEngine>>,
    building: Mutex<()>,
}

impl SharedEngine {
    /// Defer loading `path` until the first [`get`](Self::get).
    pub fn new<P: AsRef<Utf8Path>>(path: P, settings: MatchSettings) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            settings,
            engine: OnceLock::new(),
            building: Mutex::new(()),
        }
    }

    /// Dictionary path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the engine has been built.
    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    /// The engine, building it if this is the first call.
    pub fn get(&self) -> DictionaryResult<Arc<RhymeEngine>> {
        if let Some(engine) = self.engine.get() {
            return Ok(Arc::clone(engine));
        }
        let _building = self.building.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(engine) = self.engine.get() {
            return Ok(Arc::clone(engine));
        }
        let engine = Arc::new(RhymeEngine::load(&self.path)?.with_settings(self.settings));
        Ok(Arc::clone(self.engine.get_or_init(|| engine)))
    }
}
