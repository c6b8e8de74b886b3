//! Inverted rhyme indexes over a pronouncing dictionary.
//!
//! Both indexes are keyed from each word's best pronunciation and list words
//! in dictionary order. Candidate truncation depends on that order, so
//! buckets are never sorted.

use std::collections::HashMap;

use serde::Serialize;

use crate::dictionary::{PronouncingDictionary, best_of};
use crate::phonetics::{near_key, perfect_key};

/// Bucket and entry counts for a built index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Distinct near keys.
    pub near_buckets: usize,
    /// Distinct perfect keys.
    pub perfect_buckets: usize,
    /// Words placed in the near index.
    pub indexed_words: usize,
    /// Words with no vowel phoneme, left out of both indexes.
    pub skipped_words: usize,
}

/// Near-key and perfect-key buckets.
#[derive(Debug, Clone, Default)]
pub struct RhymeIndex {
    near: HashMap<String, Vec<String>>,
    perfect: HashMap<String, Vec<String>>,
    stats: IndexStats,
}

impl RhymeIndex {
    /// Build both indexes in one pass over the dictionary.
    #[tracing::instrument(skip_all, fields(words = dict.len()))]
    pub fn build(dict: &PronouncingDictionary) -> Self {
        let mut index = Self::default();

        for (word, prons) in dict.words() {
            let Some(best) = best_of(prons) else {
                continue;
            };
            let near = near_key(best);
            let perfect = perfect_key(best);
            if near.is_none() && perfect.is_none() {
                index.stats.skipped_words += 1;
                continue;
            }
            if let Some(key) = near {
                index.near.entry(key).or_default().push(word.to_string());
                index.stats.indexed_words += 1;
            }
            if let Some(key) = perfect {
                index.perfect.entry(key).or_default().push(word.to_string());
            }
        }

        index.stats.near_buckets = index.near.len();
        index.stats.perfect_buckets = index.perfect.len();
        tracing::info!(
            near_buckets = index.stats.near_buckets,
            perfect_buckets = index.stats.perfect_buckets,
            skipped = index.stats.skipped_words,
            "built rhyme index"
        );
        index
    }

    /// Words whose last vowel sound is `key`.
    pub fn near_bucket(&self, key: &str) -> &[String] {
        self.near.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Words whose perfect key is `key`.
    pub fn perfect_bucket(&self, key: &str) -> &[String] {
        self.perfect.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Counts gathered while building.
    pub const fn stats(&self) -> IndexStats {
        self.stats
    }
}
