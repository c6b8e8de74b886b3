//! Word-sense lookup over prefix-sharded JSON files.
//!
//! Senses live in one JSON file per two-letter prefix (`ca.json` holds
//! "cat", "cave", ...; words shorter than two letters pad with `_`, so "a"
//! lives in `a_.json`). Each file maps a lowercase word to its ordered list
//! of senses.
//!
//! Shards load on first use and stay cached for the life of the store. A
//! missing shard is an empty shard; the store answers "no senses" rather
//! than failing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionary::normalize_query;

/// Pads shard keys for one-letter words.
pub const SHARD_FILLER: char = '_';

/// A related word and its relatedness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Synonym {
    /// The related word.
    pub word: String,
    /// Relatedness score.
    #[serde(default)]
    pub score: f64,
}

/// One dictionary sense of a word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Sense {
    /// Short definition.
    pub gloss: String,
    /// Part of speech.
    #[serde(default)]
    pub pos: String,
    /// Related words, strongest first.
    #[serde(default)]
    pub synonyms: Vec<Synonym>,
}

/// Contents of one shard file.
pub type Shard = HashMap<String, Vec<Sense>>;

/// A shard slot, filled by whichever caller reaches it first.
type ShardCell = Arc<OnceLock<Arc<Shard>>>;

/// Shard key for a word: its first two letters, padded with [`SHARD_FILLER`].
///
/// Returns `None` when the word has no ASCII letters.
pub fn shard_key(word: &str) -> Option<String> {
    let mut key: String = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .take(2)
        .collect();
    if key.is_empty() {
        return None;
    }
    while key.len() < 2 {
        key.push(SHARD_FILLER);
    }
    Some(key)
}

/// Lazily loaded, memoized sense shards.
#[derive(Debug)]
pub struct SenseStore {
    dir: Utf8PathBuf,
    shards: Mutex<HashMap<String, ShardCell>>,
}

impl SenseStore {
    /// A store reading shard files from `dir`.
    pub fn new<P: AsRef<Utf8Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            shards: Mutex::new(HashMap::new()),
        }
    }

    /// Directory shard files are read from.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Whether `word` has at least one known sense.
    pub fn has_sense(&self, word: &str) -> bool {
        !self.senses(word).is_empty()
    }

    /// Senses of `word`, in shard order. Empty when unknown.
    ///
    /// The word is normalized the same way dictionary lookups are, so
    /// `"Night!"` finds the entry for `"night"`.
    pub fn senses(&self, word: &str) -> Vec<Sense> {
        let word = normalize_query(word);
        let Some(key) = shard_key(&word) else {
            return Vec::new();
        };
        self.shard(&key).get(&word).cloned().unwrap_or_default()
    }

    /// Number of shards loaded so far, including empty ones.
    pub fn loaded_shards(&self) -> usize {
        self.shards
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    fn shard(&self, key: &str) -> Arc<Shard> {
        // The map lock only hands out the per-prefix cell; the file read
        // happens under that cell, so one prefix loads once while other
        // prefixes load in parallel.
        let cell = {
            let mut shards = self.shards.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(shards.entry(key.to_string()).or_default())
        };
        Arc::clone(cell.get_or_init(|| Arc::new(self.load_shard(key))))
    }

    #[tracing::instrument(skip(self), fields(dir = %self.dir))]
    fn load_shard(&self, key: &str) -> Shard {
        let path = self.dir.join(format!("{key}.json"));
        let text = match std::fs::read_to_string(path.as_std_path()) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(%path, "no sense shard");
                return Shard::new();
            }
            Err(e) => {
                tracing::warn!(%path, error = %e, "failed to read sense shard");
                return Shard::new();
            }
        };
        match serde_json::from_str::<Shard>(&text) {
            Ok(shard) => {
                tracing::debug!(%path, words = shard.len(), "loaded sense shard");
                shard
            }
            Err(e) => {
                tracing::warn!(%path, error = %e, "invalid sense shard");
                Shard::new()
            }
        }
    }
}
