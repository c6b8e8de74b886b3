//! Rhyme regression fixtures.
//!
//! A fixture file records, for a list of seed words, the perfect rhymes and
//! filtered near rhymes the engine produced. Verifying the file against a
//! later build reports every word that appeared or disappeared, which catches
//! unintended changes to the dictionary, keys, or filter thresholds.
//!
//! When a [`SenseStore`] is supplied, seeds and results are limited to words
//! with a known sense so fixtures stay free of abbreviations and names.

use std::collections::HashSet;

use camino::Utf8Path;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::RhymeEngine;
use crate::error::{FixtureError, FixtureResult};
use crate::senses::SenseStore;
use crate::words::is_suggestable;

/// Expected rhymes for one seed word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FixtureCase {
    /// The seed word.
    pub word: String,
    /// Syllables in its best pronunciation.
    pub syllables: usize,
    /// Words sharing its perfect key.
    pub perfect: Vec<String>,
    /// Filtered near rhymes, in index order.
    pub near: Vec<String>,
}

/// A set of fixture cases and the candidate limit they were generated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FixtureSet {
    /// Near-rhyme candidate limit.
    pub near_limit: usize,
    /// One case per seed.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Read a fixture file.
    pub fn read(path: &Utf8Path) -> FixtureResult<Self> {
        let text = std::fs::read_to_string(path.as_std_path()).map_err(|source| {
            FixtureError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        serde_json::from_str(&text).map_err(|source| FixtureError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the set as pretty JSON.
    pub fn write(&self, path: &Utf8Path) -> FixtureResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| FixtureError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path.as_std_path(), json + "\n").map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Differences found for one case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaseDiff {
    /// The seed word.
    pub word: String,
    /// Whether the seed is gone from the dictionary.
    pub unknown_word: bool,
    /// Expected syllable count, when it changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllables_changed: Option<(usize, usize)>,
    /// Expected perfect rhymes no longer produced.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_perfect: Vec<String>,
    /// Perfect rhymes produced but not expected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unexpected_perfect: Vec<String>,
    /// Expected near rhymes no longer produced.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_near: Vec<String>,
    /// Near rhymes produced but not expected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unexpected_near: Vec<String>,
}

impl CaseDiff {
    fn is_clean(&self) -> bool {
        !self.unknown_word
            && self.syllables_changed.is_none()
            && self.missing_perfect.is_empty()
            && self.unexpected_perfect.is_empty()
            && self.missing_near.is_empty()
            && self.unexpected_near.is_empty()
    }
}

/// Outcome of verifying a fixture set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VerifyReport {
    /// Cases checked.
    pub checked: usize,
    /// Cases with at least one difference.
    pub failures: Vec<CaseDiff>,
}

impl VerifyReport {
    /// Whether every case matched.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

fn sense_ok(senses: Option<&SenseStore>, word: &str) -> bool {
    senses.is_none_or(|store| store.has_sense(word))
}

/// Compute the case for `word` the way generation does.
fn compute_case(
    engine: &RhymeEngine,
    senses: Option<&SenseStore>,
    word: &str,
    near_limit: usize,
) -> Option<FixtureCase> {
    engine.perfect_key(word)?;
    let perfect = engine
        .perfect_rhyme_group(word)
        .into_iter()
        .filter(|w| is_suggestable(w) && sense_ok(senses, w))
        .collect();
    let near = engine
        .near_rhymes(word, near_limit)
        .into_iter()
        .filter(|w| sense_ok(senses, w))
        .collect();
    Some(FixtureCase {
        word: word.to_string(),
        syllables: engine.syllable_count(word),
        perfect,
        near,
    })
}

/// Build fixture cases for each seed word.
///
/// Seeds are lowercased and deduplicated. Seeds unknown to the dictionary,
/// without a rhyme key, or (with a sense store) without a known sense are
/// skipped.
#[tracing::instrument(skip_all, fields(seeds = seeds.len(), near_limit))]
pub fn generate_fixtures<S: AsRef<str>>(
    engine: &RhymeEngine,
    senses: Option<&SenseStore>,
    seeds: &[S],
    near_limit: usize,
) -> FixtureSet {
    let mut seen = HashSet::new();
    let mut cases = Vec::new();

    for seed in seeds {
        let word = seed.as_ref().trim().to_lowercase();
        if word.is_empty() || !seen.insert(word.clone()) {
            continue;
        }
        if !sense_ok(senses, &word) {
            tracing::debug!(%word, "seed has no known sense");
            continue;
        }
        match compute_case(engine, senses, &word, near_limit) {
            Some(case) => cases.push(case),
            None => tracing::debug!(%word, "seed has no rhyme key"),
        }
    }

    tracing::info!(cases = cases.len(), "generated rhyme fixtures");
    FixtureSet { near_limit, cases }
}

fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    left.iter()
        .filter(|w| !right.contains(w.as_str()))
        .cloned()
        .collect()
}

/// Recompute every case and report differences.
///
/// Pass the same sense store used for generation, or none if none was used.
#[tracing::instrument(skip_all, fields(cases = set.cases.len()))]
pub fn verify_fixtures(
    engine: &RhymeEngine,
    senses: Option<&SenseStore>,
    set: &FixtureSet,
) -> VerifyReport {
    let mut report = VerifyReport {
        checked: set.cases.len(),
        failures: Vec::new(),
    };

    for expected in &set.cases {
        let diff = match compute_case(engine, senses, &expected.word, set.near_limit) {
            Some(actual) => CaseDiff {
                word: expected.word.clone(),
                unknown_word: false,
                syllables_changed: (actual.syllables != expected.syllables)
                    .then_some((expected.syllables, actual.syllables)),
                missing_perfect: difference(&expected.perfect, &actual.perfect),
                unexpected_perfect: difference(&actual.perfect, &expected.perfect),
                missing_near: difference(&expected.near, &actual.near),
                unexpected_near: difference(&actual.near, &expected.near),
            },
            None => CaseDiff {
                word: expected.word.clone(),
                unknown_word: true,
                missing_perfect: expected.perfect.clone(),
                missing_near: expected.near.clone(),
                ..CaseDiff::default()
            },
        };
        if !diff.is_clean() {
            report.failures.push(diff);
        }
    }

    if report.passed() {
        tracing::info!(checked = report.checked, "rhyme fixtures verified");
    } else {
        tracing::warn!(
            checked = report.checked,
            failed = report.failures.len(),
            "rhyme fixtures differ"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
NIGHT  N AY1 T
LIGHT  L AY1 T
KITE  K AY1 T
BYTE  B AY1 T
RHYME  R AY1 M
TIME  T AY1 M
HMM  HH M
";

    #[test]
    fn generates_cases_for_known_seeds() {
        let engine = RhymeEngine::from_text(SAMPLE);
        let set = generate_fixtures(&engine, None, &["Night", "night", "zzz", "hmm"], 200);
        assert_eq!(set.cases.len(), 1);
        let case = &set.cases[0];
        assert_eq!(case.word, "night");
        assert_eq!(case.syllables, 1);
        assert_eq!(case.perfect, ["light", "kite", "byte"]);
        assert_eq!(case.near, ["light", "kite", "byte", "rhyme", "time"]);
    }

    #[test]
    fn sense_store_limits_seeds_and_results() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("ni.json"),
            r#"{"night": [{"gloss": "dark time", "pos": "noun", "synonyms": []}]}"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("li.json"),
            r#"{"light": [{"gloss": "brightness", "pos": "noun", "synonyms": []}]}"#,
        )
        .unwrap();
        let store = SenseStore::new(Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap());
        let engine = RhymeEngine::from_text(SAMPLE);

        let set = generate_fixtures(&engine, Some(&store), &["night", "kite"], 200);
        assert_eq!(set.cases.len(), 1);
        assert_eq!(set.cases[0].perfect, ["light"]);
        assert_eq!(set.cases[0].near, ["light"]);
    }

    #[test]
    fn verify_passes_against_same_engine() {
        let engine = RhymeEngine::from_text(SAMPLE);
        let set = generate_fixtures(&engine, None, &["night", "rhyme"], 200);
        let report = verify_fixtures(&engine, None, &set);
        assert!(report.passed());
        assert_eq!(report.checked, 2);
    }

    #[test]
    fn verify_reports_changes() {
        let engine = RhymeEngine::from_text(SAMPLE);
        let set = generate_fixtures(&engine, None, &["night", "rhyme"], 200);

        let changed = RhymeEngine::from_text(
            "NIGHT  N AY1 T\nLIGHT  L AY1 T\nSIGHT  S AY1 T\nTIME  T AY1 M\n",
        );
        let report = verify_fixtures(&changed, None, &set);
        assert!(!report.passed());

        let night = report.failures.iter().find(|d| d.word == "night").unwrap();
        assert_eq!(night.missing_perfect, ["kite", "byte"]);
        assert_eq!(night.unexpected_perfect, ["sight"]);

        let rhyme = report.failures.iter().find(|d| d.word == "rhyme").unwrap();
        assert!(rhyme.unknown_word);
        assert_eq!(rhyme.missing_perfect, ["time"]);
    }

    #[test]
    fn fixture_files_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("rhymes.json")).unwrap();
        let engine = RhymeEngine::from_text(SAMPLE);
        let set = generate_fixtures(&engine, None, &["night"], 50);

        set.write(&path).unwrap();
        assert_eq!(FixtureSet::read(&path).unwrap(), set);
    }

    #[test]
    fn invalid_fixture_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("bad.json")).unwrap();
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            FixtureSet::read(&path),
            Err(FixtureError::Json { .. })
        ));
        let missing = Utf8PathBuf::from("/nonexistent/rhymes.json");
        assert!(matches!(
            FixtureSet::read(&missing),
            Err(FixtureError::Io { .. })
        ));
    }
}
