//! Near-rhyme candidate retrieval, filtering, and scoring.
//!
//! Retrieval pulls every word sharing the query's near key (last vowel sound)
//! from the index. Filtering then applies four gates, all of which must pass:
//!
//! 1. **Lexical**: the candidate is a plausible suggestion ([`is_suggestable`]).
//! 2. **Vowel**: its rhyme tail starts on the same vowel as the query's.
//! 3. **Syllables**: its syllable count is within the tolerance of the query's.
//! 4. **Suffix**: enough tail phonemes match from the end, and the
//!    [`quality_score`] reaches the threshold.
//!
//! Survivors keep their index order. Scores are reported alongside so callers
//! can re-rank, but the default order is the index order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionary::{PronouncingDictionary, best_of};
use crate::index::RhymeIndex;
use crate::phonetics::{near_key, rhyme_tail};
use crate::words::is_suggestable;

/// Candidates fetched from the near index when no limit is given.
pub const DEFAULT_NEAR_LIMIT: usize = 200;

/// Minimum [`quality_score`] for a near rhyme.
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 0.45;

/// Allowed syllable-count difference between query and candidate.
pub const DEFAULT_SYLLABLE_TOLERANCE: usize = 1;

/// Shortest rhyme tail, in phonemes, that takes part in suffix matching.
pub const DEFAULT_MIN_TAIL_LEN: usize = 2;

/// Tunable thresholds for the near-rhyme filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchSettings {
    /// Minimum quality score (0--1).
    pub quality_threshold: f64,
    /// Maximum syllable-count difference.
    pub syllable_tolerance: usize,
    /// Minimum rhyme-tail length for both words.
    pub min_tail_len: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            syllable_tolerance: DEFAULT_SYLLABLE_TOLERANCE,
            min_tail_len: DEFAULT_MIN_TAIL_LEN,
        }
    }
}

/// Ordering applied to scored near rhymes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RhymeOrder {
    /// Rhyme index order (dictionary order).
    #[default]
    Index,
    /// Highest quality score first; ties keep index order.
    Score,
}

/// A near rhyme that passed every gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredCandidate {
    /// The candidate word as stored in the dictionary.
    pub word: String,
    /// Syllables in its best pronunciation.
    pub syllables: usize,
    /// Its rhyme tail, stress digits stripped.
    pub tail: Vec<String>,
    /// Phonetic similarity to the query's tail (0--1).
    pub score: f64,
}

/// Positions that agree when two tails are aligned from the end.
///
/// Compares `min(len)` positions and counts every match, not only a leading
/// run.
pub fn suffix_matches(target: &[String], candidate: &[String]) -> usize {
    target
        .iter()
        .rev()
        .zip(candidate.iter().rev())
        .filter(|(a, b)| a == b)
        .count()
}

/// Matches required for a pair whose shorter tail has `min_len` phonemes.
pub const fn required_matches(min_len: usize) -> usize {
    if min_len >= 3 { 2 } else { 1 }
}

/// Phonetic similarity of two rhyme tails, in `[0, 1]`.
///
/// Equal-length tails score the fraction of positions that match. Otherwise
/// the overlapping suffix is scored the same way and scaled by
/// `shorter / longer`, so a short tail hidden inside a long one is penalized.
pub fn quality_score(target: &[String], candidate: &[String]) -> f64 {
    let min_len = target.len().min(candidate.len());
    let max_len = target.len().max(candidate.len());
    if min_len == 0 {
        return 0.0;
    }
    let matches = suffix_matches(target, candidate) as f64;
    if target.len() == candidate.len() {
        matches / max_len as f64
    } else {
        (matches / min_len as f64) * (min_len as f64 / max_len as f64)
    }
}

/// The query side of a filter run.
#[derive(Debug, Clone)]
struct Target {
    syllables: usize,
    tail: Option<Vec<String>>,
}

impl Target {
    fn resolve(dict: &PronouncingDictionary, word: &str) -> Self {
        let best = dict.best_pronunciation(word);
        Self {
            syllables: best.map_or(0, |p| p.syllable_count()),
            tail: best.and_then(rhyme_tail),
        }
    }
}

/// Up to `limit` words sharing `word`'s near key, in index order.
///
/// Never contains `word` itself. Empty for unknown words.
#[tracing::instrument(skip(dict, index), level = "debug")]
pub fn near_rhyme_candidates(
    dict: &PronouncingDictionary,
    index: &RhymeIndex,
    word: &str,
    limit: usize,
) -> Vec<String> {
    let Some((key, prons)) = dict.resolve(word) else {
        return Vec::new();
    };
    let Some(near) = best_of(prons).and_then(near_key) else {
        return Vec::new();
    };
    index
        .near_bucket(&near)
        .iter()
        .filter(|candidate| candidate.as_str() != key)
        .take(limit)
        .cloned()
        .collect()
}

/// Run one candidate through the gates.
fn score_candidate(
    dict: &PronouncingDictionary,
    target: &Target,
    candidate: &str,
    settings: &MatchSettings,
) -> Option<ScoredCandidate> {
    if !is_suggestable(candidate) {
        return None;
    }

    let best = dict.best_pronunciation(candidate);
    let syllables = best.map_or(0, |p| p.syllable_count());
    let tail = best.and_then(rhyme_tail);

    if let Some(target_vowel) = target.tail.as_ref().and_then(|t| t.first()) {
        let candidate_vowel = tail.as_ref().and_then(|t| t.first());
        if candidate_vowel != Some(target_vowel) {
            return None;
        }
    }

    if syllables.abs_diff(target.syllables) > settings.syllable_tolerance {
        return None;
    }

    let target_tail = target.tail.as_ref()?;
    let tail = tail?;
    if target_tail.len() < settings.min_tail_len || tail.len() < settings.min_tail_len {
        return None;
    }
    let min_len = target_tail.len().min(tail.len());
    if suffix_matches(target_tail, &tail) < required_matches(min_len) {
        return None;
    }
    let score = quality_score(target_tail, &tail);
    if score < settings.quality_threshold {
        return None;
    }

    Some(ScoredCandidate {
        word: candidate.to_string(),
        syllables,
        tail,
        score,
    })
}

/// Candidates that pass every gate against `word`, with their scores.
///
/// Output order is input order.
#[tracing::instrument(skip(dict, candidates, settings), fields(candidates = candidates.len()), level = "debug")]
pub fn score_candidates<S: AsRef<str>>(
    dict: &PronouncingDictionary,
    word: &str,
    candidates: &[S],
    settings: &MatchSettings,
) -> Vec<ScoredCandidate> {
    let target = Target::resolve(dict, word);
    let kept: Vec<ScoredCandidate> = candidates
        .iter()
        .filter_map(|c| score_candidate(dict, &target, c.as_ref(), settings))
        .collect();
    tracing::debug!(kept = kept.len(), "filtered near rhymes");
    kept
}

/// Candidates that pass every gate against `word`, in input order.
pub fn filter_near_rhymes<S: AsRef<str>>(
    dict: &PronouncingDictionary,
    word: &str,
    candidates: &[S],
    settings: &MatchSettings,
) -> Vec<String> {
    score_candidates(dict, word, candidates, settings)
        .into_iter()
        .map(|c| c.word)
        .collect()
}

/// Reorder scored candidates. Sorting is stable.
pub fn apply_order(candidates: &mut [ScoredCandidate], order: RhymeOrder) {
    if order == RhymeOrder::Score {
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tail(phones: &str) -> Vec<String> {
        phones.split_whitespace().map(str::to_string).collect()
    }

    const SAMPLE: &str = "\
NIGHT  N AY1 T
LIGHT  L AY1 T
AT  AE1 T
CAT  K AE1 T
HAT  HH AE1 T
THAT  DH AE1 T
CAT'S  K AE1 T S
ACROBAT  AE1 K R AH0 B AE2 T
COMBAT  K AA1 M B AE0 T
HABIT  HH AE1 B AH0 T
MATTE  M AE1 T
FLAT  F L AE1 T
BATTER  B AE1 T ER0
";

    fn dict() -> PronouncingDictionary {
        PronouncingDictionary::parse(SAMPLE)
    }

    #[test]
    fn counts_all_matching_positions_from_end() {
        assert_eq!(suffix_matches(&tail("AY T"), &tail("AY T")), 2);
        assert_eq!(suffix_matches(&tail("AO R AH N JH"), &tail("IH N JH")), 2);
        // A mismatch in the middle does not stop the count.
        assert_eq!(suffix_matches(&tail("AE B AH T"), &tail("AE T IH T")), 2);
    }

    #[test]
    fn required_matches_scale_with_length() {
        assert_eq!(required_matches(2), 1);
        assert_eq!(required_matches(3), 2);
        assert_eq!(required_matches(7), 2);
    }

    #[test]
    fn equal_length_score_is_match_fraction() {
        assert!((quality_score(&tail("AY T"), &tail("AY T")) - 1.0).abs() < f64::EPSILON);
        assert!((quality_score(&tail("AY T"), &tail("AY D")) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unequal_length_score_is_penalized() {
        // 2 of 2 overlapping positions match, scaled by 2/4.
        let score = quality_score(&tail("AE B AH T"), &tail("AH T"));
        assert!((score - 0.5).abs() < f64::EPSILON);
        let score = quality_score(&tail("AO R AH N JH"), &tail("AH N JH"));
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn empty_tail_scores_zero() {
        assert_eq!(quality_score(&[], &tail("AY T")), 0.0);
    }

    #[test]
    fn candidates_exclude_query_and_respect_limit() {
        let dict = dict();
        let index = RhymeIndex::build(&dict);
        let all = near_rhyme_candidates(&dict, &index, "cat", 200);
        assert!(!all.contains(&"cat".to_string()));
        assert_eq!(all.first().map(String::as_str), Some("at"));
        let two = near_rhyme_candidates(&dict, &index, "CAT", 2);
        assert_eq!(two, ["at", "hat"]);
    }

    #[test]
    fn unknown_query_has_no_candidates() {
        let dict = dict();
        let index = RhymeIndex::build(&dict);
        assert!(near_rhyme_candidates(&dict, &index, "zzyzx", 200).is_empty());
        assert!(filter_near_rhymes(&dict, "zzyzx", &["hat"], &MatchSettings::default()).is_empty());
    }

    #[test]
    fn filter_applies_every_gate() {
        let dict = dict();
        let candidates = [
            "at", "hat", "that", "cat's", "acrobat", "combat", "habit", "matte", "flat", "batter",
            "unknown",
        ];
        let kept = filter_near_rhymes(&dict, "cat", &candidates, &MatchSettings::default());
        // at: too short; that: stopword; cat's: apostrophe; acrobat: 3 syllables;
        // combat: AA vowel; habit: AE B AH T vs AE T scores 0.25; batter: tail
        // AE T ER shares no final phonemes; unknown: not in the dictionary.
        assert_eq!(kept, ["hat", "matte", "flat"]);
    }

    #[test]
    fn filter_keeps_input_order() {
        let dict = dict();
        let kept = filter_near_rhymes(&dict, "cat", &["flat", "hat"], &MatchSettings::default());
        assert_eq!(kept, ["flat", "hat"]);
    }

    #[test]
    fn night_and_light_rhyme() {
        let dict = dict();
        let scored = score_candidates(&dict, "night", &["light"], &MatchSettings::default());
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].tail, ["AY", "T"]);
        assert!((scored[0].score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn threshold_is_configurable() {
        let dict = dict();
        let strict = MatchSettings {
            quality_threshold: 1.01,
            ..MatchSettings::default()
        };
        assert!(filter_near_rhymes(&dict, "night", &["light"], &strict).is_empty());
    }

    #[test]
    fn score_order_is_stable() {
        let mut scored = vec![
            ScoredCandidate {
                word: "a".into(),
                syllables: 1,
                tail: tail("AE T"),
                score: 0.5,
            },
            ScoredCandidate {
                word: "b".into(),
                syllables: 1,
                tail: tail("AE T"),
                score: 1.0,
            },
            ScoredCandidate {
                word: "c".into(),
                syllables: 1,
                tail: tail("AE T"),
                score: 0.5,
            },
        ];
        apply_order(&mut scored, RhymeOrder::Index);
        assert_eq!(scored[0].word, "a");
        apply_order(&mut scored, RhymeOrder::Score);
        let words: Vec<&str> = scored.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, ["b", "a", "c"]);
    }
}
