//! Rhyme queries against a small cmudict-format dictionary.

use camino::{Utf8Path, Utf8PathBuf};
use rhymekit_core::fixtures::{generate_fixtures, verify_fixtures};
use rhymekit_core::{
    DictionaryError, MatchSettings, RhymeEngine, RhymeOrder, SenseStore, SharedEngine,
};

fn fixture_path() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mini.dict")
}

fn engine() -> RhymeEngine {
    RhymeEngine::load(&fixture_path()).expect("fixture dictionary should load")
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn loads_every_headword_once() {
    let engine = engine();
    assert_eq!(engine.dictionary().len(), 36);
    assert!(engine.contains("orange"));
    assert_eq!(engine.dictionary().pronunciations("orange").len(), 2);
    assert_eq!(engine.dictionary().pronunciations("the").len(), 3);
}

#[test]
fn inline_comments_are_not_phonemes() {
    let engine = engine();
    assert_eq!(engine.rhyme_tail("light").unwrap(), ["AY", "T"]);
}

#[test]
fn missing_dictionary_is_read_error() {
    let err = RhymeEngine::load(Utf8Path::new("/nonexistent/mini.dict")).unwrap_err();
    assert!(matches!(err, DictionaryError::Read { .. }));
}

#[test]
fn comment_only_dictionary_is_empty_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::try_from(dir.path().join("empty.dict")).unwrap();
    std::fs::write(&path, ";;; nothing here\n\n").unwrap();
    let err = RhymeEngine::load(&path).unwrap_err();
    assert!(matches!(err, DictionaryError::Empty { .. }));
}

// =============================================================================
// Syllables and keys
// =============================================================================

#[test]
fn syllables_follow_best_pronunciation() {
    let engine = engine();
    assert_eq!(engine.syllable_count("rhyme"), 1);
    assert_eq!(engine.syllable_count("tonight"), 2);
    assert_eq!(engine.syllable_count("Orange"), 2);
    assert_eq!(engine.syllable_count("hmm"), 0);
    assert_eq!(engine.syllable_count("zzyzx"), 0);
}

#[test]
fn tail_starts_at_last_stressed_vowel() {
    let engine = engine();
    assert_eq!(engine.rhyme_tail("tonight").unwrap(), ["AY", "T"]);
    assert_eq!(engine.rhyme_tail("syringe").unwrap(), ["IH", "N", "JH"]);
    assert_eq!(engine.perfect_key("porridge").as_deref(), Some("AO R IH JH"));
}

#[test]
fn unstressed_word_falls_back_to_any_vowel() {
    let engine = engine();
    assert_eq!(engine.rhyme_tail("the").unwrap(), ["AH"]);
}

#[test]
fn word_without_vowels_has_no_tail() {
    let engine = engine();
    assert!(engine.contains("hmm"));
    assert!(engine.rhyme_tail("hmm").is_none());
    assert!(engine.perfect_rhyme_group("hmm").is_empty());
    assert!(engine.near_rhymes("hmm", 200).is_empty());
}

// =============================================================================
// Perfect rhymes
// =============================================================================

#[test]
fn perfect_group_excludes_query() {
    let engine = engine();
    assert_eq!(
        engine.perfect_rhyme_group("night"),
        ["bright", "kite", "light", "tonight"]
    );
    assert_eq!(
        engine.perfect_rhyme_group("CAT"),
        ["at", "bat", "flat", "hat", "matte", "that"]
    );
}

#[test]
fn perfect_groups_are_symmetric() {
    let engine = engine();
    let words: Vec<String> = engine
        .dictionary()
        .words()
        .map(|(w, _)| w.to_string())
        .collect();
    for a in &words {
        for b in engine.perfect_rhyme_group(a) {
            assert!(
                engine.perfect_rhyme_group(&b).contains(a),
                "{a} rhymes with {b} but not the reverse"
            );
        }
    }
}

// =============================================================================
// Near rhymes
// =============================================================================

#[test]
fn near_rhymes_keep_index_order() {
    let engine = engine();
    assert_eq!(
        engine.near_rhymes("night", 200),
        [
            "bright", "climb", "crime", "kite", "light", "lime", "rhyme", "time", "tonight"
        ]
    );
}

#[test]
fn near_rhymes_drop_stopwords_and_mismatched_endings() {
    let engine = engine();
    // "at" is too short, "that" is a stopword, "cats" ends on a different consonant.
    assert_eq!(engine.near_rhymes("cat", 200), ["bat", "flat", "hat", "matte"]);
}

#[test]
fn near_rhymes_require_same_tail_vowel() {
    let engine = engine();
    assert_eq!(engine.near_rhymes("hinge", 200), ["binge", "fringe", "syringe"]);
    assert_eq!(engine.near_rhymes("porridge", 200), ["forage", "storage"]);
    assert_eq!(engine.near_rhymes("love", 200), ["above", "dove", "glove"]);
}

#[test]
fn orange_has_few_near_rhymes() {
    let engine = engine();
    assert!(engine.near_rhymes("orange", 400).len() < 5);
}

#[test]
fn short_tail_query_has_no_near_rhymes() {
    let engine = engine();
    assert!(!engine.near_rhyme_candidates("the", 200).is_empty());
    assert!(engine.near_rhymes("the", 200).is_empty());
}

#[test]
fn unknown_word_has_no_rhymes() {
    let engine = engine();
    assert!(engine.near_rhyme_candidates("zzyzx", 200).is_empty());
    assert!(engine.near_rhymes("zzyzx", 200).is_empty());
    assert!(engine.perfect_rhyme_group("zzyzx").is_empty());
}

#[test]
fn limit_caps_candidates_before_filtering() {
    let engine = engine();
    assert_eq!(engine.near_rhyme_candidates("night", 3), ["bright", "climb", "crime"]);
    assert_eq!(engine.near_rhymes("night", 3), ["bright", "climb", "crime"]);
    assert!(engine.near_rhymes("night", 0).is_empty());
}

#[test]
fn near_rhymes_never_include_query() {
    let engine = engine();
    for (word, _) in engine.dictionary().words() {
        assert!(
            !engine.near_rhymes(word, 200).iter().any(|w| w == word),
            "{word} listed as its own near rhyme"
        );
    }
}

#[test]
fn near_rhymes_stay_within_one_syllable() {
    let engine = engine();
    for (word, _) in engine.dictionary().words() {
        let syllables = engine.syllable_count(word);
        for rhyme in engine.near_rhymes(word, 200) {
            assert!(engine.syllable_count(&rhyme).abs_diff(syllables) <= 1);
        }
    }
}

#[test]
fn filter_is_idempotent_and_order_preserving() {
    let engine = engine();
    let candidates = engine.near_rhyme_candidates("rhyme", 200);
    let once = engine.filter_near_rhymes("rhyme", &candidates);
    let twice = engine.filter_near_rhymes("rhyme", &once);
    assert_eq!(once, twice);

    let positions: Vec<usize> = once
        .iter()
        .map(|w| candidates.iter().position(|c| c == w).unwrap())
        .collect();
    assert!(positions.windows(2).all(|p| p[0] < p[1]));
}

#[test]
fn score_order_puts_exact_tails_first() {
    let engine = engine();
    let ranked = engine.ranked_near_rhymes("night", 200, RhymeOrder::Score);
    let words: Vec<&str> = ranked.iter().map(|c| c.word.as_str()).collect();
    assert_eq!(
        words,
        [
            "bright", "kite", "light", "tonight", "climb", "crime", "lime", "rhyme", "time"
        ]
    );
    assert!(ranked.iter().all(|c| c.score >= 0.45));
}

#[test]
fn stricter_threshold_keeps_only_exact_tails() {
    let settings = MatchSettings {
        quality_threshold: 0.9,
        ..MatchSettings::default()
    };
    let engine = engine().with_settings(settings);
    assert_eq!(
        engine.near_rhymes("night", 200),
        ["bright", "kite", "light", "tonight"]
    );
}

// =============================================================================
// Shared engine
// =============================================================================

#[test]
fn shared_engine_loads_on_first_use() {
    let shared = SharedEngine::new(fixture_path(), MatchSettings::default());
    assert!(!shared.is_loaded());
    let first = shared.get().unwrap();
    let second = shared.get().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(first.near_rhymes("love", 200), ["above", "dove", "glove"]);
}

// =============================================================================
// Senses and fixtures
// =============================================================================

#[test]
fn fixtures_round_trip_through_verify() {
    let engine = engine();
    let set = generate_fixtures(&engine, None, &["night", "cat", "hmm", "zzyzx", "night"], 200);
    let words: Vec<&str> = set.cases.iter().map(|c| c.word.as_str()).collect();
    assert_eq!(words, ["night", "cat"]);
    assert_eq!(set.cases[1].perfect, ["bat", "flat", "hat", "matte"]);

    let report = verify_fixtures(&engine, None, &set);
    assert!(report.passed());
    assert_eq!(report.checked, 2);
}

#[test]
fn sense_gate_limits_fixture_words() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
    std::fs::write(
        root.join("ca.json"),
        r#"{"cat": [{"gloss": "feline mammal", "pos": "n"}]}"#,
    )
    .unwrap();
    std::fs::write(
        root.join("ha.json"),
        r#"{"hat": [{"gloss": "head covering", "pos": "n"}]}"#,
    )
    .unwrap();
    let senses = SenseStore::new(&root);

    let engine = engine();
    let set = generate_fixtures(&engine, Some(&senses), &["cat", "night"], 200);
    assert_eq!(set.cases.len(), 1);
    assert_eq!(set.cases[0].perfect, ["hat"]);
    assert_eq!(set.cases[0].near, ["hat"]);

    assert!(senses.loaded_shards() > 0);
}
