//! Lexical checks for rhyme suggestions.
//!
//! A dictionary entry is not necessarily a word worth suggesting: cmudict
//! lists abbreviations, possessives, and function words alongside ordinary
//! vocabulary. [`is_suggestable`] rejects those before any phonetic work.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Shortest candidate accepted, in characters.
pub const MIN_WORD_LEN: usize = 3;

/// Closed-class function words never offered as rhymes.
pub static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // articles and determiners
        "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every",
        "no",
        // pronouns
        "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "he", "him",
        "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us",
        "our", "ours", "ourselves", "they", "them", "their", "theirs", "themselves", "who",
        "whom", "whose", "which", "what",
        // prepositions
        "at", "by", "for", "from", "in", "into", "of", "off", "on", "onto", "out", "over",
        "to", "up", "upon", "with", "via", "than",
        // conjunctions
        "and", "but", "or", "nor", "so", "yet", "if", "as", "because", "while", "though",
        "although", "unless", "whether",
        // copulas and auxiliaries
        "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may",
        "might", "must",
    ]
    .into_iter()
    .collect()
});

/// Whether `word` is a function word.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word.trim().to_lowercase().as_str())
}

/// Whether a dictionary entry is acceptable as a rhyme suggestion.
///
/// Rejects empty input, leading apostrophes (`'til`, `'em`), words shorter
/// than [`MIN_WORD_LEN`], stopwords, anything outside `[A-Za-z-]`, and
/// letter strings with no vowel (`hmm`, `nth`).
pub fn is_suggestable(word: &str) -> bool {
    let trimmed = word.trim();
    if trimmed.is_empty() || trimmed.starts_with('\'') {
        return false;
    }
    let normalized = trimmed.to_lowercase();
    if normalized.chars().count() < MIN_WORD_LEN || STOPWORDS.contains(normalized.as_str()) {
        return false;
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_lowercase() || c == '-')
    {
        return false;
    }
    normalized.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
}
