//! Rhyme key extraction from ARPABET pronunciations.
//!
//! Vowel phonemes carry a trailing stress digit (`AY1`, `AH0`, `EH2`);
//! consonants carry none. Three keys are derived from a pronunciation:
//!
//! - the **near key**: the last vowel sound, used as a coarse index bucket;
//! - the **rhyme tail**: the phonemes from the last stressed vowel to the end;
//! - the **perfect key**: the rhyme tail joined into a single string.

use serde::{Deserialize, Serialize};

use crate::dictionary::Pronunciation;

/// Separator used when joining a rhyme tail into a perfect key.
pub const PERFECT_KEY_SEPARATOR: &str = " ";

/// Stress level marked on a vowel phoneme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stress {
    /// `0` suffix.
    Unstressed,
    /// `1` suffix.
    Primary,
    /// `2` suffix.
    Secondary,
}

impl Stress {
    /// Parse a stress digit character.
    pub const fn from_digit(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(Self::Unstressed),
            '1' => Some(Self::Primary),
            '2' => Some(Self::Secondary),
            _ => None,
        }
    }

    /// The digit this stress level is written with.
    pub const fn as_digit(self) -> char {
        match self {
            Self::Unstressed => '0',
            Self::Primary => '1',
            Self::Secondary => '2',
        }
    }

    /// Primary or secondary stress.
    pub const fn is_stressed(self) -> bool {
        matches!(self, Self::Primary | Self::Secondary)
    }
}

/// Stress marker of a phoneme token, if it is a vowel.
pub fn stress_of(phone: &str) -> Option<Stress> {
    phone.chars().last().and_then(Stress::from_digit)
}

/// Remove the stress digit from a phoneme token.
pub fn strip_stress(phone: &str) -> &str {
    match stress_of(phone) {
        Some(_) => &phone[..phone.len() - 1],
        None => phone,
    }
}

/// Index of the phoneme the rhyme tail starts at.
fn tail_start(phones: &[String]) -> Option<usize> {
    // Prefer the last primary or secondary stressed vowel. Function words and
    // some reduced entries ("the", "a", "of" variants) mark every vowel `0`;
    // for those the last vowel of any stress is used instead so they still
    // receive a tail.
    phones
        .iter()
        .rposition(|p| stress_of(p).is_some_and(Stress::is_stressed))
        .or_else(|| phones.iter().rposition(|p| stress_of(p).is_some()))
}

/// Phonemes from the last stressed vowel to the end, digits stripped.
///
/// Returns `None` when the pronunciation has no vowel at all.
pub fn rhyme_tail(pronunciation: &Pronunciation) -> Option<Vec<String>> {
    let phones = pronunciation.phones();
    let start = tail_start(phones)?;
    Some(
        phones[start..]
            .iter()
            .map(|p| strip_stress(p).to_string())
            .collect(),
    )
}

/// The last vowel sound of a pronunciation, regardless of stress.
///
/// This scan accepts any stress level, unlike [`rhyme_tail`], so a word's
/// near bucket and its tail can start on different vowels.
pub fn near_key(pronunciation: &Pronunciation) -> Option<String> {
    pronunciation
        .phones()
        .iter()
        .rev()
        .find(|p| stress_of(p).is_some())
        .map(|p| strip_stress(p).to_string())
}

/// The rhyme tail joined into a single comparable key.
pub fn perfect_key(pronunciation: &Pronunciation) -> Option<String> {
    rhyme_tail(pronunciation).map(|tail| tail.join(PERFECT_KEY_SEPARATOR))
}
