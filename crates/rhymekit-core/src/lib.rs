//! Core library for rhymekit.
//!
//! A phonetic rhyme engine over a pronouncing dictionary in cmudict format.
//! It finds perfect rhymes (identical phonemes from the last stressed vowel
//! on) and near rhymes (same final vowel sound, similar ending, similar
//! length).
//!
//! # Modules
//!
//! - [`dictionary`] - Dictionary parsing and word lookup
//! - [`phonetics`] - Stress markers, rhyme tails, near and perfect keys
//! - [`index`] - Inverted near-key and perfect-key indexes
//! - [`matcher`] - Near-rhyme retrieval, filtering, and scoring
//! - [`words`] - Stopwords and lexical checks
//! - [`engine`] - The [`RhymeEngine`] tying the above together
//! - [`senses`] - Prefix-sharded word-sense lookup
//! - [`fixtures`] - Rhyme regression fixture generation and verification
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use rhymekit_core::RhymeEngine;
//!
//! let engine = RhymeEngine::load(Utf8Path::new("cmudict.dict"))
//!     .expect("Failed to load dictionary");
//!
//! for word in engine.near_rhymes("orange", 400) {
//!     println!("{word}");
//! }
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod index;
pub mod matcher;
pub mod phonetics;
pub mod senses;
pub mod words;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use dictionary::{PronouncingDictionary, Pronunciation};
pub use engine::{RhymeEngine, SharedEngine};
pub use error::{
    ConfigError, ConfigResult, DictionaryError, DictionaryResult, FixtureError, FixtureResult,
};
pub use matcher::{MatchSettings, RhymeOrder, ScoredCandidate};
pub use senses::SenseStore;
