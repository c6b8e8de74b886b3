//! Error types for rhymekit-core.
//!
//! Only loading can fail. Queries against a loaded engine signal absence with
//! empty collections or `None`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a pronouncing dictionary.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The dictionary source could not be read.
    #[error("failed to read dictionary {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The dictionary source contained no usable entries.
    #[error("dictionary {path} contains no entries")]
    Empty {
        /// Path that was read.
        path: Utf8PathBuf,
    },

    /// No dictionary path was configured.
    #[error("no dictionary configured. Pass --dictionary or set `dictionary` in config")]
    NotConfigured,
}

/// Result type alias using [`DictionaryError`].
pub type DictionaryResult<T> = Result<T, DictionaryError>;

/// Errors from reading or writing rhyme fixture files.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Reading or writing the fixture file failed.
    #[error("fixture file {path}: {source}")]
    Io {
        /// Fixture file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The fixture file is not valid fixture JSON.
    #[error("invalid fixture file {path}: {source}")]
    Json {
        /// Fixture file path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Result type alias using [`FixtureError`].
pub type FixtureResult<T> = Result<T, FixtureError>;
