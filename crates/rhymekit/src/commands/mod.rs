//! Command implementations.

use std::time::Duration;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rhymekit_core::{DictionaryError, MatchSettings, RhymeEngine, SenseStore};

pub mod fixtures;
pub mod info;
pub mod near;
pub mod perfect;
pub mod senses;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod syllables;
pub mod tail;

/// Where the engine comes from: a dictionary path plus filter settings.
///
/// Resolved once in `main` from flags and config, then handed to commands.
#[derive(Debug, Clone, Default)]
pub struct EngineSource {
    /// Dictionary path; `None` when neither `--dictionary` nor config set one.
    pub dictionary: Option<Utf8PathBuf>,
    /// Near-rhyme filter thresholds.
    pub settings: MatchSettings,
}

impl EngineSource {
    /// The configured dictionary path.
    pub fn path(&self) -> Result<&Utf8Path, DictionaryError> {
        self.dictionary
            .as_deref()
            .ok_or(DictionaryError::NotConfigured)
    }

    /// Load the dictionary and build the engine.
    ///
    /// Shows a spinner on an interactive stderr unless `quiet`.
    pub fn load(&self, quiet: bool) -> anyhow::Result<RhymeEngine> {
        let path = self.path()?;
        let spinner = spinner(&format!("Loading {path}"), quiet);
        let engine = RhymeEngine::load(path)
            .with_context(|| format!("failed to load dictionary {path}"))?
            .with_settings(self.settings);
        spinner.finish_and_clear();
        Ok(engine)
    }
}

/// Open the sense store, if a senses directory is configured.
pub fn sense_store(dir: Option<&Utf8Path>) -> Option<SenseStore> {
    dir.map(SenseStore::new)
}

/// A steady-ticking spinner on stderr.
///
/// Hidden when `hidden` is set; indicatif hides it on its own when stderr is
/// not a terminal.
pub fn spinner(msg: &str, hidden: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if hidden {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        let style = ProgressStyle::default_spinner()
            .template("{msg} {spinner} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(msg.to_string());
    pb
}

/// Print a word list one per line, or a placeholder when empty.
pub(crate) fn print_words(words: &[String], empty: &str) {
    use owo_colors::OwoColorize;
    if words.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    for word in words {
        println!("{word}");
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dictionary_is_not_configured() {
        let err = EngineSource::default().load(true).unwrap_err();
        assert!(err.to_string().contains("no dictionary configured"));
    }

    #[test]
    fn load_applies_settings() {
        let (_dir, mut source) = test_support::source();
        source.settings.quality_threshold = 0.9;
        let engine = source.load(true).unwrap();
        assert_eq!(engine.settings().quality_threshold, 0.9);
        assert!(engine.contains("cat"));
    }

    #[test]
    fn unreadable_dictionary_reports_path() {
        let source = EngineSource {
            dictionary: Some(Utf8PathBuf::from("/nonexistent/cmudict.dict")),
            ..EngineSource::default()
        };
        let err = source.load(true).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cmudict.dict"));
    }
}
