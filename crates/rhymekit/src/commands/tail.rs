//! Tail command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::EngineSource;

/// Arguments for the `tail` subcommand.
#[derive(Args, Debug)]
pub struct TailArgs {
    /// Word to inspect
    pub word: String,
}

#[derive(Debug, Serialize)]
struct TailReport {
    word: String,
    known: bool,
    syllables: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pronunciation: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tail: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    perfect_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    near_key: Option<String>,
}

/// Show the pronunciation, rhyme tail, and rhyme keys for a word.
#[instrument(name = "cmd_tail", skip_all, fields(word = %args.word))]
pub fn cmd_tail(args: TailArgs, global_json: bool, source: &EngineSource) -> anyhow::Result<()> {
    debug!("executing tail command");
    let engine = source.load(global_json)?;

    let best = engine.dictionary().best_pronunciation(&args.word);
    let report = TailReport {
        known: engine.contains(&args.word),
        syllables: engine.syllable_count(&args.word),
        pronunciation: best.map(|p| p.phones().to_vec()),
        tail: engine.rhyme_tail(&args.word),
        perfect_key: engine.perfect_key(&args.word),
        near_key: best.and_then(rhymekit_core::phonetics::near_key),
        word: args.word,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.word.bold());
    if !report.known {
        println!("{}", "not in dictionary".yellow());
        return Ok(());
    }
    if let Some(ref phones) = report.pronunciation {
        println!("{}: {}", "Pronunciation".dimmed(), phones.join(" "));
    }
    println!("{}: {}", "Syllables".dimmed(), report.syllables);
    match report.perfect_key {
        Some(ref key) => println!("{}: {}", "Rhyme tail".dimmed(), key.cyan()),
        None => println!("{}: {}", "Rhyme tail".dimmed(), "(none)".dimmed()),
    }
    if let Some(ref key) = report.near_key {
        println!("{}: {}", "Near key".dimmed(), key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[test]
    fn known_word_succeeds() {
        let (_dir, source) = test_support::source();
        let args = TailArgs {
            word: "night".into(),
        };
        assert!(cmd_tail(args, false, &source).is_ok());
    }

    #[test]
    fn unknown_word_is_not_an_error() {
        let (_dir, source) = test_support::source();
        let args = TailArgs {
            word: "qwxz".into(),
        };
        assert!(cmd_tail(args, true, &source).is_ok());
    }
}
