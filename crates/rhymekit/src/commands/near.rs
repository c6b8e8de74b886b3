//! Near command implementation

use clap::Args;
use owo_colors::OwoColorize;
use rhymekit_core::{RhymeOrder, ScoredCandidate};
use serde::Serialize;
use tracing::{debug, instrument};

use super::EngineSource;

/// Arguments for the `near` subcommand.
#[derive(Args, Debug)]
pub struct NearArgs {
    /// Word to rhyme
    pub word: String,

    /// Candidates to fetch from the index before filtering (overrides config)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Show each rhyme's quality score and syllable count
    #[arg(long)]
    pub scores: bool,

    /// Result order
    #[arg(long, value_enum, default_value_t)]
    pub order: RhymeOrder,
}

#[derive(Debug, Serialize)]
struct NearReport {
    word: String,
    limit: usize,
    order: RhymeOrder,
    rhymes: Vec<ScoredCandidate>,
}

/// List near rhymes for a word.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `source` - Dictionary and filter settings
/// * `default_limit` - Candidate limit from config
#[instrument(name = "cmd_near", skip_all, fields(word = %args.word, limit, order = ?args.order))]
pub fn cmd_near(
    args: NearArgs,
    global_json: bool,
    source: &EngineSource,
    default_limit: usize,
) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(default_limit);
    tracing::Span::current().record("limit", limit);
    debug!("executing near command");
    let engine = source.load(global_json)?;

    let report = NearReport {
        rhymes: engine.ranked_near_rhymes(&args.word, limit, args.order),
        word: args.word,
        limit,
        order: args.order,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.rhymes.is_empty() {
        println!("{}", "no near rhymes".dimmed());
        return Ok(());
    }
    for rhyme in &report.rhymes {
        if args.scores {
            println!(
                "{:<20} {} {}",
                rhyme.word,
                format!("{:.2}", rhyme.score).cyan(),
                format!("({} syl)", rhyme.syllables).dimmed()
            );
        } else {
            println!("{}", rhyme.word);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    fn args(word: &str) -> NearArgs {
        NearArgs {
            word: word.into(),
            limit: None,
            scores: false,
            order: RhymeOrder::Index,
        }
    }

    #[test]
    fn near_text_succeeds() {
        let (_dir, source) = test_support::source();
        assert!(cmd_near(args("night"), false, &source, 200).is_ok());
    }

    #[test]
    fn near_scored_json_succeeds() {
        let (_dir, source) = test_support::source();
        let mut a = args("cat");
        a.scores = true;
        a.order = RhymeOrder::Score;
        a.limit = Some(3);
        assert!(cmd_near(a, true, &source, 200).is_ok());
    }

    #[test]
    fn near_without_dictionary_fails() {
        assert!(cmd_near(args("cat"), false, &EngineSource::default(), 200).is_err());
    }
}
