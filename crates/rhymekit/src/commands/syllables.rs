//! Syllables command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::EngineSource;

/// Arguments for the `syllables` subcommand.
#[derive(Args, Debug)]
pub struct SyllablesArgs {
    /// Words to count
    #[arg(required = true)]
    pub words: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SyllableCount {
    word: String,
    known: bool,
    syllables: usize,
}

/// Count syllables for each word.
///
/// Unknown words count zero syllables.
#[instrument(name = "cmd_syllables", skip_all, fields(words = args.words.len()))]
pub fn cmd_syllables(
    args: SyllablesArgs,
    global_json: bool,
    source: &EngineSource,
) -> anyhow::Result<()> {
    debug!(words = ?args.words, "executing syllables command");
    let engine = source.load(global_json)?;

    let counts: Vec<SyllableCount> = args
        .words
        .into_iter()
        .map(|word| SyllableCount {
            known: engine.contains(&word),
            syllables: engine.syllable_count(&word),
            word,
        })
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    for count in &counts {
        if count.known {
            println!("{}: {}", count.word.bold(), count.syllables);
        } else {
            println!("{}: {}", count.word.bold(), "unknown".yellow());
        }
    }
    Ok(())
}
