//! Senses command implementation

use camino::Utf8Path;
use clap::Args;
use owo_colors::OwoColorize;
use rhymekit_core::senses::Sense;
use serde::Serialize;
use tracing::{debug, instrument};

use super::sense_store;

/// Arguments for the `senses` subcommand.
#[derive(Args, Debug)]
pub struct SensesArgs {
    /// Word to look up
    pub word: String,

    /// Show at most this many synonyms per sense
    #[arg(long, default_value_t = 5)]
    pub synonyms: usize,
}

#[derive(Debug, Serialize)]
struct SensesReport {
    word: String,
    senses: Vec<Sense>,
}

/// Print the senses recorded for a word.
#[instrument(name = "cmd_senses", skip_all, fields(word = %args.word))]
pub fn cmd_senses(
    args: SensesArgs,
    global_json: bool,
    senses_dir: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    debug!(senses_dir = ?senses_dir, "executing senses command");
    let Some(store) = sense_store(senses_dir) else {
        anyhow::bail!("no senses directory configured. Set `senses_dir` in config");
    };

    let report = SensesReport {
        senses: store.senses(&args.word),
        word: args.word,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.senses.is_empty() {
        println!("{}", format!("no senses for {}", report.word).dimmed());
        return Ok(());
    }
    for (i, sense) in report.senses.iter().enumerate() {
        if sense.pos.is_empty() {
            println!("{}. {}", i + 1, sense.gloss);
        } else {
            println!("{}. {} {}", i + 1, sense.pos.italic(), sense.gloss);
        }
        let synonyms: Vec<&str> = sense
            .synonyms
            .iter()
            .take(args.synonyms)
            .map(|s| s.word.as_str())
            .collect();
        if !synonyms.is_empty() {
            println!("   {}", synonyms.join(", ").dimmed());
        }
    }
    Ok(())
}
