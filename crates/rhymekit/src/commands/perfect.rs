//! Perfect command implementation

use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{EngineSource, print_words};

/// Arguments for the `perfect` subcommand.
#[derive(Args, Debug)]
pub struct PerfectArgs {
    /// Word to rhyme
    pub word: String,

    /// Include stopwords and other words unsuitable as suggestions
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
struct PerfectReport {
    word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    perfect_key: Option<String>,
    rhymes: Vec<String>,
}

/// List words sharing the query's rhyme tail.
#[instrument(name = "cmd_perfect", skip_all, fields(word = %args.word, all = args.all))]
pub fn cmd_perfect(
    args: PerfectArgs,
    global_json: bool,
    source: &EngineSource,
) -> anyhow::Result<()> {
    debug!("executing perfect command");
    let engine = source.load(global_json)?;

    let mut rhymes = engine.perfect_rhyme_group(&args.word);
    if !args.all {
        rhymes.retain(|w| rhymekit_core::words::is_suggestable(w));
    }
    let report = PerfectReport {
        perfect_key: engine.perfect_key(&args.word),
        rhymes,
        word: args.word,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_words(&report.rhymes, "no perfect rhymes");
    }
    Ok(())
}
