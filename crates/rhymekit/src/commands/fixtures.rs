//! Fixtures command implementation

use std::path::PathBuf;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use rhymekit_core::fixtures::{self, FixtureSet, VerifyReport};
use tracing::{debug, info, instrument};

use super::{EngineSource, sense_store, spinner};

/// Arguments for the `fixtures` subcommand.
#[derive(Args, Debug)]
pub struct FixturesArgs {
    /// The fixture action.
    #[command(subcommand)]
    pub action: FixturesAction,
}

/// Fixture actions.
#[derive(Subcommand, Debug)]
pub enum FixturesAction {
    /// Record rhymes for seed words into a fixture file
    Generate {
        /// File of seed words, one per line (`#` starts a comment)
        seeds: PathBuf,

        /// Fixture file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Near-rhyme candidate limit (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Check current rhymes against a fixture file
    Verify {
        /// Fixture file to check
        file: PathBuf,
    },
}

fn utf8(path: PathBuf) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| anyhow::anyhow!("path is not valid UTF-8: {}", e.into_path_buf().display()))
}

/// Seed words from a text file: one per line, blank lines and `#` comments
/// skipped.
fn read_seeds(path: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read seeds {path}"))?;
    Ok(text
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Generate or verify rhyme fixtures.
#[instrument(name = "cmd_fixtures", skip_all)]
pub fn cmd_fixtures(
    args: FixturesArgs,
    global_json: bool,
    source: &EngineSource,
    senses_dir: Option<&Utf8Path>,
    default_limit: usize,
) -> anyhow::Result<()> {
    let senses = sense_store(senses_dir);
    match args.action {
        FixturesAction::Generate {
            seeds,
            output,
            limit,
        } => {
            let seeds_path = utf8(seeds)?;
            let output = utf8(output)?;
            let near_limit = limit.unwrap_or(default_limit);
            debug!(seeds = %seeds_path, output = %output, near_limit, "generating fixtures");

            let seeds = read_seeds(&seeds_path)?;
            let engine = source.load(global_json)?;
            let pb = spinner(&format!("Generating {} cases", seeds.len()), global_json);
            let set = fixtures::generate_fixtures(&engine, senses.as_ref(), &seeds, near_limit);
            pb.finish_and_clear();
            set.write(&output)?;
            info!(cases = set.cases.len(), output = %output, "fixtures written");

            if global_json {
                println!(
                    "{}",
                    serde_json::json!({ "output": output, "cases": set.cases.len() })
                );
            } else {
                println!(
                    "{} {} cases to {}",
                    "Wrote".green(),
                    set.cases.len(),
                    output.cyan()
                );
            }
            Ok(())
        }
        FixturesAction::Verify { file } => {
            let file = utf8(file)?;
            debug!(file = %file, "verifying fixtures");
            let set = FixtureSet::read(&file)?;
            let engine = source.load(global_json)?;
            let pb = spinner(&format!("Verifying {} cases", set.cases.len()), global_json);
            let report = fixtures::verify_fixtures(&engine, senses.as_ref(), &set);
            pb.finish_and_clear();

            if global_json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if !report.passed() {
                anyhow::bail!(
                    "{} of {} fixture cases differ",
                    report.failures.len(),
                    report.checked
                );
            }
            Ok(())
        }
    }
}

fn print_report(report: &VerifyReport) {
    for diff in &report.failures {
        println!("{} {}", "FAIL:".red().bold(), diff.word.bold());
        if diff.unknown_word {
            println!("  {}", "no longer in the dictionary".yellow());
        }
        if let Some((expected, actual)) = diff.syllables_changed {
            println!("  syllables: expected {expected}, got {actual}");
        }
        print_list("missing perfect", &diff.missing_perfect);
        print_list("unexpected perfect", &diff.unexpected_perfect);
        print_list("missing near", &diff.missing_near);
        print_list("unexpected near", &diff.unexpected_near);
    }
    if report.passed() {
        println!("{} {} cases", "PASS:".green().bold(), report.checked);
    }
}

fn print_list(label: &str, words: &[String]) {
    if !words.is_empty() {
        println!("  {}: {}", label.dimmed(), words.join(", "));
    }
}
