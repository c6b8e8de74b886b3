//! rhymekit CLI
#![deny(unsafe_code)]

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use rhymekit::commands::EngineSource;
use rhymekit::{Cli, Commands, commands};
use rhymekit_core::config::ConfigLoader;
use tracing::debug;

mod observability;

/// Convert a CLI path argument to UTF-8.
fn utf8_path(path: std::path::PathBuf, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| anyhow::anyhow!("{what} is not valid UTF-8: {}", e.into_path_buf().display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // arg_required_else_help ensures we have --version-only or a subcommand
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = utf8_path(cwd, "current directory")?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        loader = loader.with_file(utf8_path(config_path.clone(), "config path")?);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| config_sources.resolve_path(dir).into_std_path_buf()),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    let dictionary = match cli.dictionary {
        Some(path) => Some(utf8_path(path, "dictionary path")?),
        None => config
            .dictionary
            .as_ref()
            .map(|p| config_sources.resolve_path(p)),
    };
    let source = EngineSource {
        dictionary,
        settings: config.match_settings(),
    };
    let senses_dir = config
        .senses_dir
        .as_ref()
        .map(|p| config_sources.resolve_path(p));
    let near_limit = config.near_limit();

    // Execute command
    let result = match command {
        Commands::Syllables(args) => commands::syllables::cmd_syllables(args, cli.json, &source),
        Commands::Tail(args) => commands::tail::cmd_tail(args, cli.json, &source),
        Commands::Perfect(args) => commands::perfect::cmd_perfect(args, cli.json, &source),
        Commands::Near(args) => commands::near::cmd_near(args, cli.json, &source, near_limit),
        Commands::Senses(args) => {
            commands::senses::cmd_senses(args, cli.json, senses_dir.as_deref())
        }
        Commands::Fixtures(args) => commands::fixtures::cmd_fixtures(
            args,
            cli.json,
            &source,
            senses_dir.as_deref(),
            near_limit,
        ),
        Commands::Info(args) => commands::info::cmd_info(args, cli.json, &config, &config_sources),
        #[cfg(feature = "mcp")]
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()
                .context("failed to create async runtime for MCP server")?;
            rt.block_on(commands::serve::cmd_serve(args, source, near_limit))
        }
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
