//! Serve command implementation

use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use super::EngineSource;
use crate::server::RhymeServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Load the dictionary before accepting requests instead of on first use
    #[arg(long)]
    pub preload: bool,
}

/// Run the MCP server on stdin/stdout until the client disconnects.
#[instrument(name = "cmd_serve", skip_all, fields(preload = args.preload))]
pub async fn cmd_serve(
    args: ServeArgs,
    source: EngineSource,
    near_limit: usize,
) -> anyhow::Result<()> {
    let server = RhymeServer::new(source, near_limit);
    if args.preload {
        server.preload()?;
    }

    info!("starting MCP server on stdio");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MCP server failed to start"))?;
    let reason = service.waiting().await?;
    info!(?reason, "MCP server stopped");
    Ok(())
}
