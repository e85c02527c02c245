//! Mender CLI Application
//!
//! Command-line front end and MCP server for the mender pipeline.

mod args;
mod cli;
mod mcp;
mod model;
mod renderer;

use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, MenderMcpServer};
use mender_core::{EngineConfig, SessionBuilder};
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        workspace,
        provider,
        model: model_name,
        api_base,
        max_repairs,
        command_timeout,
        command,
    } = Args::parse();

    let config = EngineConfig {
        max_repair_attempts: max_repairs,
        command_timeout: Duration::from_secs(command_timeout),
        ..EngineConfig::default()
    };

    let mut builder = SessionBuilder::new()
        .with_database_path(database_file)
        .with_model(model::select_model(provider.into(), model_name, api_base))
        .with_engine_config(config);
    if let Some(workspace) = workspace {
        builder = builder.with_workspace(workspace);
    }
    let session = builder.build().await.context("Failed to initialize session")?;

    info!("Mender started for {}", session.repository_name());

    match command {
        Commands::Serve => {
            info!("Starting Mender MCP server");
            run_stdio_server(MenderMcpServer::new(session))
                .await
                .context("MCP server failed")
        }
        command => {
            Cli::new(session, TerminalRenderer::new(!no_color))
                .handle(command)
                .await
        }
    }
}
