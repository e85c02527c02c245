//! MCP server exposing the mender pipeline as tools over stdio.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use mender_core::Session;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod handlers;

pub use handlers::{GeneratePlan, Id, RunPipeline};

type McpResult = Result<CallToolResult, McpError>;

/// MCP server for Mender
#[derive(Clone)]
pub struct MenderMcpServer {
    session: Arc<Mutex<Session>>,
    max_repair_attempts: u32,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl MenderMcpServer {
    pub fn new(session: Session) -> Self {
        Self {
            max_repair_attempts: session.config().max_repair_attempts,
            session: Arc::new(Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.session.clone())
    }

    #[tool(
        name = "generate_plan",
        description = "Compile a step-by-step change plan for the workspace repository from a natural-language intent. The plan and the repository snapshot it was built from are stored; returns the plan ID and its steps. Does not modify any files."
    )]
    async fn generate_plan(&self, Parameters(params): Parameters<GeneratePlan>) -> McpResult {
        Ok(self.handlers().generate_plan(&params).await)
    }

    #[tool(
        name = "run_pipeline",
        description = "Plan, write and execute a change end to end: compiles a plan for the intent, writes the code for every step into the workspace, runs the build and test commands and repairs failures by rerunning or replanning, up to the server's repair budget per command. Optional context is passed to every code and repair prompt."
    )]
    async fn run_pipeline(&self, Parameters(params): Parameters<RunPipeline>) -> McpResult {
        Ok(self.handlers().run_pipeline(&params).await)
    }

    #[tool(
        name = "list_plans",
        description = "List the plans stored for the workspace repository, newest first, with their IDs, intents and step counts."
    )]
    async fn list_plans(&self) -> McpResult {
        Ok(self.handlers().list_plans().await)
    }

    #[tool(
        name = "show_plan",
        description = "Show a stored plan by ID with all its steps and the history of its execution runs."
    )]
    async fn show_plan(&self, Parameters(params): Parameters<Id>) -> McpResult {
        Ok(self.handlers().show_plan(&params).await)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for MenderMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(instructions(self.max_repair_attempts)),
        }
    }
}

fn instructions(max_repair_attempts: u32) -> String {
    format!(
        r#"Mender turns a natural-language intent into code changes in the workspace repository and keeps running the project's commands until they pass.

## Workflow
1. `generate_plan` to preview the steps for an intent without touching files
2. `run_pipeline` to plan, write and execute in one call
3. `list_plans` and `show_plan` to review stored plans and their runs

Each run stops after {max_repair_attempts} repair attempts per failing command and reports the last output."#
    )
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: MenderMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Mender MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
