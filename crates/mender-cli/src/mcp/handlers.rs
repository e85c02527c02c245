//! MCP tool handler implementations.

use std::{fmt::Display, sync::Arc};

use log::debug;
use mender_core::{models::Outcome, params as core, Session};
use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Transparent wrapper adding MCP deserialization and schema generation to a
/// core parameter type.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type GeneratePlan = McpParams<core::GeneratePlan>;
pub type RunPipeline = McpParams<core::RunPipeline>;

/// Runs session entry points for the MCP tools.
///
/// The session is locked for the whole call, so pipelines never overlap.
pub struct McpHandlers {
    session: Arc<Mutex<Session>>,
}

impl McpHandlers {
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        Self { session }
    }

    pub async fn generate_plan(&self, params: &GeneratePlan) -> CallToolResult {
        debug!("generate_plan: {:?}", params.as_ref());
        let session = self.session.lock().await;
        tool_result(session.generate_plan(params.as_ref()).await)
    }

    pub async fn run_pipeline(&self, params: &RunPipeline) -> CallToolResult {
        debug!("run_pipeline: {:?}", params.as_ref());
        let session = self.session.lock().await;
        tool_result(session.run(params.as_ref()).await)
    }

    pub async fn list_plans(&self) -> CallToolResult {
        let session = self.session.lock().await;
        tool_result(session.list_plans().await)
    }

    pub async fn show_plan(&self, params: &Id) -> CallToolResult {
        debug!("show_plan: {:?}", params.as_ref());
        let session = self.session.lock().await;
        tool_result(session.show_plan(params.as_ref()).await)
    }
}

/// Failed outcomes are tool-level errors, reported in-band to the client.
pub fn tool_result<T: Display>(outcome: Outcome<T>) -> CallToolResult {
    let text = vec![Content::text(outcome.to_string())];
    if outcome.is_success() {
        CallToolResult::success(text)
    } else {
        CallToolResult::error(text)
    }
}
