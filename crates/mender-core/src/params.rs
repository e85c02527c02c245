//! Parameter structures for session entry points.
//!
//! These are shared by the CLI and the MCP server. They carry no framework
//! derives beyond serde; JSON schemas are generated only with the `schema`
//! feature, which the MCP server enables.
//!
//! ```text
//! CLI args (clap) ──┐
//!                   ├──▶ params ──▶ Session
//! MCP tools (serde) ┘
//! ```

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for operations requiring just a plan ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the stored plan
    pub id: u64,
}

/// Parameters for compiling a plan from an intent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GeneratePlan {
    /// What should change in the repository, in plain language
    pub intent: String,
}

/// Parameters for synthesizing or executing a stored plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ApplyPlan {
    /// The ID of the stored plan
    pub id: u64,
    /// Extra guidance passed to every code and repair prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Parameters for the full plan, code and execute pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RunPipeline {
    /// What should change in the repository, in plain language
    pub intent: String,
    /// Extra guidance passed to every code and repair prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl GeneratePlan {
    /// Rejects blank intents.
    ///
    /// ```rust
    /// use mender_core::params::GeneratePlan;
    ///
    /// let params = GeneratePlan { intent: "  ".to_string() };
    /// assert!(params.validate().is_err());
    /// ```
    pub fn validate(&self) -> crate::Result<&str> {
        validate_intent(&self.intent)
    }
}

impl RunPipeline {
    /// Rejects blank intents.
    pub fn validate(&self) -> crate::Result<&str> {
        validate_intent(&self.intent)
    }

    pub fn context(&self) -> &str {
        self.context.as_deref().unwrap_or_default()
    }
}

impl ApplyPlan {
    pub fn context(&self) -> &str {
        self.context.as_deref().unwrap_or_default()
    }
}

fn validate_intent(intent: &str) -> crate::Result<&str> {
    let intent = intent.trim();
    if intent.is_empty() {
        return Err(crate::MenderError::invalid_input("intent").with_reason("Intent must not be empty"));
    }
    Ok(intent)
}
