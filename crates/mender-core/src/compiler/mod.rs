//! Plan compiler: intent plus snapshot in, ordered plan steps out.

use log::{debug, info};

use crate::{
    error::Result,
    llm::LanguageModel,
    models::{FailureContext, Plan, RepositorySnapshot},
    prompts::{self, PromptTemplate},
};

pub mod parser;


pub use parser::{parse_plan, PlanParseError};

/// Turns an intent into a [`Plan`] with one model round-trip.
pub struct PlanCompiler<'a> {
    model: &'a dyn LanguageModel,
}

impl<'a> PlanCompiler<'a> {
    pub fn new(model: &'a dyn LanguageModel) -> Self {
        Self { model }
    }

    /// Compiles the initial plan for `intent` against `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `MenderError::Llm` if the query fails and
    /// `MenderError::PlanParse` if the response does not parse.
    pub async fn compile(&self, intent: &str, snapshot: &RepositorySnapshot) -> Result<Plan> {
        let structure = snapshot.render_structure();
        let contents = snapshot.render_contents();
        let prompt = prompts::PLAN.render(&[
            ("intent", intent),
            ("structure", &structure),
            ("contents", &contents),
        ]);
        self.query_plan(&prompts::PLAN, &prompt).await
    }

    /// Compiles a remediation plan after a command failure.
    ///
    /// The failing command's output, error and the full command list are
    /// threaded into the prompt; parsing is identical to [`compile`].
    ///
    /// [`compile`]: PlanCompiler::compile
    pub async fn compile_rerun(
        &self,
        intent: &str,
        snapshot: &RepositorySnapshot,
        failure: &FailureContext,
    ) -> Result<Plan> {
        let structure = snapshot.render_structure();
        let contents = snapshot.render_contents();
        let commands = prompts::numbered(&failure.commands);
        let prompt = prompts::RERUN_PLAN.render(&[
            ("intent", intent),
            ("commands", &commands),
            ("output", prompts::or_none(&failure.stdout)),
            ("error", prompts::or_none(&failure.stderr)),
            ("structure", &structure),
            ("contents", &contents),
        ]);
        self.query_plan(&prompts::RERUN_PLAN, &prompt).await
    }

    async fn query_plan(&self, template: &PromptTemplate, prompt: &str) -> Result<Plan> {
        debug!("Rendered {} prompt ({} bytes)", template.name(), prompt.len());
        let response = self.model.query(prompt).await?;
        let plan = parse_plan(&response)?;
        info!(
            "Compiled {} with {} step(s): {}",
            template.name(),
            plan.steps.len(),
            plan.current_focus
        );
        Ok(plan)
    }
}
