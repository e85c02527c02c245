//! Top-level orchestration of the plan, code and execute pipeline.
//!
//! A [`Session`] owns the collaborators (language model, command runner,
//! workspace) and the path of the artifact store. Its entry points compose
//! the agents for one call and wrap every result in an
//! [`Outcome`](crate::models::Outcome), so no error escapes to the caller.
//!
//! ```text
//! ┌────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   pipeline     │    │     agents      │    │  store_ops      │
//! │ (generate_*,   │───▶│ (compiler,      │    │ (spawn_blocking │
//! │  execute, run) │    │  synthesizer,   │    │  + ArtifactStore│
//! │   history      │───▶│  engine)        │    │  per call)      │
//! └────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mender_core::{llm::ScriptedModel, params::GeneratePlan, SessionBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ScriptedModel::new([
//!     "Current Focus: Hello\nPlan:\n- Step 1:\n  - File: app.py\n  - Action: create\n  - Description: Add the app\n",
//! ]);
//! let session = SessionBuilder::new()
//!     .with_database_path(Some("mender.db"))
//!     .with_workspace("/path/to/project")
//!     .with_model(Arc::new(model))
//!     .build()
//!     .await?;
//!
//! let outcome = session
//!     .generate_plan(&GeneratePlan { intent: "add a hello endpoint".to_string() })
//!     .await;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use crate::{
    compiler::PlanCompiler,
    config::EngineConfig,
    engine::ExecutionEngine,
    llm::LanguageModel,
    patcher::PatchCoordinator,
    repository::LocalRepository,
    sandbox::CommandRunner,
    synthesizer::CodeSynthesizer,
};

pub mod builder;
mod history;
mod pipeline;
mod store_ops;

#[cfg(test)]
mod tests;

pub use builder::SessionBuilder;

/// Entry point for every pipeline operation.
pub struct Session {
    pub(crate) model: Arc<dyn LanguageModel>,
    pub(crate) runner: Arc<dyn CommandRunner>,
    pub(crate) repository: LocalRepository,
    pub(crate) repository_name: String,
    pub(crate) db_path: PathBuf,
    pub(crate) config: EngineConfig,
}

impl Session {
    /// Name under which snapshots and plans of this workspace are stored.
    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn compiler(&self) -> PlanCompiler<'_> {
        PlanCompiler::new(self.model.as_ref())
    }

    fn synthesizer(&self) -> CodeSynthesizer<'_> {
        CodeSynthesizer::new(
            self.model.as_ref(),
            &self.repository,
            self.config.max_reformat_attempts,
        )
    }

    fn engine(&self) -> ExecutionEngine<'_> {
        let patcher = PatchCoordinator::new(self.compiler(), self.synthesizer());
        ExecutionEngine::new(
            self.model.as_ref(),
            self.runner.as_ref(),
            patcher,
            self.repository.root(),
            &self.config,
        )
    }
}
