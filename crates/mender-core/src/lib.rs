//! Core library for Mender, an agent pipeline that plans, writes, runs and
//! repairs code changes in a repository.
//!
//! Given a natural-language intent, Mender compiles an ordered change plan
//! from a snapshot of the repository, synthesizes whole-file edits for every
//! step, derives build and run commands, and repairs failing commands by
//! rerunning or replanning under a bounded budget.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ PlanCompiler │──▶│ CodeSynth-   │──▶│ Execution-   │
//! │  (compiler)  │   │ esizer       │   │ Engine       │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!        ▲                  ▲                  │ command fails
//!        │                  │                  ▼
//!        └──────────────────┴────────── PatchCoordinator
//! ```
//!
//! - **Agents** ([`compiler`], [`synthesizer`], [`engine`], [`patcher`])
//!   borrow their collaborators and a `&mut` [`models::RepositorySnapshot`].
//! - **Collaborators** are traits: [`llm::LanguageModel`],
//!   [`repository::RepositoryProvider`], [`repository::FileStore`] and
//!   [`sandbox::CommandRunner`].
//! - **Persistence** ([`store`]) keeps snapshots, plans and runs in SQLite.
//! - **Session** ([`session`]) owns everything and exposes entry points that
//!   return an [`models::Outcome`] instead of an error.
//! - **Display** ([`display`]) formats models and outcomes as markdown.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mender_core::{
//!     llm::{HttpModel, Provider},
//!     params::RunPipeline,
//!     SessionBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = HttpModel::new(Provider::OpenAi, "sk-...", Provider::OpenAi.default_model());
//! let session = SessionBuilder::new()
//!     .with_workspace("/path/to/project")
//!     .with_model(Arc::new(model))
//!     .build()
//!     .await?;
//!
//! let outcome = session
//!     .run(&RunPipeline {
//!         intent: "add a hello endpoint".to_string(),
//!         context: None,
//!     })
//!     .await;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod format;
pub mod llm;
pub mod models;
pub mod params;
pub mod patcher;
pub mod prompts;
pub mod repository;
pub mod sandbox;
pub mod session;
pub mod store;
pub mod synthesizer;

// Re-export commonly used types
pub use config::EngineConfig;
pub use display::{FileChanges, LocalDateTime, OperationStatus, PlanRecords};
pub use error::{MenderError, Result};
pub use models::{
    CommandResult, FileChange, Outcome, PipelineReport, Plan, PlanDetails, PlanRecord, PlanStep,
    RepositorySnapshot, RunRecord, RunReport, Status,
};
pub use params::{ApplyPlan, GeneratePlan, Id, RunPipeline};
pub use session::{Session, SessionBuilder};
