//! Data models shared by the agents, the session and the artifact store.
//!
//! Display implementations live in [`crate::display`] so these types stay
//! plain data.

pub mod change;
pub mod command;
pub mod outcome;
pub mod plan;
pub mod records;
pub mod report;
pub mod snapshot;
pub mod status;

#[cfg(test)]
mod tests;

pub use change::FileChange;
pub use command::{CommandResult, ExitKind, FailureContext, RepairAction, RepairDecision};
pub use outcome::Outcome;
pub use plan::{Plan, PlanStep};
pub use records::{PlanDetails, PlanRecord, RunRecord, SnapshotRecord};
pub use report::{CommandTrace, PatchReport, PipelineReport, RunReport};
pub use snapshot::{normalize_path, FileContent, RepositorySnapshot, StructureNode};
pub use status::{CommandState, Status};
