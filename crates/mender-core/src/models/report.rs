//! Execution and patch reports.

use serde::{Deserialize, Serialize};

use super::{CommandState, Plan, PlanRecord, Status};

/// Trace of one original command through the execution state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandTrace {
    /// The command as produced by the command-list query
    pub command: String,
    /// Final state; only `Succeeded` or `Failed` once the run ends
    pub state: CommandState,
    /// Repair iterations spent on this command
    pub repair_attempts: u32,
}

/// Result of an execution engine run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub status: Status,
    /// Why the run ended the way it did
    pub description: String,
    /// stdout of the last executed command
    pub stdout: String,
    /// stderr of the last executed command
    pub stderr: String,
    /// Repair iterations across all commands
    pub repair_attempts: u32,
    #[serde(default)]
    pub commands: Vec<CommandTrace>,
}

impl RunReport {
    pub(crate) fn new(status: Status, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
            stdout: String::new(),
            stderr: String::new(),
            repair_attempts: 0,
            commands: Vec::new(),
        }
    }

    pub(crate) fn failed(description: impl Into<String>) -> Self {
        Self::new(Status::Failed, description)
    }
}

/// Result of a successful patch: the remediation plan and every path it
/// rewrote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatchReport {
    pub plan: Plan,
    pub changed_paths: Vec<String>,
}

/// Result of a full plan, code and execute pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineReport {
    pub plan: PlanRecord,
    /// Paths written while synthesizing the plan's steps
    pub changed_paths: Vec<String>,
    pub run: RunReport,
}
