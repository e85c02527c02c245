//! Command results, repair decisions and the failure context handed to the
//! patch path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a command execution ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExitKind {
    /// Process exited with this status code
    Code(i32),
    /// Process was terminated by a signal
    Signal,
    /// Process exceeded the wall-clock timeout and was killed
    TimedOut,
    /// Process could not be started at all
    SpawnFailed,
}

impl fmt::Display for ExitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitKind::Code(code) => write!(f, "exit code {code}"),
            ExitKind::Signal => write!(f, "terminated by signal"),
            ExitKind::TimedOut => write!(f, "timed out"),
            ExitKind::SpawnFailed => write!(f, "failed to start"),
        }
    }
}

/// Outcome of running one command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit: ExitKind,
}

impl CommandResult {
    /// A result for a process that exited with `code`.
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit: ExitKind::Code(code),
        }
    }

    /// A failed result for a process that never started; the error text
    /// becomes `stderr`.
    pub fn spawn_failed(error: impl fmt::Display) -> Self {
        Self {
            stdout: String::new(),
            stderr: error.to_string(),
            exit: ExitKind::SpawnFailed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit == ExitKind::Code(0)
    }
}

/// Remediation chosen by the language model for a failing command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RepairAction {
    /// Run this replacement command instead
    Rerun { command: String },
    /// Replan and rewrite code, then retry the original command
    Patch,
}

/// A parsed repair decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepairDecision {
    #[serde(flatten)]
    pub action: RepairAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Output of the failing command plus the full command list, threaded into
/// the rerun plan prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureContext {
    pub stdout: String,
    pub stderr: String,
    pub commands: Vec<String>,
}

impl FailureContext {
    pub fn new(result: &CommandResult, commands: &[String]) -> Self {
        Self {
            stdout: result.stdout.clone(),
            stderr: result.stderr.clone(),
            commands: commands.to_vec(),
        }
    }
}
