//! Status enumerations for pipeline outcomes and command execution.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tagged result of a top-level operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(Status::Success),
            "failed" => Ok(Status::Failed),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}

impl Status {
    /// Convert to the stored string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failed => "failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

/// Lifecycle of one original command inside an execution run.
///
/// ```text
/// Running ──success──▶ Succeeded
///    │
///  failure
///    ▼
/// Repairing ──rerun or patch succeeds──▶ Succeeded
///    │
///    └──budget exhausted / malformed decision / patch failure──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandState {
    Running,
    Repairing,
    Succeeded,
    Failed,
}

impl CommandState {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CommandState::Succeeded | CommandState::Failed)
    }

    /// Status with an icon for display.
    ///
    /// ```rust
    /// use mender_core::models::CommandState;
    ///
    /// assert_eq!(CommandState::Succeeded.with_icon(), "✓ Succeeded");
    /// assert_eq!(CommandState::Failed.with_icon(), "✗ Failed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            CommandState::Running => "➤ Running",
            CommandState::Repairing => "↻ Repairing",
            CommandState::Succeeded => "✓ Succeeded",
            CommandState::Failed => "✗ Failed",
        }
    }
}
