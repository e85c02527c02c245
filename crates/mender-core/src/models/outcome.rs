//! Tagged result returned by every session entry point.

use serde::{Deserialize, Serialize};

use super::Status;

/// Status, human-readable description and an optional payload.
///
/// Session entry points convert every error into a failed outcome, so callers
/// never have to handle a `Result` at the top level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome<T> {
    pub status: Status,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl<T> Outcome<T> {
    pub fn success(description: impl Into<String>, value: T) -> Self {
        Self {
            status: Status::Success,
            description: description.into(),
            value: Some(value),
        }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            description: description.into(),
            value: None,
        }
    }

    /// A failed outcome that still carries a payload, such as the report of
    /// a run that ended in failure.
    pub fn failed_with(description: impl Into<String>, value: T) -> Self {
        Self {
            status: Status::Failed,
            description: description.into(),
            value: Some(value),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Maps the payload while keeping status and description.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        Outcome {
            status: self.status,
            description: self.description,
            value: self.value.map(f),
        }
    }
}
