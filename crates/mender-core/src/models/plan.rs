//! Plan model definition and related functionality.

use serde::{Deserialize, Serialize};

/// One unit of planned work targeting a single file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanStep {
    /// Sequence position within the plan (1-based, in canonical decimal
    /// form, so `- Step 01:` is stored as `1`)
    pub step_number: String,

    /// File the step creates, modifies or deletes
    pub target_file: String,

    /// Free-text action such as `create`, `modify` or `delete`
    pub action_kind: String,

    /// What should change; continuation lines are joined with spaces
    pub description: String,
}

/// Ordered collection of plan steps plus a one-line focus summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    /// One-line summary of what the plan is about
    pub current_focus: String,

    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Serializes the plan in the same textual shape the plan parser reads.
    pub fn to_text(&self) -> String {
        let mut out = format!("Current Focus: {}\nPlan:\n", self.current_focus);
        for step in &self.steps {
            out.push_str(&step.to_text());
        }
        out
    }
}

impl PlanStep {
    /// Serializes a single step as a `- Step N:` block.
    pub fn to_text(&self) -> String {
        format!(
            "- Step {}:\n  - File: {}\n  - Action: {}\n  - Description: {}\n",
            self.step_number, self.target_file, self.action_kind, self.description
        )
    }
}
