//! Newtype wrappers for displaying collections.

use std::fmt;

use crate::models::{FileChange, PlanRecord};

use super::LocalDateTime;

/// A list of stored plans, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRecords(pub Vec<PlanRecord>);

impl fmt::Display for PlanRecords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        writeln!(f, "# Plans")?;
        writeln!(f)?;
        for record in &self.0 {
            writeln!(
                f,
                "- **{}.** {} ({} step(s), {}, {})",
                record.id,
                record.intent,
                record.plan.steps.len(),
                record.repository,
                LocalDateTime(&record.created_at)
            )?;
        }
        Ok(())
    }
}

/// File changes written by code synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChanges(pub Vec<FileChange>);

impl fmt::Display for FileChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No files changed.");
        }
        writeln!(f, "## Files written")?;
        writeln!(f)?;
        for change in &self.0 {
            writeln!(f, "- `{}` ({} bytes)", change.path, change.content.len())?;
        }
        Ok(())
    }
}
