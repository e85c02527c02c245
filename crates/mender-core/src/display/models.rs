//! Display implementations for domain models.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    CommandState, PatchReport, PipelineReport, Plan, PlanDetails, PlanRecord, PlanStep, RunRecord,
    RunReport, Status,
};

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.with_icon())
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}. **{}** `{}`",
            self.step_number, self.action_kind, self.target_file
        )?;
        if !self.description.is_empty() {
            writeln!(f, "   {}", self.description)?;
        }
        Ok(())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.current_focus.is_empty() {
            writeln!(f, "**Focus:** {}", self.current_focus)?;
            writeln!(f)?;
        }
        if self.steps.is_empty() {
            return writeln!(f, "No steps in this plan.");
        }
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.intent)?;
        writeln!(f)?;
        writeln!(f, "- Repository: {}", self.repository)?;
        writeln!(f, "- Snapshot: {}", short_hash(&self.snapshot_hash))?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;
        writeln!(f, "## Steps")?;
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- Run {}: {} after {} repair attempt(s) ({})",
            self.id,
            self.status,
            self.repair_attempts,
            LocalDateTime(&self.created_at)
        )
    }
}

impl fmt::Display for PlanDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record)?;
        writeln!(f)?;
        writeln!(f, "## Runs")?;
        writeln!(f)?;
        if self.runs.is_empty() {
            return writeln!(f, "Not executed yet.");
        }
        for run in &self.runs {
            write!(f, "{run}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Execution")?;
        writeln!(f)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Repair attempts: {}", self.repair_attempts)?;

        if !self.commands.is_empty() {
            writeln!(f)?;
            for trace in &self.commands {
                write!(f, "- {} `{}`", trace.state, trace.command)?;
                if trace.repair_attempts > 0 {
                    write!(f, " ({} repair attempt(s))", trace.repair_attempts)?;
                }
                writeln!(f)?;
            }
        }

        write_output(f, "stdout", &self.stdout)?;
        write_output(f, "stderr", &self.stderr)
    }
}

impl fmt::Display for PatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plan)?;
        writeln!(f)?;
        for path in &self.changed_paths {
            writeln!(f, "- `{path}`")?;
        }
        Ok(())
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plan)?;
        writeln!(f)?;
        writeln!(f, "## Files written")?;
        writeln!(f)?;
        if self.changed_paths.is_empty() {
            writeln!(f, "None.")?;
        }
        for path in &self.changed_paths {
            writeln!(f, "- `{path}`")?;
        }
        writeln!(f)?;
        write!(f, "{}", self.run)
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

fn write_output(f: &mut fmt::Formatter<'_>, label: &str, text: &str) -> fmt::Result {
    if text.trim().is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "### {label}")?;
    writeln!(f)?;
    writeln!(f, "```")?;
    writeln!(f, "{}", text.trim_end())?;
    writeln!(f, "```")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommandTrace;

    #[test]
    fn test_plan_display() {
        let plan = Plan {
            current_focus: "Add a hello endpoint".to_string(),
            steps: vec![PlanStep {
                step_number: "1".to_string(),
                target_file: "app.py".to_string(),
                action_kind: "create".to_string(),
                description: "Create the app".to_string(),
            }],
        };

        let output = plan.to_string();
        assert!(output.contains("**Focus:** Add a hello endpoint"));
        assert!(output.contains("1. **create** `app.py`"));
        assert!(output.contains("   Create the app"));
        assert!(Plan::default().to_string().contains("No steps in this plan."));
    }

    #[test]
    fn test_run_report_display() {
        let report = RunReport {
            status: Status::Failed,
            description: "`pytest` failed".to_string(),
            stdout: String::new(),
            stderr: "ModuleNotFoundError\n".to_string(),
            repair_attempts: 5,
            commands: vec![CommandTrace {
                command: "pytest".to_string(),
                state: CommandState::Failed,
                repair_attempts: 5,
            }],
        };

        let output = report.to_string();
        assert!(output.contains("- Status: failed"));
        assert!(output.contains("- ✗ Failed `pytest` (5 repair attempt(s))"));
        assert!(output.contains("### stderr"));
        assert!(!output.contains("### stdout"));
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_hash("abc"), "abc");
    }
}
