//! Execution engine: derives build/run commands for a plan, runs them, and
//! drives the bounded repair loop when one fails.
//!
//! ```text
//!  commands query ──▶ run command ──ok──▶ next command ──▶ … ──▶ success
//!                          │
//!                        fails
//!                          ▼
//!                ┌──▶ repair query ──rerun──▶ run replacement ──ok──┐
//!                │         │                        │               │
//!                │       patch                    fails             ▼
//!                │         ▼                        │         next command
//!                │   patch coordinator ──▶ re-run original ─ok─┘
//!                │         │                        │
//!                └─────────┴──── fails, budget left ┘
//! ```

use std::path::Path;

use log::{info, warn};

use crate::{
    config::EngineConfig,
    error::Result,
    llm::LanguageModel,
    models::{CommandState, CommandTrace, Plan, RepositorySnapshot, RunReport, Status},
    patcher::PatchCoordinator,
    prompts,
    sandbox::CommandRunner,
};

pub mod decision;
mod repair;

#[cfg(test)]
mod tests;

/// Inputs shared by every prompt rendered during one run.
pub(crate) struct RunContext<'r> {
    pub intent: &'r str,
    pub plan: &'r Plan,
    pub user_context: &'r str,
    pub commands: &'r [String],
}

/// Runs a plan's commands under a repair budget.
pub struct ExecutionEngine<'a> {
    model: &'a dyn LanguageModel,
    runner: &'a dyn CommandRunner,
    patcher: PatchCoordinator<'a>,
    workspace: &'a Path,
    config: &'a EngineConfig,
}

impl<'a> ExecutionEngine<'a> {
    pub fn new(
        model: &'a dyn LanguageModel,
        runner: &'a dyn CommandRunner,
        patcher: PatchCoordinator<'a>,
        workspace: &'a Path,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            model,
            runner,
            patcher,
            workspace,
            config,
        }
    }

    /// Derives and runs the commands for `plan`.
    ///
    /// Never fails outright: every problem ends up in the returned report.
    /// The run succeeds only if every command succeeds, directly or after
    /// repair. The first command that cannot be repaired ends the run and
    /// later commands are not started.
    pub async fn run(
        &self,
        intent: &str,
        plan: &Plan,
        snapshot: &mut RepositorySnapshot,
        user_context: &str,
    ) -> RunReport {
        let commands = match self.derive_commands(plan, snapshot, user_context).await {
            Ok(commands) => commands,
            Err(e) => {
                warn!("Could not derive commands: {e}");
                return RunReport::failed(format!("Could not derive commands: {e}"));
            }
        };

        if commands.is_empty() {
            info!("No commands to run");
            return RunReport::new(Status::Success, "No commands to run");
        }

        let ctx = RunContext {
            intent,
            plan,
            user_context,
            commands: &commands,
        };
        let mut report = RunReport::new(
            Status::Success,
            format!("All {} command(s) succeeded", commands.len()),
        );

        for command in &commands {
            info!("Running `{command}`");
            let result = self.runner.run(command, self.workspace).await;

            let (trace, last, failure) = if result.is_success() {
                let trace = CommandTrace {
                    command: command.clone(),
                    state: CommandState::Succeeded,
                    repair_attempts: 0,
                };
                (trace, result, None)
            } else {
                warn!("`{command}` failed ({}), entering repair", result.exit);
                let outcome = self.repair(&ctx, command, result, snapshot).await;
                let trace = CommandTrace {
                    command: command.clone(),
                    state: outcome.state,
                    repair_attempts: outcome.attempts,
                };
                (trace, outcome.last, outcome.failure)
            };

            report.repair_attempts += trace.repair_attempts;
            report.stdout = last.stdout;
            report.stderr = last.stderr;
            report.commands.push(trace);

            if let Some(reason) = failure {
                report.status = Status::Failed;
                report.description = format!("`{command}` failed: {reason}");
                return report;
            }
        }

        report
    }

    async fn derive_commands(
        &self,
        plan: &Plan,
        snapshot: &RepositorySnapshot,
        user_context: &str,
    ) -> Result<Vec<String>> {
        let plan_text = plan.to_text();
        let structure = snapshot.render_structure();
        let contents = snapshot.render_contents();
        let prompt = prompts::COMMANDS.render(&[
            ("plan", &plan_text),
            ("context", prompts::or_none(user_context)),
            ("os", &self.config.target_os),
            ("structure", &structure),
            ("contents", &contents),
        ]);

        let response = self.model.query(&prompt).await?;
        let commands = decision::parse_commands(&response)?;
        info!("Derived {} command(s)", commands.len());
        Ok(commands)
    }
}
