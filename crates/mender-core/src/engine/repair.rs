//! The bounded repair loop for one failing command.

use log::{info, warn};

use super::{decision, ExecutionEngine, RunContext};
use crate::{
    models::{CommandResult, CommandState, FailureContext, RepairAction, RepositorySnapshot},
    patcher, prompts,
};

/// How repair of a single command ended.
pub(super) struct RepairOutcome {
    /// `Succeeded` or `Failed`
    pub state: CommandState,
    /// Iterations spent, each one repair query
    pub attempts: u32,
    /// Result of the last command executed
    pub last: CommandResult,
    /// Why repair gave up; `None` on success
    pub failure: Option<String>,
}

impl RepairOutcome {
    fn succeeded(attempts: u32, last: CommandResult) -> Self {
        Self {
            state: CommandState::Succeeded,
            attempts,
            last,
            failure: None,
        }
    }

    fn failed(attempts: u32, last: CommandResult, reason: String) -> Self {
        Self {
            state: CommandState::Failed,
            attempts,
            last,
            failure: Some(reason),
        }
    }
}

impl ExecutionEngine<'_> {
    /// Repairs `command` after its first failure produced `result`.
    ///
    /// Each iteration issues one repair query and acts on the decision. A
    /// malformed decision, a failed repair query or a failed patch ends the
    /// loop at once; a rerun or re-execution that still fails consumes the
    /// iteration and the loop continues while budget remains.
    pub(super) async fn repair(
        &self,
        ctx: &RunContext<'_>,
        command: &str,
        result: CommandResult,
        snapshot: &mut RepositorySnapshot,
    ) -> RepairOutcome {
        let max_attempts = self.config.max_repair_attempts;
        let mut last = result;
        let mut patched_paths: Vec<String> = Vec::new();
        let mut attempts = 0;

        while attempts < max_attempts {
            attempts += 1;
            info!("Repairing `{command}`, attempt {attempts}/{max_attempts}");

            let patches = if patched_paths.is_empty() {
                "(none)".to_string()
            } else {
                patcher::render_changed_files(snapshot, &patched_paths)
            };
            let prompt = self.repair_prompt(ctx, &last, snapshot, &patches);

            let response = match self.model.query(&prompt).await {
                Ok(response) => response,
                Err(e) => return RepairOutcome::failed(attempts, last, format!("repair query failed: {e}")),
            };
            let decision = match decision::parse_repair_decision(&response) {
                Ok(decision) => decision,
                Err(e) => return RepairOutcome::failed(attempts, last, e.to_string()),
            };
            if let Some(rationale) = &decision.rationale {
                info!("Repair rationale: {rationale}");
            }

            last = match decision.action {
                RepairAction::Rerun { command: replacement } => {
                    info!("Rerunning as `{replacement}`");
                    self.runner.run(&replacement, self.workspace).await
                }
                RepairAction::Patch => {
                    let failure = FailureContext::new(&last, ctx.commands);
                    match self
                        .patcher
                        .patch(ctx.intent, snapshot, ctx.user_context, &failure)
                        .await
                    {
                        Ok(report) => {
                            for path in report.changed_paths {
                                if !patched_paths.contains(&path) {
                                    patched_paths.push(path);
                                }
                            }
                            self.runner.run(command, self.workspace).await
                        }
                        Err(e) => {
                            warn!("Patch failed: {e}");
                            return RepairOutcome::failed(attempts, last, format!("patch failed: {e}"));
                        }
                    }
                }
            };

            if last.is_success() {
                info!("`{command}` repaired after {attempts} attempt(s)");
                return RepairOutcome::succeeded(attempts, last);
            }
            warn!("Repair attempt {attempts} still failing ({})", last.exit);
        }

        RepairOutcome::failed(
            attempts,
            last,
            format!("repair budget of {max_attempts} attempt(s) exhausted"),
        )
    }

    fn repair_prompt(
        &self,
        ctx: &RunContext<'_>,
        last: &CommandResult,
        snapshot: &RepositorySnapshot,
        patches: &str,
    ) -> String {
        let commands = prompts::numbered(ctx.commands);
        let plan_text = ctx.plan.to_text();
        let structure = snapshot.render_structure();
        let contents = snapshot.render_contents();
        prompts::REPAIR.render(&[
            ("commands", &commands),
            ("output", prompts::or_none(&last.stdout)),
            ("error", prompts::or_none(&last.stderr)),
            ("plan", &plan_text),
            ("context", prompts::or_none(ctx.user_context)),
            ("os", &self.config.target_os),
            ("patches", patches),
            ("structure", &structure),
            ("contents", &contents),
        ])
    }
}
