//! Patch coordinator: replans after a command failure and re-synthesizes
//! every step of the remediation plan.

use log::{info, warn};

use crate::{
    compiler::PlanCompiler,
    error::{MenderError, Result},
    format::BlockFormat,
    models::{FailureContext, FileChange, PatchReport, RepositorySnapshot},
    synthesizer::CodeSynthesizer,
};


/// Runs compile-rerun followed by synthesis of each remediation step.
pub struct PatchCoordinator<'a> {
    compiler: PlanCompiler<'a>,
    synthesizer: CodeSynthesizer<'a>,
}

impl<'a> PatchCoordinator<'a> {
    pub fn new(compiler: PlanCompiler<'a>, synthesizer: CodeSynthesizer<'a>) -> Self {
        Self {
            compiler,
            synthesizer,
        }
    }

    /// Compiles a remediation plan from `failure` and applies every step.
    ///
    /// Steps run in plan order against the shared snapshot, so later steps
    /// see the files earlier ones wrote.
    ///
    /// # Errors
    ///
    /// Returns the compiler's error if no remediation plan could be built,
    /// and `MenderError::SynthesisFailed` naming the first step that could
    /// not be applied. Steps after it are not attempted.
    pub async fn patch(
        &self,
        intent: &str,
        snapshot: &mut RepositorySnapshot,
        user_context: &str,
        failure: &FailureContext,
    ) -> Result<PatchReport> {
        let plan = self.compiler.compile_rerun(intent, snapshot, failure).await?;
        info!(
            "Patching with {} remediation step(s): {}",
            plan.steps.len(),
            plan.current_focus
        );

        let mut changed_paths: Vec<String> = Vec::new();
        for step in &plan.steps {
            let changes = self
                .synthesizer
                .synthesize(&plan, step, snapshot, user_context)
                .await
                .map_err(|e| {
                    warn!("Remediation step {} failed: {e}", step.step_number);
                    MenderError::SynthesisFailed {
                        step: step.step_number.clone(),
                        reason: e.to_string(),
                    }
                })?;

            for change in changes {
                if !changed_paths.contains(&change.path) {
                    changed_paths.push(change.path);
                }
            }
        }

        Ok(PatchReport {
            plan,
            changed_paths,
        })
    }
}

/// Re-emits the current contents of `paths` in the markdown block format,
/// for feeding patched code back into a prompt.
pub fn render_changed_files(snapshot: &RepositorySnapshot, paths: &[String]) -> String {
    let changes: Vec<FileChange> = paths
        .iter()
        .filter_map(|path| {
            let text = snapshot.get(path)?.as_text()?;
            Some(FileChange::new(path.clone(), text))
        })
        .collect();
    BlockFormat::Markdown.render(&changes)
}
