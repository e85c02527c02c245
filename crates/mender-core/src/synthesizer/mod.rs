//! Code synthesizer: one plan step in, whole-file changes out.

use log::{debug, info, warn};

use crate::{
    error::{MenderError, Result},
    format::BlockFormat,
    llm::LanguageModel,
    models::{normalize_path, FileChange, Plan, PlanStep, RepositorySnapshot},
    prompts,
    repository::FileStore,
};


/// Produces and applies the file changes for a single plan step.
pub struct CodeSynthesizer<'a> {
    model: &'a dyn LanguageModel,
    store: &'a dyn FileStore,
    max_reformat_attempts: u32,
}

impl<'a> CodeSynthesizer<'a> {
    pub fn new(
        model: &'a dyn LanguageModel,
        store: &'a dyn FileStore,
        max_reformat_attempts: u32,
    ) -> Self {
        Self {
            model,
            store,
            max_reformat_attempts,
        }
    }

    /// Synthesizes `step` and applies the result to the file store and to
    /// `snapshot`.
    ///
    /// Every path is validated against a staged copy of the snapshot before
    /// anything is written, so an escaping or colliding path writes nothing.
    /// Records are then written in order and each one is committed to
    /// `snapshot` as soon as its write succeeds. A failed write leaves the
    /// snapshot matching what reached the store.
    ///
    /// # Errors
    ///
    /// `MenderError::Llm` for transport failures,
    /// `MenderError::MalformedResponse` once the reformat budget is spent on
    /// responses that are unwrapped or do not parse,
    /// `MenderError::InvalidPath` for unusable paths, and
    /// `MenderError::FileSystem` for write failures.
    pub async fn synthesize(
        &self,
        plan: &Plan,
        step: &PlanStep,
        snapshot: &mut RepositorySnapshot,
        user_context: &str,
    ) -> Result<Vec<FileChange>> {
        let plan_text = plan.to_text();
        let step_text = step.to_text();
        let structure = snapshot.render_structure();
        let contents = snapshot.render_contents();
        let prompt = prompts::CODE.render(&[
            ("plan", &plan_text),
            ("step", &step_text),
            ("context", prompts::or_none(user_context)),
            ("structure", &structure),
            ("contents", &contents),
        ]);
        debug!(
            "Synthesizing step {} ({} byte prompt)",
            step.step_number,
            prompt.len()
        );

        let response = self.model.query(&prompt).await?;
        let changes = self
            .parse_with_reformat(response)
            .await?
            .into_iter()
            .map(|change| Ok(FileChange::new(normalize_path(&change.path)?, change.content)))
            .collect::<Result<Vec<_>>>()?;

        let mut staged = snapshot.clone();
        for change in &changes {
            staged.apply(change)?;
        }
        for change in &changes {
            self.store.write(&change.path, &change.content).await?;
            snapshot.apply(change)?;
        }

        info!(
            "Step {} wrote {} file(s): {}",
            step.step_number,
            changes.len(),
            changes
                .iter()
                .map(|c| c.path.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(changes)
    }

    /// Re-queries with the reformat template until the response is wrapped
    /// and parses into file blocks, or the budget runs out.
    async fn parse_with_reformat(&self, mut response: String) -> Result<Vec<FileChange>> {
        let format = BlockFormat::Plain;
        let mut attempts = 0;

        loop {
            let problem = if format.is_well_formed(&response) {
                match format.parse(&response) {
                    Ok(changes) => return Ok(changes),
                    Err(e) => e.to_string(),
                }
            } else {
                "response is not wrapped in ~~~ file blocks".to_string()
            };

            if attempts == self.max_reformat_attempts {
                return Err(MenderError::malformed(
                    "code",
                    format!("{problem} after {attempts} reformat attempt(s)"),
                ));
            }
            attempts += 1;
            warn!(
                "Code response rejected ({problem}), requesting reformat {attempts}/{}",
                self.max_reformat_attempts
            );
            let prompt = prompts::REFORMAT.render(&[("previous_response", &response)]);
            response = self.model.query(&prompt).await?;
        }
    }
}
