//! Pipeline entry points: plan, code, execute and the full run.

use log::{info, warn};

use super::Session;
use crate::{
    display::FileChanges,
    error::{MenderError, Result},
    models::{
        FileChange, Outcome, PipelineReport, Plan, PlanRecord, RepositorySnapshot, RunReport,
    },
    params::{ApplyPlan, GeneratePlan, RunPipeline},
    repository::RepositoryProvider,
};

impl Session {
    /// Compiles a plan for `params.intent` against the current workspace and
    /// stores it together with the snapshot it was compiled from.
    pub async fn generate_plan(&self, params: &GeneratePlan) -> Outcome<PlanRecord> {
        match self.try_generate_plan(params).await {
            Ok(record) => Outcome::success(
                format!(
                    "Compiled plan {} with {} step(s)",
                    record.id,
                    record.plan.steps.len()
                ),
                record,
            ),
            Err(e) => failed("Plan generation failed", &e),
        }
    }

    /// Synthesizes every step of a stored plan into the workspace.
    pub async fn generate_code(&self, params: &ApplyPlan) -> Outcome<FileChanges> {
        match self.try_generate_code(params).await {
            Ok(changes) => Outcome::success(
                format!("Wrote {} file(s) for plan {}", changes.len(), params.id),
                FileChanges(changes),
            ),
            Err(e) => failed("Code generation failed", &e),
        }
    }

    /// Runs the commands of a stored plan with repair and records the run.
    pub async fn execute_plan(&self, params: &ApplyPlan) -> Outcome<RunReport> {
        match self.try_execute_plan(params).await {
            Ok(report) if report.status.is_success() => {
                Outcome::success(report.description.clone(), report)
            }
            Ok(report) => Outcome::failed_with(report.description.clone(), report),
            Err(e) => failed("Execution failed", &e),
        }
    }

    /// Plans, synthesizes and executes in one go.
    ///
    /// The snapshot loaded at the start is threaded through synthesis and
    /// execution, so repairs see the code written for the plan.
    pub async fn run(&self, params: &RunPipeline) -> Outcome<PipelineReport> {
        match self.try_run(params).await {
            Ok(report) if report.run.status.is_success() => {
                Outcome::success(report.run.description.clone(), report)
            }
            Ok(report) => Outcome::failed_with(report.run.description.clone(), report),
            Err(e) => failed("Pipeline failed", &e),
        }
    }

    async fn try_generate_plan(&self, params: &GeneratePlan) -> Result<PlanRecord> {
        let intent = params.validate()?;
        let snapshot = self.repository.load().await?;
        self.compile_and_store(intent, &snapshot).await
    }

    async fn try_generate_code(&self, params: &ApplyPlan) -> Result<Vec<FileChange>> {
        let record = self.load_plan(params.id).await?;
        let mut snapshot = self.repository.load().await?;
        self.synthesize_plan(&record.plan, &mut snapshot, params.context())
            .await
    }

    async fn try_execute_plan(&self, params: &ApplyPlan) -> Result<RunReport> {
        let record = self.load_plan(params.id).await?;
        let mut snapshot = self.repository.load().await?;
        self.execute_and_record(&record, &mut snapshot, params.context())
            .await
    }

    async fn try_run(&self, params: &RunPipeline) -> Result<PipelineReport> {
        let intent = params.validate()?;
        let mut snapshot = self.repository.load().await?;
        let plan = self.compile_and_store(intent, &snapshot).await?;

        let changes = self
            .synthesize_plan(&plan.plan, &mut snapshot, params.context())
            .await?;
        let mut changed_paths: Vec<String> = Vec::new();
        for change in changes {
            if !changed_paths.contains(&change.path) {
                changed_paths.push(change.path);
            }
        }

        let run = self
            .execute_and_record(&plan, &mut snapshot, params.context())
            .await?;
        Ok(PipelineReport {
            plan,
            changed_paths,
            run,
        })
    }

    async fn compile_and_store(
        &self,
        intent: &str,
        snapshot: &RepositorySnapshot,
    ) -> Result<PlanRecord> {
        let plan = self.compiler().compile(intent, snapshot).await?;
        let record = self.store_plan(snapshot, intent, &plan).await?;
        info!(
            "Stored plan {} for {} ({} step(s))",
            record.id,
            self.repository_name,
            plan.steps.len()
        );
        Ok(record)
    }

    /// Applies every step in order; the first failing step aborts.
    async fn synthesize_plan(
        &self,
        plan: &Plan,
        snapshot: &mut RepositorySnapshot,
        user_context: &str,
    ) -> Result<Vec<FileChange>> {
        let synthesizer = self.synthesizer();
        let mut changes = Vec::new();
        for step in &plan.steps {
            let written = synthesizer
                .synthesize(plan, step, snapshot, user_context)
                .await
                .map_err(|e| MenderError::SynthesisFailed {
                    step: step.step_number.clone(),
                    reason: e.to_string(),
                })?;
            changes.extend(written);
        }
        Ok(changes)
    }

    async fn execute_and_record(
        &self,
        record: &PlanRecord,
        snapshot: &mut RepositorySnapshot,
        user_context: &str,
    ) -> Result<RunReport> {
        let report = self
            .engine()
            .run(&record.intent, &record.plan, snapshot, user_context)
            .await;
        let run = self.store_run(record.id, &report).await?;
        info!(
            "Recorded run {} for plan {}: {}",
            run.id, record.id, run.status
        );
        Ok(report)
    }
}

fn failed<T>(context: &str, error: &MenderError) -> Outcome<T> {
    warn!("{context}: {error}");
    Outcome::failed(format!("{context}: {error}"))
}
