//! Artifact store access for the session.
//!
//! Each call opens its own connection on the blocking pool.

use tokio::task;

use super::Session;
use crate::{
    error::{MenderError, Result},
    models::{Plan, PlanDetails, PlanRecord, RepositorySnapshot, RunRecord, RunReport},
    store::ArtifactStore,
};

impl Session {
    async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ArtifactStore) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut store = ArtifactStore::open(&db_path)?;
            f(&mut store)
        })
        .await
        .map_err(|e| MenderError::join(&e))?
    }

    /// Stores the snapshot and the plan compiled from it.
    pub(crate) async fn store_plan(
        &self,
        snapshot: &RepositorySnapshot,
        intent: &str,
        plan: &Plan,
    ) -> Result<PlanRecord> {
        let repository = self.repository_name.clone();
        let snapshot = snapshot.clone();
        let intent = intent.to_string();
        let plan = plan.clone();

        self.with_store(move |store| {
            let hash = store.save_snapshot(&repository, &snapshot)?;
            store.save_plan(&repository, &hash, &intent, &plan)
        })
        .await
    }

    /// Fetches a plan, turning a missing row into `PlanNotFound`.
    pub(crate) async fn load_plan(&self, id: u64) -> Result<PlanRecord> {
        self.with_store(move |store| store.get_plan(id))
            .await?
            .ok_or(MenderError::PlanNotFound { id })
    }

    pub(crate) async fn store_run(&self, plan_id: u64, report: &RunReport) -> Result<RunRecord> {
        let report = report.clone();
        self.with_store(move |store| store.record_run(plan_id, &report))
            .await
    }

    pub(crate) async fn load_plans(&self) -> Result<Vec<PlanRecord>> {
        let repository = self.repository_name.clone();
        self.with_store(move |store| store.list_plans(Some(repository.as_str())))
            .await
    }

    pub(crate) async fn load_plan_details(&self, id: u64) -> Result<PlanDetails> {
        self.with_store(move |store| {
            let record = store.get_plan(id)?.ok_or(MenderError::PlanNotFound { id })?;
            let runs = store.list_runs(id)?;
            Ok(PlanDetails { record, runs })
        })
        .await
    }
}
