//! Plan persistence.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::{json_column, timestamp_column};
use crate::{
    error::{Result, StoreResultExt},
    models::{Plan, PlanRecord},
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (repository, snapshot_hash, intent, body, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const PLAN_COLUMNS: &str = "id, repository, snapshot_hash, intent, body, created_at";

impl super::ArtifactStore {
    fn build_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<PlanRecord> {
        Ok(PlanRecord {
            id: row.get::<_, i64>(0)? as u64,
            repository: row.get(1)?,
            snapshot_hash: row.get(2)?,
            intent: row.get(3)?,
            plan: json_column(row, 4)?,
            created_at: timestamp_column(row, 5)?,
        })
    }

    /// Stores a compiled plan. The snapshot must already be saved.
    pub fn save_plan(
        &mut self,
        repository: &str,
        snapshot_hash: &str,
        intent: &str,
        plan: &Plan,
    ) -> Result<PlanRecord> {
        let body = serde_json::to_string(plan)?;
        let now = Timestamp::now();

        let tx = self
            .connection
            .transaction()
            .store_context("Failed to begin transaction")?;
        tx.execute(
            INSERT_PLAN_SQL,
            params![repository, snapshot_hash, intent, &body, now.to_string()],
        )
        .store_context("Failed to insert plan")?;
        let id = tx.last_insert_rowid() as u64;
        tx.commit().store_context("Failed to commit transaction")?;

        Ok(PlanRecord {
            id,
            repository: repository.to_string(),
            snapshot_hash: snapshot_hash.to_string(),
            intent: intent.to_string(),
            plan: plan.clone(),
            created_at: now,
        })
    }

    /// Retrieves a plan by ID.
    pub fn get_plan(&self, id: u64) -> Result<Option<PlanRecord>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1");
        self.connection
            .query_row(&sql, params![id as i64], Self::build_plan_from_row)
            .optional()
            .store_context("Failed to query plan")
    }

    /// Lists plans newest first, optionally limited to one repository.
    pub fn list_plans(&self, repository: Option<&str>) -> Result<Vec<PlanRecord>> {
        let (sql, args): (String, Vec<&str>) = match repository {
            Some(repository) => (
                format!("SELECT {PLAN_COLUMNS} FROM plans WHERE repository = ?1 ORDER BY id DESC"),
                vec![repository],
            ),
            None => (format!("SELECT {PLAN_COLUMNS} FROM plans ORDER BY id DESC"), Vec::new()),
        };

        let mut stmt = self
            .connection
            .prepare(&sql)
            .store_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args), Self::build_plan_from_row)
            .store_context("Failed to query plans")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .store_context("Failed to read plan rows")
    }
}
