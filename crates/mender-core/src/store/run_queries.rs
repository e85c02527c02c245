//! Execution run persistence.

use jiff::Timestamp;
use rusqlite::{params, types::Type};

use super::timestamp_column;
use crate::{
    error::{MenderError, Result, StoreResultExt},
    models::{RunRecord, RunReport, Status},
};

const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";
const INSERT_RUN_SQL: &str = "INSERT INTO runs (plan_id, status, stdout, stderr, repair_attempts, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_RUNS_BY_PLAN_SQL: &str = "SELECT id, plan_id, status, stdout, stderr, repair_attempts, created_at FROM runs WHERE plan_id = ?1 ORDER BY id";

impl super::ArtifactStore {
    fn build_run_from_row(row: &rusqlite::Row) -> rusqlite::Result<RunRecord> {
        let status_str: String = row.get(2)?;
        let status = status_str.parse::<Status>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                format!("Invalid status: {status_str}").into(),
            )
        })?;

        Ok(RunRecord {
            id: row.get::<_, i64>(0)? as u64,
            plan_id: row.get::<_, i64>(1)? as u64,
            status,
            stdout: row.get(3)?,
            stderr: row.get(4)?,
            repair_attempts: row.get::<_, i64>(5)? as u32,
            created_at: timestamp_column(row, 6)?,
        })
    }

    /// Records the outcome of executing plan `plan_id`.
    ///
    /// # Errors
    ///
    /// Returns `MenderError::PlanNotFound` if the plan does not exist.
    pub fn record_run(&self, plan_id: u64, report: &RunReport) -> Result<RunRecord> {
        let exists: bool = self
            .connection
            .query_row(CHECK_PLAN_EXISTS_SQL, params![plan_id as i64], |row| row.get(0))
            .store_context("Failed to check plan existence")?;
        if !exists {
            return Err(MenderError::PlanNotFound { id: plan_id });
        }

        let now = Timestamp::now();
        self.connection
            .execute(
                INSERT_RUN_SQL,
                params![
                    plan_id as i64,
                    report.status.as_str(),
                    &report.stdout,
                    &report.stderr,
                    i64::from(report.repair_attempts),
                    now.to_string()
                ],
            )
            .store_context("Failed to insert run")?;

        Ok(RunRecord {
            id: self.connection.last_insert_rowid() as u64,
            plan_id,
            status: report.status,
            stdout: report.stdout.clone(),
            stderr: report.stderr.clone(),
            repair_attempts: report.repair_attempts,
            created_at: now,
        })
    }

    /// Lists runs of a plan, oldest first.
    pub fn list_runs(&self, plan_id: u64) -> Result<Vec<RunRecord>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_RUNS_BY_PLAN_SQL)
            .store_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(params![plan_id as i64], Self::build_run_from_row)
            .store_context("Failed to query runs")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .store_context("Failed to read run rows")
    }
}
