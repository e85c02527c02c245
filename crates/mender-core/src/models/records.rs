//! Rows of the artifact store.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Plan, RepositorySnapshot, Status};

/// A snapshot persisted under its content hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub hash: String,
    pub repository: String,
    pub snapshot: RepositorySnapshot,
    pub created_at: Timestamp,
}

/// A compiled plan together with the intent and snapshot it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanRecord {
    pub id: u64,
    pub repository: String,
    pub snapshot_hash: String,
    pub intent: String,
    pub plan: Plan,
    pub created_at: Timestamp,
}

/// Outcome of one execution run of a stored plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRecord {
    pub id: u64,
    pub plan_id: u64,
    pub status: Status,
    pub stdout: String,
    pub stderr: String,
    pub repair_attempts: u32,
    pub created_at: Timestamp,
}

/// A stored plan together with its execution history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanDetails {
    pub record: PlanRecord,
    pub runs: Vec<RunRecord>,
}
