//! Snapshot persistence keyed by content hash.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::{json_column, timestamp_column};
use crate::{
    error::{Result, StoreResultExt},
    models::{RepositorySnapshot, SnapshotRecord},
};

const INSERT_SNAPSHOT_SQL: &str =
    "INSERT OR IGNORE INTO snapshots (hash, repository, body, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_SNAPSHOT_SQL: &str =
    "SELECT hash, repository, body, created_at FROM snapshots WHERE hash = ?1";

impl super::ArtifactStore {
    /// Stores `snapshot` under its content hash and returns the hash.
    ///
    /// Saving identical content twice keeps the first row.
    pub fn save_snapshot(&self, repository: &str, snapshot: &RepositorySnapshot) -> Result<String> {
        let hash = snapshot.content_hash();
        let body = serde_json::to_string(snapshot)?;
        let now = Timestamp::now().to_string();

        self.connection
            .execute(INSERT_SNAPSHOT_SQL, params![&hash, repository, &body, &now])
            .store_context("Failed to insert snapshot")?;

        Ok(hash)
    }

    /// Retrieves a snapshot by content hash.
    pub fn get_snapshot(&self, hash: &str) -> Result<Option<SnapshotRecord>> {
        self.connection
            .query_row(SELECT_SNAPSHOT_SQL, params![hash], |row| {
                Ok(SnapshotRecord {
                    hash: row.get(0)?,
                    repository: row.get(1)?,
                    snapshot: json_column(row, 2)?,
                    created_at: timestamp_column(row, 3)?,
                })
            })
            .optional()
            .store_context("Failed to query snapshot")
    }
}
