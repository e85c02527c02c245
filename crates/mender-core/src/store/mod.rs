//! SQLite artifact store for snapshots, plans and runs.
//!
//! The store is synchronous; async callers open a fresh [`ArtifactStore`]
//! inside `tokio::task::spawn_blocking` for every operation.

use std::path::Path;

use jiff::Timestamp;
use rusqlite::{types::Type, Connection};

use crate::error::{Result, StoreResultExt};

pub mod migrations;
pub mod plan_queries;
pub mod run_queries;
pub mod snapshot_queries;

/// Connection to the artifact database.
pub struct ArtifactStore {
    connection: Connection,
}

impl ArtifactStore {
    /// Opens (creating if needed) the database at `path` and initializes the
    /// schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).store_context("Failed to open database connection")?;
        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().store_context("Failed to open in-memory database")?;
        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }
}

/// Reads column `index` as an RFC 3339 timestamp.
pub(crate) fn timestamp_column(row: &rusqlite::Row, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Reads column `index` as JSON into `T`.
pub(crate) fn json_column<T: serde::de::DeserializeOwned>(
    row: &rusqlite::Row,
    index: usize,
) -> rusqlite::Result<T> {
    let body: String = row.get(index)?;
    serde_json::from_str(&body)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}
