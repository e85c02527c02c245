//! Schema initialization and versioning.

use crate::error::{MenderError, Result, StoreResultExt};

/// Version written to `PRAGMA user_version` for the current schema.
pub const SCHEMA_VERSION: i64 = 1;

impl super::ArtifactStore {
    /// Initializes the schema from the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .store_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .store_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Stamps fresh databases and refuses ones written by a newer schema.
    fn apply_migrations(&self) -> Result<()> {
        let version: i64 = self
            .connection
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .store_context("Failed to read schema version")?;

        if version > SCHEMA_VERSION {
            return Err(MenderError::Configuration {
                message: format!(
                    "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
                ),
            });
        }

        if version < SCHEMA_VERSION {
            self.connection
                .execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
                .store_context("Failed to record schema version")?;
        }

        Ok(())
    }
}
