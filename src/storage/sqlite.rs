//! Durable key-value store on top of the `storage_entries` table.

use super::KeyValueStore;
use crate::{
    entities::{StorageEntry, storage_entry},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::debug;

/// Reads and writes ledger values through a SeaORM connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an open connection whose tables already exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = StorageEntry::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(entry.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        let existing = StorageEntry::find_by_id(key.to_string()).one(&self.db).await?;

        if let Some(entry) = existing {
            let mut active_model: storage_entry::ActiveModel = entry.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_entry = storage_entry::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
            };
            new_entry.insert(&self.db).await?;
        }

        debug!(key, bytes = value.len(), "Stored ledger entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_missing_key_reads_as_none() -> Result<()> {
        let store = SqliteStore::new(setup_test_db().await?);
        assert_eq!(store.get("nothing-here").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_inserts_then_updates() -> Result<()> {
        let store = SqliteStore::new(setup_test_db().await?);

        store.set("habitora-v1:payments:property:1", "[]").await?;
        store
            .set("habitora-v1:payments:property:1", r#"[{"id":"7-1"}]"#)
            .await?;

        assert_eq!(
            store.get("habitora-v1:payments:property:1").await?,
            Some(r#"[{"id":"7-1"}]"#.to_string())
        );

        let rows = StorageEntry::find().all(store.connection()).await?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }
}
