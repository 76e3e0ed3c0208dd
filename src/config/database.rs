//! Database configuration module.
//!
//! Opens the `SQLite` database through `SeaORM` and creates the single
//! `storage_entries` table the ledger persists into. Table DDL is generated from
//! the entity definition with `Schema::create_table_from_entity`, so the schema
//! always matches the Rust struct.

use crate::config::DatabaseSettings;
use crate::entities::StorageEntry;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::info;

/// Default database location when neither `DATABASE_URL` nor config.toml names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/habitora.sqlite?mode=rwc";

/// Resolves the database URL: `DATABASE_URL` from the environment wins over
/// the configured value.
#[must_use]
pub fn get_database_url(settings: &DatabaseSettings) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| settings.url.clone())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection(settings: &DatabaseSettings) -> Result<DatabaseConnection> {
    let database_url = get_database_url(settings);
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    info!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory holding a file-backed `SQLite` database, if the URL names one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Creates the ledger tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut storage_table = schema.create_table_from_entity(StorageEntry);
    storage_table.if_not_exists();

    db.execute(builder.build(&storage_table)).await?;

    Ok(())
}
