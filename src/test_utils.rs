//! Shared test utilities.
//!
//! Helpers for building ledgers over either backend and contracts with
//! sensible defaults.

use crate::{
    config::LedgerSettings,
    core::LedgerStore,
    errors::Result,
    models::{ContractMeta, ContractState},
    storage::{MemoryStore, SqliteStore},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Ledger over a fresh [`MemoryStore`] with default settings.
#[must_use]
pub fn setup_memory_ledger() -> LedgerStore<MemoryStore> {
    LedgerStore::new(MemoryStore::new(), LedgerSettings::default())
}

/// Ledger over a fresh in-memory `SQLite` database.
pub async fn setup_sqlite_ledger() -> Result<LedgerStore<SqliteStore>> {
    let db = setup_test_db().await?;
    Ok(LedgerStore::new(
        SqliteStore::new(db),
        LedgerSettings::default(),
    ))
}

/// Shorthand for a calendar date; panics on invalid input.
#[must_use]
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Creates contract metadata with sensible defaults.
///
/// # Defaults
/// * tenant: "Ana Torres" (id 3), room "A-101" (id 9)
/// * start: 2025-01-15, 3 months at 500.00
/// * unsigned, `ACTIVO`
#[must_use]
pub fn sample_contract(property_id: i64, contract_id: i64) -> ContractMeta {
    ContractMeta {
        contract_id,
        property_id,
        tenant_id: 3,
        tenant_name: "Ana Torres".to_string(),
        room_id: 9,
        room_code: "A-101".to_string(),
        start_date: date(2025, 1, 15),
        end_date: Some(date(2025, 4, 15)),
        months: 3,
        monthly_rent: 500.0,
        signed: false,
        estado: ContractState::Activo,
    }
}
