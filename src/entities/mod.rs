//! Entity module - SeaORM entity definitions for the database.
//! The ledger only needs a single key-value table; lists are stored as JSON.

pub mod storage_entry;

pub use storage_entry::{
    Column as StorageEntryColumn, Entity as StorageEntry, Model as StorageEntryModel,
};
