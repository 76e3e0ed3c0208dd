//! Core business logic - framework-agnostic payment ledger operations.

/// Contract metadata operations
pub mod contract;
/// Ledger store, storage keys and operation outcomes
pub mod ledger;
/// Installment generation, payment and finalization
pub mod payment;
/// Pending/history views and summary totals
pub mod report;
/// Calendar arithmetic and date labels
pub mod schedule;

pub use ledger::{Finalization, Generation, LedgerStore, Mutation, PaymentUpdate, Upsert};
