//! Ledger store - per-property contract metadata and payment installments.
//!
//! Each property owns two independent lists in the key-value backend, one
//! with contract metadata and one with installments. Every operation reads a
//! whole list, changes it in memory and writes the whole list back; nothing is
//! cached between calls and nothing is locked across the read-modify-write, so
//! two writers racing on the same property end with the last write winning.
//!
//! Lookups that find nothing are not errors. Mutations report what happened
//! through the outcome types in this module and leave storage untouched when
//! there was nothing to change.

use crate::{
    config::LedgerSettings,
    errors::Result,
    models::{ContractMeta, PaymentInstallment},
    storage::KeyValueStore,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// Result of a mutation that targets a single existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The record was found and changed
    Applied,
    /// No such record; nothing was written
    NotFound,
}

impl Mutation {
    /// True if the record was found.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of [`LedgerStore::upsert_contract_meta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// No contract with that id existed
    Inserted,
    /// An existing contract was overwritten
    Replaced,
}

/// Result of [`LedgerStore::generate_payments_for_contract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// This many installments were appended
    Generated(usize),
    /// The contract already had installments; none were added
    AlreadyScheduled,
    /// No metadata for the contract; none were added
    ContractNotFound,
}

/// Result of [`LedgerStore::mark_payment_as_paid`].
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentUpdate {
    /// Whether the installment was found and marked paid
    pub outcome: Mutation,
    /// The property's installments after the update
    pub payments: Vec<PaymentInstallment>,
}

/// Result of [`LedgerStore::on_contract_finalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finalization {
    /// Whether contract metadata existed to be cancelled
    pub contract: Mutation,
    /// Number of pending installments removed
    pub removed_installments: usize,
}

/// Payment ledger over an injected key-value backend.
#[derive(Debug)]
pub struct LedgerStore<S> {
    backend: S,
    settings: LedgerSettings,
}

impl<S: KeyValueStore> LedgerStore<S> {
    /// Creates a store writing through `backend`.
    #[must_use]
    pub const fn new(backend: S, settings: LedgerSettings) -> Self {
        Self { backend, settings }
    }

    /// The storage backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Settings the store was created with.
    #[must_use]
    pub const fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Storage key of a property's contract metadata list.
    #[must_use]
    pub fn contracts_key(&self, property_id: i64) -> String {
        format!(
            "{}:contracts-meta:property:{property_id}",
            self.settings.storage_prefix
        )
    }

    /// Storage key of a property's installment list.
    #[must_use]
    pub fn payments_key(&self, property_id: i64) -> String {
        format!(
            "{}:payments:property:{property_id}",
            self.settings.storage_prefix
        )
    }

    /// Every contract recorded for a property.
    pub async fn contracts(&self, property_id: i64) -> Result<Vec<ContractMeta>> {
        self.load_list(&self.contracts_key(property_id)).await
    }

    /// Every installment recorded for a property, in storage order.
    pub async fn payments(&self, property_id: i64) -> Result<Vec<PaymentInstallment>> {
        self.load_list(&self.payments_key(property_id)).await
    }

    pub(crate) async fn save_contracts(
        &self,
        property_id: i64,
        list: &[ContractMeta],
    ) -> Result<()> {
        self.save_list(&self.contracts_key(property_id), list).await
    }

    pub(crate) async fn save_payments(
        &self,
        property_id: i64,
        list: &[PaymentInstallment],
    ) -> Result<()> {
        self.save_list(&self.payments_key(property_id), list).await
    }

    /// Absent values and values that do not parse both load as an empty list.
    async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Option<Vec<T>>>(&raw) {
            Ok(list) => {
                let list = list.unwrap_or_default();
                debug!(key, entries = list.len(), "Loaded ledger list");
                Ok(list)
            }
            Err(e) => {
                warn!(key, "Ignoring unreadable ledger list: {e}");
                Ok(Vec::new())
            }
        }
    }

    async fn save_list<T: Serialize>(&self, key: &str, list: &[T]) -> Result<()> {
        let raw = serde_json::to_string(list)?;
        self.backend.set(key, &raw).await?;
        debug!(key, entries = list.len(), "Saved ledger list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_contract, setup_memory_ledger};

    #[test]
    fn test_mutation_is_applied() {
        assert!(Mutation::Applied.is_applied());
        assert!(!Mutation::NotFound.is_applied());
    }

    #[test]
    fn test_keys_are_namespaced_by_property() {
        let ledger = setup_memory_ledger();
        assert_eq!(ledger.contracts_key(1), "habitora-v1:contracts-meta:property:1");
        assert_eq!(ledger.payments_key(42), "habitora-v1:payments:property:42");
    }

    #[tokio::test]
    async fn test_absent_lists_load_empty() -> Result<()> {
        let ledger = setup_memory_ledger();
        assert!(ledger.contracts(1).await?.is_empty());
        assert!(ledger.payments(1).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_lists_load_empty() -> Result<()> {
        let ledger = setup_memory_ledger();
        ledger.backend().set(&ledger.contracts_key(1), "{not json").await?;
        ledger.backend().set(&ledger.payments_key(1), "null").await?;
        ledger
            .backend()
            .set(&ledger.payments_key(2), r#"[{"id": 3}]"#)
            .await?;

        assert!(ledger.contracts(1).await?.is_empty());
        assert!(ledger.payments(1).await?.is_empty());
        assert!(ledger.payments(2).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_saved_list_is_plain_json() -> Result<()> {
        let ledger = setup_memory_ledger();
        ledger.save_contracts(1, &[sample_contract(1, 7)]).await?;

        let raw = ledger
            .backend()
            .get(&ledger.contracts_key(1))
            .await?
            .unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        assert_eq!(value[0]["contractId"], 7);
        assert_eq!(value[0]["estado"], "ACTIVO");
        Ok(())
    }
}
