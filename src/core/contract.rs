//! Contract metadata operations.
//!
//! The ledger keeps only what it needs from a contract to derive and reconcile
//! its payment schedule. Metadata is written by the contract creation and
//! signature flows; nothing here validates it.

use super::ledger::{LedgerStore, Mutation, Upsert};
use crate::{
    errors::Result,
    models::{ContractMeta, ContractState},
    storage::KeyValueStore,
};
use tracing::{info, instrument};

impl<S: KeyValueStore> LedgerStore<S> {
    /// Inserts the contract into its property's list, or replaces the entry
    /// with the same contract id.
    #[instrument(skip(self, meta), fields(property_id = meta.property_id, contract_id = meta.contract_id))]
    pub async fn upsert_contract_meta(&self, meta: ContractMeta) -> Result<Upsert> {
        let property_id = meta.property_id;
        let mut list = self.contracts(property_id).await?;

        let outcome = match list.iter_mut().find(|c| c.contract_id == meta.contract_id) {
            Some(existing) => {
                *existing = meta;
                Upsert::Replaced
            }
            None => {
                list.push(meta);
                Upsert::Inserted
            }
        };

        self.save_contracts(property_id, &list).await?;
        Ok(outcome)
    }

    /// Records the tenant signature: `signed = true` and state `VIGENTE`.
    ///
    /// The state is overwritten whatever it was before, so signing a cancelled
    /// contract brings it back to `VIGENTE`.
    #[instrument(skip(self))]
    pub async fn mark_contract_signed(&self, property_id: i64, contract_id: i64) -> Result<Mutation> {
        let mut list = self.contracts(property_id).await?;
        let Some(contract) = list.iter_mut().find(|c| c.contract_id == contract_id) else {
            return Ok(Mutation::NotFound);
        };

        if contract.estado == ContractState::Cancelado {
            info!("Signing a cancelled contract; it becomes VIGENTE again");
        }
        contract.signed = true;
        contract.estado = ContractState::Vigente;

        self.save_contracts(property_id, &list).await?;
        Ok(Mutation::Applied)
    }

    /// Overwrites the contract state.
    #[instrument(skip(self))]
    pub async fn set_contract_state(
        &self,
        property_id: i64,
        contract_id: i64,
        estado: ContractState,
    ) -> Result<Mutation> {
        let mut list = self.contracts(property_id).await?;
        let Some(contract) = list.iter_mut().find(|c| c.contract_id == contract_id) else {
            return Ok(Mutation::NotFound);
        };

        contract.estado = estado;

        self.save_contracts(property_id, &list).await?;
        Ok(Mutation::Applied)
    }

    /// `false` when the contract is unknown.
    pub async fn is_contract_signed(&self, property_id: i64, contract_id: i64) -> Result<bool> {
        Ok(self
            .contracts(property_id)
            .await?
            .iter()
            .any(|c| c.contract_id == contract_id && c.signed))
    }

    /// Metadata of one contract, if recorded.
    pub async fn get_contract_meta(
        &self,
        property_id: i64,
        contract_id: i64,
    ) -> Result<Option<ContractMeta>> {
        Ok(self
            .contracts(property_id)
            .await?
            .into_iter()
            .find(|c| c.contract_id == contract_id))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{sample_contract, setup_memory_ledger};

    #[tokio::test]
    async fn test_upsert_inserts_then_replaces() -> Result<()> {
        let ledger = setup_memory_ledger();

        let outcome = ledger.upsert_contract_meta(sample_contract(1, 7)).await?;
        assert_eq!(outcome, Upsert::Inserted);

        let mut edited = sample_contract(1, 7);
        edited.tenant_name = "Ana María".to_string();
        edited.monthly_rent = 650.0;
        let outcome = ledger.upsert_contract_meta(edited.clone()).await?;
        assert_eq!(outcome, Upsert::Replaced);

        let contracts = ledger.contracts(1).await?;
        assert_eq!(contracts, vec![edited]);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_does_not_validate() -> Result<()> {
        let ledger = setup_memory_ledger();
        let mut odd = sample_contract(1, 8);
        odd.months = 0;
        odd.monthly_rent = -10.0;

        ledger.upsert_contract_meta(odd.clone()).await?;
        assert_eq!(ledger.get_contract_meta(1, 8).await?, Some(odd));
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_signed_sets_vigente() -> Result<()> {
        let ledger = setup_memory_ledger();
        ledger.upsert_contract_meta(sample_contract(1, 7)).await?;
        assert!(!ledger.is_contract_signed(1, 7).await?);

        let outcome = ledger.mark_contract_signed(1, 7).await?;
        assert_eq!(outcome, Mutation::Applied);

        let meta = ledger.get_contract_meta(1, 7).await?.unwrap();
        assert!(meta.signed);
        assert_eq!(meta.estado, ContractState::Vigente);
        assert!(ledger.is_contract_signed(1, 7).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_signed_revives_cancelled_contract() -> Result<()> {
        let ledger = setup_memory_ledger();
        ledger.upsert_contract_meta(sample_contract(1, 7)).await?;
        ledger
            .set_contract_state(1, 7, ContractState::Cancelado)
            .await?;

        ledger.mark_contract_signed(1, 7).await?;

        let meta = ledger.get_contract_meta(1, 7).await?.unwrap();
        assert_eq!(meta.estado, ContractState::Vigente);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_contract_is_not_an_error() -> Result<()> {
        let ledger = setup_memory_ledger();

        assert_eq!(ledger.mark_contract_signed(1, 99).await?, Mutation::NotFound);
        assert_eq!(
            ledger
                .set_contract_state(1, 99, ContractState::Cancelado)
                .await?,
            Mutation::NotFound
        );
        assert!(!ledger.is_contract_signed(1, 99).await?);
        assert_eq!(ledger.get_contract_meta(1, 99).await?, None);

        // Nothing was written for the misses
        assert!(ledger.backend().is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_state_leaves_signature_alone() -> Result<()> {
        let ledger = setup_memory_ledger();
        ledger.upsert_contract_meta(sample_contract(1, 7)).await?;

        ledger
            .set_contract_state(1, 7, ContractState::Cancelado)
            .await?;

        let meta = ledger.get_contract_meta(1, 7).await?.unwrap();
        assert_eq!(meta.estado, ContractState::Cancelado);
        assert!(!meta.signed);
        Ok(())
    }

    #[tokio::test]
    async fn test_contracts_are_scoped_by_property() -> Result<()> {
        let ledger = setup_memory_ledger();
        ledger.upsert_contract_meta(sample_contract(1, 7)).await?;

        assert!(ledger.contracts(2).await?.is_empty());
        assert_eq!(ledger.get_contract_meta(2, 7).await?, None);
        assert_eq!(ledger.mark_contract_signed(2, 7).await?, Mutation::NotFound);
        assert!(!ledger.get_contract_meta(1, 7).await?.unwrap().signed);
        Ok(())
    }
}
