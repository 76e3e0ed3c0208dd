//! Payment installment operations.
//!
//! Installments are derived once per contract from its start date, term and
//! rent, then only ever marked paid or, when the contract is finalized, dropped
//! if still pending. Tenant name, room code and amount are copied into each
//! installment at generation time and are not refreshed when the contract is
//! edited later, so paid history keeps the values it was charged with.

use super::{
    ledger::{Finalization, Generation, LedgerStore, Mutation, PaymentUpdate},
    schedule,
};
use crate::{
    errors::Result,
    models::{ContractState, PaymentInstallment, PaymentMethod, PaymentStatus},
    storage::KeyValueStore,
};
use chrono::{NaiveDate, Utc};
use tracing::{info, instrument, warn};

impl<S: KeyValueStore> LedgerStore<S> {
    /// Appends the monthly installments of a contract to its property's list.
    ///
    /// Does nothing if the contract metadata is missing or if any installment
    /// of the contract already exists. The second check means a schedule is
    /// never rebuilt, even after the contract's term or rent changes.
    #[instrument(skip(self))]
    pub async fn generate_payments_for_contract(
        &self,
        property_id: i64,
        contract_id: i64,
    ) -> Result<Generation> {
        let Some(meta) = self.get_contract_meta(property_id, contract_id).await? else {
            return Ok(Generation::ContractNotFound);
        };

        let mut payments = self.payments(property_id).await?;
        if payments.iter().any(|p| p.contract_id == contract_id) {
            return Ok(Generation::AlreadyScheduled);
        }

        let due_dates = schedule::due_dates(meta.start_date, meta.months);
        if due_dates.len() != usize::try_from(meta.months.max(0)).unwrap_or_default() {
            warn!(
                months = meta.months,
                generated = due_dates.len(),
                "Schedule truncated at the end of the supported calendar"
            );
        }

        let locale = self.settings().locale;
        let generated = due_dates.len();
        payments.extend(
            due_dates
                .into_iter()
                .zip(1..)
                .map(|(due_date, index)| PaymentInstallment {
                    id: PaymentInstallment::make_id(contract_id, index),
                    contract_id,
                    property_id,
                    tenant_name: meta.tenant_name.clone(),
                    room_code: meta.room_code.clone(),
                    period_label: schedule::period_label(due_date, locale),
                    due_date,
                    amount: meta.monthly_rent,
                    status: PaymentStatus::Pendiente,
                    method: None,
                    payment_date: None,
                }),
        );

        self.save_payments(property_id, &payments).await?;
        info!(generated, "Generated payment schedule");
        Ok(Generation::Generated(generated))
    }

    /// Marks an installment paid today (UTC) and returns the property's list.
    pub async fn mark_payment_as_paid(
        &self,
        property_id: i64,
        payment_id: &str,
        method: PaymentMethod,
    ) -> Result<PaymentUpdate> {
        self.mark_payment_as_paid_on(property_id, payment_id, method, Utc::now().date_naive())
            .await
    }

    /// Marks an installment paid on `payment_date`.
    ///
    /// An unknown id leaves storage untouched and returns the list as loaded.
    #[instrument(skip(self))]
    pub async fn mark_payment_as_paid_on(
        &self,
        property_id: i64,
        payment_id: &str,
        method: PaymentMethod,
        payment_date: NaiveDate,
    ) -> Result<PaymentUpdate> {
        let mut payments = self.payments(property_id).await?;

        let Some(payment) = payments.iter_mut().find(|p| p.id == payment_id) else {
            return Ok(PaymentUpdate {
                outcome: Mutation::NotFound,
                payments,
            });
        };

        payment.status = PaymentStatus::Pagado;
        payment.method = Some(method);
        payment.payment_date = Some(payment_date);

        self.save_payments(property_id, &payments).await?;
        info!("Payment registered");
        Ok(PaymentUpdate {
            outcome: Mutation::Applied,
            payments,
        })
    }

    /// Cancels a contract and drops its pending installments.
    ///
    /// Paid installments stay in the list as payment history. Pending ones are
    /// removed even when no metadata exists for the contract.
    #[instrument(skip(self))]
    pub async fn on_contract_finalized(
        &self,
        property_id: i64,
        contract_id: i64,
    ) -> Result<Finalization> {
        let contract = self
            .set_contract_state(property_id, contract_id, ContractState::Cancelado)
            .await?;

        let mut payments = self.payments(property_id).await?;
        let before = payments.len();
        payments.retain(|p| !(p.contract_id == contract_id && p.is_pending()));
        let removed_installments = before - payments.len();

        self.save_payments(property_id, &payments).await?;
        info!(removed_installments, "Contract finalized");
        Ok(Finalization {
            contract,
            removed_installments,
        })
    }

    /// Signs the contract, then derives its schedule.
    ///
    /// The two steps are separate writes; if the contract is unknown both are
    /// no-ops.
    pub async fn mark_contract_signed_and_generate_payments(
        &self,
        property_id: i64,
        contract_id: i64,
    ) -> Result<Generation> {
        self.mark_contract_signed(property_id, contract_id).await?;
        self.generate_payments_for_contract(property_id, contract_id)
            .await
    }

    /// Marks a payment paid from a textual method such as `"yape"`.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::InvalidPaymentMethod`] without touching
    /// storage when `method` is not a known method.
    pub async fn confirm_payment(
        &self,
        property_id: i64,
        payment_id: &str,
        method: &str,
    ) -> Result<PaymentUpdate> {
        let method: PaymentMethod = method.parse()?;
        self.mark_payment_as_paid(property_id, payment_id, method)
            .await
    }
}
