//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface to the payment ledger: slash
//! commands to register, sign and finalize contracts, confirm payments and
//! list pending and paid installments per property.

/// Discord command implementations (contract, payment, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    core::{Finalization, Generation, LedgerStore, PaymentUpdate, Upsert},
    errors::{Error, Result},
    models::ContractMeta,
    storage::SqliteStore,
};
use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
///
/// Commands run concurrently and the ledger does a full read-modify-write per
/// call, so every write goes through the methods below, which hold
/// `write_lock` for the whole ledger call. Reads use `ledger` directly.
pub struct BotData {
    /// Ledger backed by the bot's database
    pub ledger: LedgerStore<SqliteStore>,
    write_lock: Mutex<()>,
}

impl BotData {
    /// Creates a new `BotData` instance around the given ledger.
    #[must_use]
    pub fn new(ledger: LedgerStore<SqliteStore>) -> Self {
        Self {
            ledger,
            write_lock: Mutex::new(()),
        }
    }

    /// Stores contract metadata.
    pub async fn register_contract(&self, meta: ContractMeta) -> Result<Upsert> {
        let _guard = self.write_lock.lock().await;
        self.ledger.upsert_contract_meta(meta).await
    }

    /// Signs a contract and generates its installments.
    pub async fn sign_contract(&self, property_id: i64, contract_id: i64) -> Result<Generation> {
        let _guard = self.write_lock.lock().await;
        self.ledger
            .mark_contract_signed_and_generate_payments(property_id, contract_id)
            .await
    }

    /// Cancels a contract and drops its pending installments.
    pub async fn finalize_contract(
        &self,
        property_id: i64,
        contract_id: i64,
    ) -> Result<Finalization> {
        let _guard = self.write_lock.lock().await;
        self.ledger
            .on_contract_finalized(property_id, contract_id)
            .await
    }

    /// Marks an installment paid with a textual method.
    pub async fn confirm_payment(
        &self,
        property_id: i64,
        payment_id: &str,
        method: &str,
    ) -> Result<PaymentUpdate> {
        let _guard = self.write_lock.lock().await;
        self.ledger
            .confirm_payment(property_id, payment_id, method)
            .await
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ Ocurrió un error: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework around `ledger` and runs the Discord client
/// until it stops.
#[instrument(skip(token, ledger))]
pub async fn run_bot(token: String, ledger: LedgerStore<SqliteStore>) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::contract_register(),
                commands::contract_sign(),
                commands::contract_finalize(),
                commands::contract_status(),
                commands::pay(),
                commands::pending(),
                commands::history(),
                commands::summary(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(ledger))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;

    Ok(())
}

pub use commands::*;
pub use handlers::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::Mutation,
        models::PaymentStatus,
        test_utils::{sample_contract, setup_sqlite_ledger},
    };

    async fn setup_bot_data() -> Result<BotData> {
        Ok(BotData::new(setup_sqlite_ledger().await?))
    }

    #[tokio::test]
    async fn test_overlapping_confirmations_keep_both_payments() -> Result<()> {
        let data = setup_bot_data().await?;
        data.register_contract(sample_contract(1, 7)).await?;
        assert_eq!(data.sign_contract(1, 7).await?, Generation::Generated(3));

        let (first, second) = tokio::join!(
            data.confirm_payment(1, "7-1", "yape"),
            data.confirm_payment(1, "7-2", "plin"),
        );
        assert_eq!(first?.outcome, Mutation::Applied);
        assert_eq!(second?.outcome, Mutation::Applied);

        let payments = data.ledger.payments(1).await?;
        let paid: Vec<&str> = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Pagado)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(paid, vec!["7-1", "7-2"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_overlapping_register_and_finalize_are_serialised() -> Result<()> {
        let data = setup_bot_data().await?;
        data.register_contract(sample_contract(1, 7)).await?;
        data.sign_contract(1, 7).await?;

        let (registered, finalized) = tokio::join!(
            data.register_contract(sample_contract(1, 8)),
            data.finalize_contract(1, 7),
        );
        assert_eq!(registered?, Upsert::Inserted);
        assert_eq!(finalized?.removed_installments, 3);

        let contracts = data.ledger.contracts(1).await?;
        let ids: Vec<i64> = contracts.iter().map(|c| c.contract_id).collect();
        assert_eq!(ids, vec![7, 8]);
        Ok(())
    }
}
