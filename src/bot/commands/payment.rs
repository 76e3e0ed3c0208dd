//! Payment Discord commands - `pay`, `pending`, `history` and `summary`.

use crate::{core::report::format_payment_table, models::PaymentInstallment};
use std::slice;

/// Most rows shown per listing.
const MAX_ROWS: usize = 15;
/// Discord rejects messages longer than this many characters.
const MESSAGE_LIMIT: usize = 2000;
/// Room left at the end of a listing for the "… y N más" footer.
const FOOTER_RESERVE: usize = 32;
/// Rows are cut to this many characters; names and room codes are free text.
const MAX_LINE_CHARS: usize = 200;

/// Renders as many installments as fit in one Discord message, up to
/// [`MAX_ROWS`], noting how many were left out.
fn render_listing(title: &str, payments: &[PaymentInstallment]) -> String {
    let mut message = format!("**{title}**\n");
    if payments.is_empty() {
        message.push_str("No hay registros.");
        return message;
    }

    let budget = MESSAGE_LIMIT - FOOTER_RESERVE;
    let mut used = message.chars().count();
    let mut shown = 0;
    for payment in payments.iter().take(MAX_ROWS) {
        let line = truncate_line(&format_payment_table(slice::from_ref(payment)));
        let len = line.chars().count();
        if used + len > budget {
            break;
        }
        message.push_str(&line);
        used += len;
        shown += 1;
    }
    if payments.len() > shown {
        message.push_str(&format!("… y {} más", payments.len() - shown));
    }
    message
}

/// Cuts a table row to [`MAX_LINE_CHARS`], keeping its trailing newline.
fn truncate_line(line: &str) -> String {
    let row = line.trim_end_matches('\n');
    if row.chars().count() <= MAX_LINE_CHARS {
        return line.to_string();
    }
    let mut cut: String = row.chars().take(MAX_LINE_CHARS - 1).collect();
    cut.push_str("…\n");
    cut
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::render_listing;
    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::report::format_summary,
        errors::{Error, Result},
    };
    use chrono::Utc;

    /// Confirms payment of an installment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Property ID"] property_id: i64,
        #[description = "Installment ID, e.g. 7-1"] payment_id: String,
        #[description = "Payment method"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        method: String,
    ) -> Result<()> {
        let update = match ctx
            .data()
            .confirm_payment(property_id, payment_id.trim(), &method)
            .await
        {
            Ok(update) => update,
            Err(Error::InvalidPaymentMethod { value }) => {
                ctx.say(format!(
                    "❌ Método '{value}' no válido. Usa EFECTIVO, YAPE, PLIN o TRANSFERENCIA."
                ))
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if !update.outcome.is_applied() {
            ctx.say(format!(
                "❌ No existe la cuota '{payment_id}' en la propiedad {property_id}. Usa `/pending` para verlas."
            ))
            .await?;
            return Ok(());
        }

        let remaining = update.payments.iter().filter(|p| p.is_pending()).count();
        ctx.say(format!(
            "✅ Pago de la cuota {payment_id} confirmado. Quedan {remaining} cuotas pendientes en la propiedad."
        ))
        .await?;
        Ok(())
    }

    /// Lists unpaid installments, earliest due first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pending(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Property ID"] property_id: i64,
        #[description = "Only this tenant"] tenant: Option<String>,
    ) -> Result<()> {
        let report = ctx
            .data()
            .ledger
            .generate_property_report(property_id, tenant.as_deref(), Utc::now().date_naive())
            .await?;

        ctx.say(render_listing("Cuotas pendientes", &report.pending))
            .await?;
        Ok(())
    }

    /// Lists paid installments, latest payment first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Property ID"] property_id: i64,
        #[description = "Only this tenant"] tenant: Option<String>,
    ) -> Result<()> {
        let report = ctx
            .data()
            .ledger
            .generate_property_report(property_id, tenant.as_deref(), Utc::now().date_naive())
            .await?;

        ctx.say(render_listing("Historial de pagos", &report.history))
            .await?;
        Ok(())
    }

    /// Shows pending, overdue and paid totals.
    #[poise::command(slash_command, prefix_command)]
    pub async fn summary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Property ID"] property_id: i64,
        #[description = "Only this tenant"] tenant: Option<String>,
    ) -> Result<()> {
        let report = ctx
            .data()
            .ledger
            .generate_property_report(property_id, tenant.as_deref(), Utc::now().date_naive())
            .await?;

        ctx.say(format!(
            "**Resumen de la propiedad {property_id}**\n{}",
            format_summary(&report.summary)
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::report::pending_payments,
        errors::Result,
        test_utils::{sample_contract, setup_memory_ledger},
    };

    fn row_count(message: &str) -> usize {
        message.lines().filter(|l| l.starts_with('`')).count()
    }

    #[test]
    fn test_render_empty_listing() {
        assert_eq!(
            render_listing("Cuotas pendientes", &[]),
            "**Cuotas pendientes**\nNo hay registros."
        );
    }

    #[tokio::test]
    async fn test_render_listing_caps_rows() -> Result<()> {
        let ledger = setup_memory_ledger();
        let mut long = sample_contract(1, 7);
        long.months = 20;
        ledger.upsert_contract_meta(long).await?;
        ledger.generate_payments_for_contract(1, 7).await?;

        let pending = pending_payments(&ledger.payments(1).await?);
        let message = render_listing("Cuotas pendientes", &pending);

        assert_eq!(row_count(&message), MAX_ROWS);
        assert!(message.ends_with("… y 5 más"));
        Ok(())
    }

    #[tokio::test]
    async fn test_render_listing_fits_discord_limit_with_long_names() -> Result<()> {
        let ledger = setup_memory_ledger();
        let mut long = sample_contract(1, 7);
        long.months = 20;
        long.tenant_name = "María Fernanda de los Ángeles Quispe Huamán y Familia".repeat(2);
        long.room_code = "Edificio Norte - Piso 12 - Habitación 1204-B".to_string();
        ledger.upsert_contract_meta(long).await?;
        ledger.generate_payments_for_contract(1, 7).await?;

        let pending = pending_payments(&ledger.payments(1).await?);
        let message = render_listing("Cuotas pendientes", &pending);

        assert!(message.chars().count() <= MESSAGE_LIMIT);
        let rows = row_count(&message);
        assert!(rows > 0 && rows < MAX_ROWS);
        assert!(message.ends_with(&format!("… y {} más", 20 - rows)));
        Ok(())
    }

    #[tokio::test]
    async fn test_render_listing_cuts_oversized_rows() -> Result<()> {
        let ledger = setup_memory_ledger();
        let mut huge = sample_contract(1, 7);
        huge.tenant_name = "x".repeat(5000);
        ledger.upsert_contract_meta(huge).await?;
        ledger.generate_payments_for_contract(1, 7).await?;

        let pending = pending_payments(&ledger.payments(1).await?);
        let message = render_listing("Cuotas pendientes", &pending);

        assert!(message.chars().count() <= MESSAGE_LIMIT);
        assert_eq!(row_count(&message), 3);
        assert!(message.lines().skip(1).all(|l| l.chars().count() <= MAX_LINE_CHARS));
        assert!(message.lines().nth(1).is_some_and(|l| l.ends_with('…')));
        Ok(())
    }
}
