//! Contract Discord commands - register, sign, finalize and status.
//!
//! The ledger accepts whatever metadata it is given, so input checks live here.

/// Longest contract the bot will register. Signing materialises one
/// installment per month, so the count has to stay small.
pub const MAX_CONTRACT_MONTHS: i32 = 120;

/// Checks the numeric contract terms, returning the reply for the first
/// violation.
fn validate_terms(months: i32, monthly_rent: f64) -> Option<String> {
    if months < 1 {
        return Some("❌ El contrato debe tener al menos un mes".to_string());
    }
    if months > MAX_CONTRACT_MONTHS {
        return Some(format!(
            "❌ El contrato no puede superar {MAX_CONTRACT_MONTHS} meses"
        ));
    }
    if !monthly_rent.is_finite() || monthly_rent < 0.0 {
        return Some("❌ La renta mensual debe ser un número no negativo".to_string());
    }
    None
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]
    #![allow(clippy::too_many_arguments)]

    use super::validate_terms;
    use crate::{
        bot::BotData,
        core::{Generation, Upsert, report::format_amount, schedule::format_human_date},
        errors::{Error, Result},
        models::{ContractMeta, ContractState},
    };
    use chrono::NaiveDate;

    /// Registers a contract (or overwrites its data) so its payments can be tracked.
    #[poise::command(slash_command, prefix_command)]
    pub async fn contract_register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Property ID"] property_id: i64,
        #[description = "Contract ID"] contract_id: i64,
        #[description = "Tenant ID"] tenant_id: i64,
        #[description = "Tenant name"] tenant_name: String,
        #[description = "Room ID"] room_id: i64,
        #[description = "Room code"] room_code: String,
        #[description = "First due date (YYYY-MM-DD)"] start_date: String,
        #[description = "Number of monthly installments"] months: i32,
        #[description = "Monthly rent"] monthly_rent: f64,
        #[description = "Contract end date (YYYY-MM-DD)"] end_date: Option<String>,
    ) -> Result<()> {
        let Ok(start) = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d") else {
            ctx.say(format!("❌ Fecha inválida '{start_date}': usa el formato AAAA-MM-DD"))
                .await?;
            return Ok(());
        };
        let end = match end_date.as_deref().map(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")) {
            None => None,
            Some(Ok(d)) => Some(d),
            Some(Err(_)) => {
                ctx.say("❌ Fecha de fin inválida: usa el formato AAAA-MM-DD")
                    .await?;
                return Ok(());
            }
        };
        if let Some(reply) = validate_terms(months, monthly_rent) {
            ctx.say(reply).await?;
            return Ok(());
        }

        let meta = ContractMeta {
            contract_id,
            property_id,
            tenant_id,
            tenant_name,
            room_id,
            room_code,
            start_date: start,
            end_date: end,
            months,
            monthly_rent,
            signed: false,
            estado: ContractState::Activo,
        };

        let outcome = ctx.data().register_contract(meta).await?;
        let verb = match outcome {
            Upsert::Inserted => "registrado",
            Upsert::Replaced => "actualizado",
        };
        ctx.say(format!("✅ Contrato {contract_id} {verb} en la propiedad {property_id}"))
            .await?;
        Ok(())
    }

    /// Marks a contract as signed and generates its monthly installments.
    #[poise::command(slash_command, prefix_command)]
    pub async fn contract_sign(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Property ID"] property_id: i64,
        #[description = "Contract ID"] contract_id: i64,
    ) -> Result<()> {
        let outcome = ctx.data().sign_contract(property_id, contract_id).await?;

        let reply = match outcome {
            Generation::Generated(count) => {
                format!("✅ Contrato {contract_id} firmado. Se generaron {count} cuotas.")
            }
            Generation::AlreadyScheduled => {
                format!("✅ Contrato {contract_id} firmado. Sus cuotas ya existían.")
            }
            Generation::ContractNotFound => format!(
                "❌ El contrato {contract_id} no está registrado. Usa `/contract_register` primero."
            ),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Cancels a contract, dropping its pending installments and keeping paid ones.
    #[poise::command(slash_command, prefix_command)]
    pub async fn contract_finalize(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Property ID"] property_id: i64,
        #[description = "Contract ID"] contract_id: i64,
    ) -> Result<()> {
        let outcome = ctx
            .data()
            .finalize_contract(property_id, contract_id)
            .await?;

        let mut reply = format!(
            "✅ Contrato {contract_id} finalizado. Cuotas pendientes eliminadas: {}",
            outcome.removed_installments
        );
        if !outcome.contract.is_applied() {
            reply.push_str("\n⚠️ No había datos registrados para este contrato.");
        }
        ctx.say(reply).await?;
        Ok(())
    }

    /// Shows the recorded data and state of a contract.
    #[poise::command(slash_command, prefix_command)]
    pub async fn contract_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Property ID"] property_id: i64,
        #[description = "Contract ID"] contract_id: i64,
    ) -> Result<()> {
        let Some(meta) = ctx
            .data()
            .ledger
            .get_contract_meta(property_id, contract_id)
            .await?
        else {
            ctx.say(format!("❌ El contrato {contract_id} no está registrado."))
                .await?;
            return Ok(());
        };

        let signed = if meta.signed { "sí" } else { "no" };
        ctx.say(format!(
            "**Contrato {}** ({})\nInquilino: {}\nHabitación: {}\nInicio: {} | {} meses | {} al mes\nFirmado: {signed}",
            meta.contract_id,
            meta.estado,
            meta.tenant_name,
            meta.room_code,
            format_human_date(meta.start_date),
            meta.months,
            format_amount(meta.monthly_rent),
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

    #[test]
    fn test_month_count_is_bounded() {
        assert!(validate_terms(0, 500.0).is_some());
        assert!(validate_terms(-3, 500.0).is_some());
        assert!(validate_terms(MAX_CONTRACT_MONTHS + 1, 500.0).is_some());
        assert!(validate_terms(i32::MAX, 500.0).is_some());

        assert_eq!(validate_terms(1, 500.0), None);
        assert_eq!(validate_terms(MAX_CONTRACT_MONTHS, 500.0), None);
    }

    #[test]
    fn test_rent_must_be_finite_and_non_negative() {
        assert!(validate_terms(12, -1.0).is_some());
        assert!(validate_terms(12, f64::NAN).is_some());
        assert!(validate_terms(12, f64::INFINITY).is_some());
        assert_eq!(validate_terms(12, 0.0), None);
    }
}
