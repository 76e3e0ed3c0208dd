//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Habitora - Pagos**\n\
        Todos los comandos reciben el `property_id` de la propiedad.\n\n\
        **Contratos**\n\
        • `/contract_register` - Registra o actualiza los datos de un contrato.\n\
        • `/contract_sign <contract_id>` - Marca el contrato como firmado y genera sus cuotas.\n\
        • `/contract_finalize <contract_id>` - Cancela el contrato y elimina sus cuotas pendientes.\n\
        • `/contract_status <contract_id>` - Muestra el estado del contrato.\n\n\
        **Pagos**\n\
        • `/pay <payment_id> <method>` - Confirma el pago de una cuota.\n\
        • `/pending [tenant]` - Lista las cuotas pendientes.\n\
        • `/history [tenant]` - Lista los pagos registrados.\n\
        • `/summary [tenant]` - Totales pendientes, vencidos y pagados.\n\n\
        **Utilidades**\n\
        • `/ping` - Comprueba que el bot responde.\n\
        • `/help` - Muestra esta ayuda.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
