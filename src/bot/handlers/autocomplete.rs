//! Autocomplete handlers for Discord slash command parameters.

use crate::{bot::BotData, errors::Error, models::PaymentMethod};

/// Suggests payment methods whose label contains the typed text.
pub async fn autocomplete_payment_method(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_methods(partial)
}

fn matching_methods(partial: &str) -> Vec<String> {
    let partial_upper = partial.trim().to_uppercase();
    PaymentMethod::ALL
        .into_iter()
        .map(PaymentMethod::as_str)
        .filter(|label| label.contains(&partial_upper))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_methods() {
        assert_eq!(matching_methods("").len(), 4);
        assert_eq!(matching_methods("ya"), vec!["YAPE".to_string()]);
        assert_eq!(matching_methods("IN"), vec!["PLIN".to_string()]);
        assert!(matching_methods("cheque").is_empty());
    }
}
