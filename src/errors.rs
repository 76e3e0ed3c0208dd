//! Unified error types for the ledger.
//!
//! A missing contract or payment is never an error here: ledger operations
//! report those through outcome values. The variants below cover storage,
//! configuration and caller-input failures only.

use thiserror::Error;

/// Every error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The durable storage backend failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A ledger list could not be serialized for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Textual payment method did not name a known method
    #[error("Unknown payment method: '{value}'")]
    InvalidPaymentMethod {
        /// The rejected input
        value: String,
    },

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing or not unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Discord framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
