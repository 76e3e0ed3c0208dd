//! Application settings loading from config.toml
//!
//! Every setting has a default, so the bot starts with no config file at all.
//! A file that exists but fails to parse is an error rather than a silent
//! fallback.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default namespace prefix for ledger storage keys.
pub const DEFAULT_STORAGE_PREFIX: &str = "habitora-v1";

/// Language used for installment period labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// `"enero de 2025"`
    #[default]
    Es,
    /// `"January 2025"`
    En,
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ledger behaviour
    pub ledger: LedgerSettings,
    /// Storage location
    pub database: DatabaseSettings,
}

/// Settings consumed by the ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Prefix of every storage key
    pub storage_prefix: String,
    /// Period label language
    pub locale: Locale,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            locale: Locale::default(),
        }
    }
}

/// Where the durable store lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SeaORM connection URL
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file, falling back to defaults when the file
/// does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        info!("No config file at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }

    debug!("Loading configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    parse_config(&contents)
}

/// Loads settings from the default location (./config.toml)
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [ledger]
            storage_prefix = "habitora-test"
            locale = "en"

            [database]
            url = "sqlite::memory:"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.ledger.storage_prefix, "habitora-test");
        assert_eq!(config.ledger.locale, Locale::En);
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[ledger]\nlocale = \"es\"\n").unwrap();
        assert_eq!(config.ledger.storage_prefix, DEFAULT_STORAGE_PREFIX);
        assert_eq!(config.ledger.locale, Locale::Es);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        let err = parse_config("[ledger]\nlocale = \"fr\"\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config("definitely/not/here/config.toml").unwrap();
        assert_eq!(config.ledger, LedgerSettings::default());
    }
}
