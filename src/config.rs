use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_ENTRY_OFFSET;
use crate::models::SymbolTable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Telegram
    pub telegram_token: String,
    pub poll_timeout_secs: u64,

    // Account defaults for a fresh session
    pub account_balance: f64,
    pub risk_factor: f64,
    pub default_language: String,
    pub default_currency: String,

    // Sizing
    pub entry_offset: f64,
    pub symbols: SymbolTable,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let mut symbols = SymbolTable::standard();
        if let Ok(extra) = std::env::var("EXTRA_SYMBOLS") {
            symbols.extend_from_spec(&extra);
        }

        Config {
            telegram_token: env("TELEGRAM_TOKEN", ""),
            poll_timeout_secs: env("POLL_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            account_balance: env("ACCOUNT_BALANCE", "10000").parse().unwrap_or(10_000.0),
            risk_factor: env("RISK_FACTOR", "0.01").parse().unwrap_or(0.01),
            default_language: env("DEFAULT_LANGUAGE", "English"),
            default_currency: env("DEFAULT_CURRENCY", "USD"),
            entry_offset: env("ENTRY_OFFSET", "0.001")
                .parse()
                .unwrap_or(DEFAULT_ENTRY_OFFSET),
            symbols,
            log_level: env("LOG_LEVEL", "info"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            telegram_token: String::new(),
            poll_timeout_secs: 30,
            account_balance: 10_000.0,
            risk_factor: 0.01,
            default_language: "English".to_string(),
            default_currency: "USD".to_string(),
            entry_offset: DEFAULT_ENTRY_OFFSET,
            symbols: SymbolTable::standard(),
            log_level: "info".to_string(),
        }
    }
}
