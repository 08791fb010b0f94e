use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::TradeSignal;

/// Per-conversation state. One record per chat, created on /start and
/// cleared on restart or after a confirmed trade. Nothing here survives a
/// process restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub balance: f64,
    pub risk_factor: f64,
    pub language: String,
    pub currency: String,
    pub pending_signal: Option<TradeSignal>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(cfg: &Config) -> Self {
        Self {
            balance: cfg.account_balance,
            risk_factor: cfg.risk_factor,
            language: cfg.default_language.clone(),
            currency: cfg.default_currency.clone(),
            pending_signal: None,
            created_at: Utc::now(),
        }
    }

    /// Accept a new risk factor only when it is a usable fraction of the
    /// balance. Rejection keeps the previous value.
    pub fn set_risk_factor(&mut self, risk: f64) -> bool {
        if risk > 0.0 && risk <= 1.0 {
            self.risk_factor = risk;
            true
        } else {
            false
        }
    }

    pub fn clear_pending(&mut self) {
        self.pending_signal = None;
    }
}
