use serde::{Deserialize, Serialize};

use crate::models::OrderType;

/// A fully parsed trade signal. Only produced whole: if any required field
/// cannot be extracted the parser returns an error instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub order_type: OrderType,
    pub symbol: String,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    #[serde(default)]
    pub take_profit_2: Option<f64>,
}

impl TradeSignal {
    pub fn take_profits(&self) -> Vec<f64> {
        match self.take_profit_2 {
            Some(tp2) => vec![self.take_profit_1, tp2],
            None => vec![self.take_profit_1],
        }
    }
}

/// Derived sizing plan for one signal. Recomputed fresh on every request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingReport {
    pub order_type: OrderType,
    pub symbol: String,
    pub entry_price: f64,
    pub stop_loss_pips: u32,
    pub take_profit_pips: Vec<u32>,
    pub risk_factor: f64,
    pub position_size: f64,
    pub potential_loss: f64,
    pub target_profits: Vec<f64>,
    pub total_profit: f64,
}
