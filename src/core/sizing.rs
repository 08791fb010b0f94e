use thiserror::Error;

use crate::models::{SizingReport, SymbolTable, TradeSignal};

/// Entry convention: entry is derived from the stop loss rather than taken
/// as input. Overridable through config.
pub const DEFAULT_ENTRY_OFFSET: f64 = 0.001;

/// One standard lot moves the account by $10 per pip.
const PIP_VALUE_PER_LOT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    #[error("stop loss equals entry price; pip distance is zero")]
    ZeroStopDistance,
    #[error("risk factor must be in (0, 1]")]
    InvalidRiskFactor,
}

/// Compute the risk-adjusted sizing plan for a parsed signal.
///
/// Pure function of its inputs. Assumes the signal already passed symbol
/// validation; the risk factor is checked again because a degenerate value
/// here would produce a nonsense plan.
pub fn compute_sizing(
    signal: &TradeSignal,
    symbols: &SymbolTable,
    balance: f64,
    risk_factor: f64,
    entry_offset: f64,
) -> Result<SizingReport, SizingError> {
    if !(risk_factor > 0.0 && risk_factor <= 1.0) {
        return Err(SizingError::InvalidRiskFactor);
    }

    let pip = symbols.pip_size(&signal.symbol);
    let entry_price = signal.stop_loss + entry_offset;

    let stop_loss_pips = pip_distance(signal.stop_loss, entry_price, pip);
    if stop_loss_pips == 0 {
        return Err(SizingError::ZeroStopDistance);
    }

    // Risk amount per pip, converted to lots and floored to 2dp so the
    // realized loss can never exceed the configured risk.
    let risk_amount = balance * risk_factor;
    let position_size =
        ((risk_amount / stop_loss_pips as f64) / PIP_VALUE_PER_LOT * 100.0).floor() / 100.0;

    let targets = signal.take_profits();
    let take_profit_pips: Vec<u32> = targets
        .iter()
        .map(|tp| pip_distance(*tp, entry_price, pip))
        .collect();

    let potential_loss = round2(position_size * PIP_VALUE_PER_LOT * stop_loss_pips as f64);

    // Multiple targets split the position evenly.
    let split = 1.0 / targets.len() as f64;
    let target_profits: Vec<f64> = take_profit_pips
        .iter()
        .map(|&pips| round2(position_size * PIP_VALUE_PER_LOT * split * pips as f64))
        .collect();
    let total_profit = round2(target_profits.iter().sum());

    Ok(SizingReport {
        order_type: signal.order_type,
        symbol: signal.symbol.clone(),
        entry_price,
        stop_loss_pips,
        take_profit_pips,
        risk_factor,
        position_size,
        potential_loss,
        target_profits,
        total_profit,
    })
}

fn pip_distance(price: f64, entry: f64, pip: f64) -> u32 {
    ((price - entry).abs() / pip).round() as u32
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
