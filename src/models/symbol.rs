use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pip size for plain FX crosses. Metals carry their own entries.
const DEFAULT_PIP: f64 = 0.0001;

const MAJORS: &[&str] = &[
    "AUDCAD", "AUDCHF", "AUDJPY", "AUDNZD", "AUDUSD", "CADCHF", "CADJPY",
    "CHFJPY", "EURAUD", "EURCAD", "EURCHF", "EURGBP", "EURJPY", "EURNZD",
    "EURUSD", "GBPAUD", "GBPCAD", "GBPCHF", "GBPJPY", "GBPNZD", "GBPUSD",
    "NZDCAD", "NZDCHF", "NZDJPY", "NZDUSD", "USDCAD", "USDCHF", "USDJPY",
];

/// Allowlist of tradable tickers, each mapped to its pip size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolTable {
    pips: HashMap<String, f64>,
}

impl SymbolTable {
    pub fn standard() -> Self {
        let mut pips: HashMap<String, f64> = MAJORS
            .iter()
            .map(|s| (s.to_string(), DEFAULT_PIP))
            .collect();
        pips.insert("XAUUSD".to_string(), 0.1);
        pips.insert("XAGUSD".to_string(), 0.01);
        Self { pips }
    }

    /// Add entries from a comma-separated list of `SYMBOL` or `SYMBOL:PIP`
    /// items. Malformed pip values fall back to the FX default.
    pub fn extend_from_spec(&mut self, spec: &str) {
        for item in spec.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let (symbol, pip) = match item.split_once(':') {
                Some((sym, pip)) => (sym, pip.trim().parse().unwrap_or(DEFAULT_PIP)),
                None => (item, DEFAULT_PIP),
            };
            self.pips.insert(symbol.trim().to_uppercase(), pip);
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.pips.contains_key(symbol)
    }

    pub fn pip_size(&self, symbol: &str) -> f64 {
        self.pips.get(symbol).copied().unwrap_or(DEFAULT_PIP)
    }

    pub fn len(&self) -> usize {
        self.pips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pips.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_has_majors_and_metals() {
        let table = SymbolTable::standard();
        assert_eq!(table.len(), 30);
        assert!(table.contains("EURUSD"));
        assert!(table.contains("XAUUSD"));
        assert!(!table.contains("BTCUSD"));
    }

    #[test]
    fn pip_sizes_per_instrument() {
        let table = SymbolTable::standard();
        assert_eq!(table.pip_size("XAUUSD"), 0.1);
        assert_eq!(table.pip_size("XAGUSD"), 0.01);
        assert_eq!(table.pip_size("EURUSD"), 0.0001);
    }

    #[test]
    fn extend_accepts_plain_and_pip_annotated_entries() {
        let mut table = SymbolTable::standard();
        table.extend_from_spec("btcusd:1.0, EURSEK");
        assert!(table.contains("BTCUSD"));
        assert_eq!(table.pip_size("BTCUSD"), 1.0);
        assert_eq!(table.pip_size("EURSEK"), 0.0001);
    }
}
