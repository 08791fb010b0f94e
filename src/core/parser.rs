use thiserror::Error;
use tracing::warn;

use crate::models::{OrderType, SymbolTable, TradeSignal};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("first line carries neither LONG nor SHORT")]
    UnknownDirection,
    #[error("symbol {0} is not in the allowlist")]
    UnknownSymbol(String),
    #[error("signal is missing a stop loss or first take profit")]
    MissingField,
    #[error("signal is empty")]
    Empty,
}

/// Parse a free-text trade signal into a [`TradeSignal`].
///
/// The first line decides the direction (contains "LONG" or "SHORT") and
/// carries the symbol as its trailing token. Later lines contribute up to two
/// take profits ("TP") and one stop loss ("SL"); the first numeric value on
/// the line wins, tolerating emoji, labels and `,` as a decimal separator.
/// Parsing is all-or-nothing: any violation yields an error, never a partial
/// signal.
pub fn parse_signal(text: &str, symbols: &SymbolTable) -> Result<TradeSignal, ParseError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let first = *lines.first().ok_or(ParseError::Empty)?;

    let order_type = if first.contains("LONG") {
        OrderType::Buy
    } else if first.contains("SHORT") {
        OrderType::Sell
    } else {
        return Err(ParseError::UnknownDirection);
    };

    let symbol = first
        .split_whitespace()
        .last()
        .ok_or(ParseError::UnknownDirection)?
        .to_uppercase();
    if !symbols.contains(&symbol) {
        return Err(ParseError::UnknownSymbol(symbol));
    }

    let mut stop_loss = None;
    let mut take_profit_1 = None;
    let mut take_profit_2 = None;

    for &line in &lines[1..] {
        if line.contains("TP") {
            if let Some(value) = extract_price(line) {
                if take_profit_1.is_none() {
                    take_profit_1 = Some(value);
                } else if take_profit_2.is_none() {
                    take_profit_2 = Some(value);
                } else {
                    // Two targets maximum; extra TP lines are dropped
                    // instead of clobbering the second target.
                    warn!(line, "ignoring take profit beyond the second");
                }
            }
        }
        if line.contains("SL") {
            if let Some(value) = extract_price(line) {
                stop_loss = Some(value);
            }
        }
    }

    match (stop_loss, take_profit_1) {
        (Some(stop_loss), Some(take_profit_1)) => Ok(TradeSignal {
            order_type,
            symbol,
            stop_loss,
            take_profit_1,
            take_profit_2,
        }),
        _ => Err(ParseError::MissingField),
    }
}

/// Extract the price from a TP/SL line: the first number containing a decimal
/// separator (`.` or `,`), or the trailing bare integer when no decimal
/// number exists. "🚀 TP 1 : 1,12845" must yield 1.12845, not the label's
/// "1", and "TP 1 : 150" must yield 150 since prices trail their labels.
fn extract_price(line: &str) -> Option<f64> {
    let mut last_integer = None;
    for run in numeric_runs(line) {
        let normalized = run.replace(',', ".");
        if normalized.contains('.') {
            if let Ok(value) = normalized.parse::<f64>() {
                return Some(value);
            }
        } else {
            last_integer = normalized.parse::<f64>().ok().or(last_integer);
        }
    }
    last_integer
}

/// Maximal runs of digits with at most one interior decimal separator.
fn numeric_runs(line: &str) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut seen_separator = false;

    for c in line.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if (c == '.' || c == ',')
            && !seen_separator
            && current.chars().last().is_some_and(|p| p.is_ascii_digit())
        {
            current.push(c);
            seen_separator = true;
        } else {
            flush_run(&mut runs, &mut current, &mut seen_separator);
        }
    }
    flush_run(&mut runs, &mut current, &mut seen_separator);
    runs
}

fn flush_run(runs: &mut Vec<String>, current: &mut String, seen_separator: &mut bool) {
    if current.is_empty() {
        return;
    }
    // A trailing separator belongs to the sentence, not the number.
    if current.ends_with('.') || current.ends_with(',') {
        current.pop();
    }
    if !current.is_empty() {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
    *seen_separator = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable::standard()
    }

    #[test]
    fn parses_two_target_long_signal() {
        let text = "LONG EURUSD\nTP 1 : 1.12845\nTP 2 : 1.13345\nSL : 1.11845";
        let signal = parse_signal(text, &table()).unwrap();
        assert_eq!(signal.order_type, OrderType::Buy);
        assert_eq!(signal.symbol, "EURUSD");
        assert_eq!(signal.stop_loss, 1.11845);
        assert_eq!(signal.take_profit_1, 1.12845);
        assert_eq!(signal.take_profit_2, Some(1.13345));
    }

    #[test]
    fn parses_short_direction() {
        let text = "SHORT GBPJPY\nTP 1 : 185.20\nSL : 186.40";
        let signal = parse_signal(text, &table()).unwrap();
        assert_eq!(signal.order_type, OrderType::Sell);
        assert_eq!(signal.symbol, "GBPJPY");
    }

    #[test]
    fn rejects_missing_direction() {
        let text = "BUY EURUSD\nTP 1 : 1.12845\nSL : 1.11845";
        assert_eq!(
            parse_signal(text, &table()),
            Err(ParseError::UnknownDirection)
        );
    }

    #[test]
    fn rejects_unlisted_symbol_despite_valid_levels() {
        let text = "LONG DOGEUSD\nTP 1 : 1.12845\nSL : 1.11845";
        assert_eq!(
            parse_signal(text, &table()),
            Err(ParseError::UnknownSymbol("DOGEUSD".to_string()))
        );
    }

    #[test]
    fn rejects_missing_stop_loss() {
        let text = "LONG EURUSD\nTP 1 : 1.12845";
        assert_eq!(parse_signal(text, &table()), Err(ParseError::MissingField));
    }

    #[test]
    fn rejects_missing_first_take_profit() {
        let text = "LONG EURUSD\nSL : 1.11845";
        assert_eq!(parse_signal(text, &table()), Err(ParseError::MissingField));
    }

    #[test]
    fn single_target_leaves_second_absent() {
        let text = "LONG EURUSD\nTP 1 : 1.12845\nSL : 1.11845";
        let signal = parse_signal(text, &table()).unwrap();
        assert_eq!(signal.take_profit_2, None);
    }

    #[test]
    fn comma_and_dot_decimal_separators_agree() {
        let a = parse_signal("LONG EURUSD\nTP 1 : 1,12345\nSL : 1,11845", &table()).unwrap();
        let b = parse_signal("LONG EURUSD\nTP 1 : 1.12345\nSL : 1.11845", &table()).unwrap();
        assert_eq!(a.take_profit_1, 1.12345);
        assert_eq!(a, b);
    }

    #[test]
    fn price_wins_over_label_index() {
        let text = "📈 LONG EURUSD\n🚀 TP 1 : 1.12845\n💣 SL : 1.11845";
        let signal = parse_signal(text, &table()).unwrap();
        assert_eq!(signal.take_profit_1, 1.12845);
    }

    #[test]
    fn integer_price_accepted_when_no_decimal_present() {
        let text = "LONG USDJPY\nTP 1 : 150\nSL : 148";
        let signal = parse_signal(text, &table()).unwrap();
        assert_eq!(signal.take_profit_1, 150.0);
        assert_eq!(signal.stop_loss, 148.0);
    }

    #[test]
    fn third_take_profit_line_is_ignored() {
        let text = "LONG EURUSD\nTP 1 : 1.12845\nTP 2 : 1.13345\nTP 3 : 1.14000\nSL : 1.11845";
        let signal = parse_signal(text, &table()).unwrap();
        assert_eq!(signal.take_profit_2, Some(1.13345));
    }

    #[test]
    fn symbol_is_case_normalized() {
        let text = "LONG eurusd\nTP 1 : 1.12845\nSL : 1.11845";
        let signal = parse_signal(text, &table()).unwrap();
        assert_eq!(signal.symbol, "EURUSD");
    }

    #[test]
    fn empty_signal_rejected() {
        assert_eq!(parse_signal("", &table()), Err(ParseError::Empty));
    }

    #[test]
    fn sentence_trailing_dot_not_part_of_price() {
        assert_eq!(extract_price("SL at 1.11845."), Some(1.11845));
    }
}
