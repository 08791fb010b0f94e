use crate::models::SizingReport;

/// Render a sizing report as the labeled two-column table shown in chat.
/// All formatting decisions live here; the numeric semantics (integer pips,
/// 2-decimal money) are fixed upstream in the calculator.
pub fn render_table(report: &SizingReport, currency: &str) -> String {
    let symbol = currency_symbol(currency);
    let mut rows: Vec<(String, String)> = vec![
        ("Order Type".to_string(), report.order_type.to_string()),
        ("Symbol".to_string(), report.symbol.clone()),
        ("Entry".to_string(), format_price(report.entry_price)),
        (
            "Stop Loss".to_string(),
            format!("{} pips", report.stop_loss_pips),
        ),
    ];

    let split = report.take_profit_pips.len() > 1;
    for (i, pips) in report.take_profit_pips.iter().enumerate() {
        let label = format!("TP {}", i + 1);
        let value = if split && i > 0 {
            format!("{pips} pips (Split)")
        } else {
            format!("{pips} pips")
        };
        rows.push((label, value));
    }

    rows.push((
        "Risk Factor".to_string(),
        format!("{:.0}%", report.risk_factor * 100.0),
    ));
    rows.push((
        "Position Size".to_string(),
        format!("{:.2}", report.position_size),
    ));
    rows.push((
        "Potential Loss".to_string(),
        format!("{} {}", symbol, format_money(report.potential_loss)),
    ));

    for (i, profit) in report.target_profits.iter().enumerate() {
        let label = format!("TP {} Profit", i + 1);
        let value = if split && i > 0 {
            format!("{} {} (Split)", symbol, format_money(*profit))
        } else {
            format!("{} {}", symbol, format_money(*profit))
        };
        rows.push((label, value));
    }
    rows.push((
        "Total Potential Profit".to_string(),
        format!("{} {}", symbol, format_money(report.total_profit)),
    ));

    draw(&rows)
}

fn draw(rows: &[(String, String)]) -> String {
    const TITLE: &str = "Trade Information";

    let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    // Inner width spans both columns plus the middle separator.
    let inner = (key_width + 2) + 1 + (value_width + 2);
    let inner = inner.max(TITLE.len() + 2);
    let value_width = value_width + (inner - ((key_width + 2) + 1 + (value_width + 2)));

    let border = format!("+{}+", "-".repeat(inner));
    let divider = format!(
        "+{}+{}+",
        "-".repeat(key_width + 2),
        "-".repeat(value_width + 2)
    );

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format!("|{:^inner$}|", TITLE));
    out.push('\n');
    out.push_str(&divider);
    out.push('\n');
    for (key, value) in rows {
        out.push_str(&format!("| {key:<key_width$} | {value:<value_width$} |"));
        out.push('\n');
    }
    out.push_str(&divider);
    out
}

/// Prices keep up to five decimals with trailing zeros trimmed, so FX quotes
/// show full precision while metals stay compact.
fn format_price(price: f64) -> String {
    let s = format!("{price:.5}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Two decimals with thousands separators: 1150 -> "1,150.00".
fn format_money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac:02}")
}

fn currency_symbol(currency: &str) -> &str {
    match currency.to_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        _ => currency,
    }
}
