//! Display formatting for asset prices, changes and market caps

use super::AssetRecord;

/// Shown in place of a number that failed to parse
pub const NOT_AVAILABLE: &str = "n/a";

/// Direction of the 24h price change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

/// Formats a USD price: 2 decimals, or 6 when the price is below one dollar
pub fn format_price(record: &AssetRecord) -> String {
    match record.price() {
        Some(price) => {
            let decimals = if price < 1.0 { 6 } else { 2 };
            format!("${}", group_thousands(price, decimals))
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Formats the 24h change as an absolute percentage plus its direction
pub fn format_change(record: &AssetRecord) -> (String, Option<ChangeDirection>) {
    match record.change_percent() {
        Some(change) => {
            let direction = if change >= 0.0 {
                ChangeDirection::Up
            } else {
                ChangeDirection::Down
            };
            (format!("{:.2}%", change.abs()), Some(direction))
        }
        None => (NOT_AVAILABLE.to_string(), None),
    }
}

/// Formats market cap in whole dollars
pub fn format_market_cap(record: &AssetRecord) -> String {
    match record.market_cap() {
        Some(cap) => format!("${}", group_thousands(cap, 0)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Renders `value` with `decimals` fractional digits and comma-separated thousands
fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}
