use chrono::{DateTime, Utc};

/// Dollars with two decimals, or six below one cent so tiny costs stay visible.
pub fn format_usd(amount: f64) -> String {
    if amount != 0.0 && amount.abs() < 0.01 {
        format!("${:.6}", amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Capacity units with K/M suffixes, e.g. "1.5M" or "12.3K".
pub fn format_units(units: f64) -> String {
    let abs = units.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", units / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", units / 1_000.0)
    } else {
        format!("{:.2}", units)
    }
}

/// Period in the largest whole unit: "10d", "6h", "5m", or "45s".
pub fn format_period(secs: i32) -> String {
    if secs > 0 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs > 0 && secs % 3_600 == 0 {
        format!("{}h", secs / 3_600)
    } else if secs > 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}
