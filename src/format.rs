//! Display formatting for metric values.

/// Placeholder shown for metrics with no value.
pub const EMPTY_VALUE: &str = "—";

/// Currency with thousands separators, e.g. `R$ 1,234.50`.
pub fn format_currency(value: Option<f64>, symbol: &str) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let sign = if v < 0.0 { "-" } else { "" };
            format!("{sign}{symbol} {}", group_thousands(&format!("{:.2}", v.abs())))
        }
        _ => EMPTY_VALUE.to_string(),
    }
}

/// Fixed two-decimal rendering.
pub fn format_decimal(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => EMPTY_VALUE.to_string(),
    }
}

pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// Insert `,` every three digits of the integer part of a plain number.
fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
