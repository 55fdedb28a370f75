/// Render a magnitude for display: "0" for absent, zero, or non-finite
/// input, one-decimal M/K above a million or a thousand, comma-grouped
/// integer otherwise.
pub fn format_number(value: Option<f64>) -> String {
    let num = match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => return "0".to_string(),
    };

    if num >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else {
        group_thousands(num.round() as i64)
    }
}

/// format_number over an exact count.
pub fn format_count(value: u64) -> String {
    format_number(Some(value as f64))
}

/// Comma-group an integer.
fn group_thousands(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    if negative {
        format!("-{out}")
    } else {
        out
    }
}
