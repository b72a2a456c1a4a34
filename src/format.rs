//! Display formatting for report cells.
//!
//! Formatting is strictly the final stage: every function here consumes
//! numeric values and produces strings, and nothing downstream does
//! arithmetic on the result.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rendered in place of a percentage whose denominator was zero.
pub const UNDEFINED_RATIO: &str = "N/A";

fn group_int_digits(int_part: &str) -> String {
    // Insert commas every 3 digits, preserving any leading zeros.
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

/// Format a dollar amount: `$` prefix, thousands separators, zero decimal
/// places, sign ahead of the symbol (`-$1,235`).
pub fn dollars(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().normalize().to_string();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_int_digits(&digits));
    out
}

fn pad_fraction_to_dp(s: &str, dp: u32) -> String {
    if dp == 0 {
        return s
            .split_once('.')
            .map(|(i, _)| i.to_string())
            .unwrap_or_else(|| s.to_string());
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };

    let mut out = String::with_capacity(int_part.len() + 1 + dp as usize);
    out.push_str(int_part);
    out.push('.');

    let mut written = 0usize;
    for ch in frac_part.chars().take(dp as usize) {
        out.push(ch);
        written += 1;
    }
    while written < dp as usize {
        out.push('0');
        written += 1;
    }

    out
}

/// Format a percentage with a fixed number of decimal places and a trailing
/// `%`. The undefined-ratio sentinel (`None`) renders as [`UNDEFINED_RATIO`],
/// never as `nan%`.
pub fn percent(value: Option<Decimal>, dp: u32) -> String {
    match value {
        Some(v) => {
            let rounded = v.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            let s = pad_fraction_to_dp(&rounded.normalize().to_string(), dp);
            format!("{s}%")
        }
        None => UNDEFINED_RATIO.to_string(),
    }
}
