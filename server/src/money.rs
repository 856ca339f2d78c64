//! Monetary formatting helpers.
//!
//! DESIGN
//! ======
//! Every amount in storage and on the wire is an `i64` count of minor units
//! (cents), so ledger arithmetic never rounds. Formatting to a decimal string
//! happens only at display boundaries such as CSV export.

use std::fmt::Write;

/// Render cents as a decimal dollar string, e.g. `-1250` -> `"-12.50"`.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let minor = cents.unsigned_abs();
    let mut out = String::with_capacity(8);
    if cents < 0 {
        out.push('-');
    }
    let _ = write!(out, "{}.{:02}", minor / 100, minor % 100);
    out
}

/// Parse a decimal dollar string into cents. Accepts an optional sign and at
/// most two fraction digits; anything else is rejected.
#[must_use]
pub fn parse_cents(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2 {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut fraction_value: i64 = if fraction.is_empty() { 0 } else { fraction.parse().ok()? };
    if fraction.len() == 1 {
        fraction_value *= 10;
    }

    let cents = whole_value.checked_mul(100)?.checked_add(fraction_value)?;
    Some(if negative { -cents } else { cents })
}

#[cfg(test)]
#[path = "money_test.rs"]
mod tests;
