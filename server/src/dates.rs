//! `YYYY-MM-DD` query-parameter validation.

use time::Date;
use time::macros::format_description;

/// Parse a calendar date in `YYYY-MM-DD` form. Rejects impossible dates such
/// as `2025-02-30`, not just malformed strings.
#[must_use]
pub fn parse_iso_date(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
#[path = "dates_test.rs"]
mod tests;
