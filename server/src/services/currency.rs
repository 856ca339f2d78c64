//! Currency conversion over stored exchange rates.
//!
//! DESIGN
//! ======
//! Rates are stored as integer millionths (`rate_micros`), so conversion is
//! exact integer arithmetic with one explicit rounding step: half away from
//! zero, matching how statements round displayed amounts. The latest rate by
//! `effective_at` wins; converting a currency to itself is always 1.0.

use sqlx::PgPool;

pub const RATE_SCALE: i64 = 1_000_000;

#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    #[error("no exchange rate from {from} to {to}")]
    RateNotFound { from: String, to: String },
    #[error("conversion result out of range")]
    Overflow,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Latest stored rate for a currency pair, in millionths.
pub async fn get_exchange_rate(pool: &PgPool, from: &str, to: &str) -> Result<i64, CurrencyError> {
    if from.eq_ignore_ascii_case(to) {
        return Ok(RATE_SCALE);
    }

    let rate: Option<i64> = sqlx::query_scalar(
        "SELECT rate_micros FROM exchange_rates
         WHERE from_currency = $1 AND to_currency = $2
         ORDER BY effective_at DESC
         LIMIT 1",
    )
    .bind(from)
    .bind(to)
    .fetch_optional(pool)
    .await?;

    rate.ok_or_else(|| CurrencyError::RateNotFound { from: from.to_string(), to: to.to_string() })
}

/// Apply a micro-rate to an amount of cents, rounding half away from zero.
pub fn convert_cents(amount_cents: i64, rate_micros: i64) -> Result<i64, CurrencyError> {
    let numerator = i128::from(amount_cents) * i128::from(rate_micros);
    let scale = i128::from(RATE_SCALE);
    let quotient = numerator / scale;
    let remainder = numerator % scale;

    let rounded = if remainder.abs() * 2 >= scale {
        quotient + numerator.signum()
    } else {
        quotient
    };

    i64::try_from(rounded).map_err(|_| CurrencyError::Overflow)
}

/// Convenience: look up the pair's rate and convert in one call.
pub async fn convert(
    pool: &PgPool,
    amount_cents: i64,
    from: &str,
    to: &str,
) -> Result<(i64, i64), CurrencyError> {
    let rate_micros = get_exchange_rate(pool, from, to).await?;
    let converted = convert_cents(amount_cents, rate_micros)?;
    Ok((rate_micros, converted))
}

#[cfg(test)]
#[path = "currency_test.rs"]
mod tests;
