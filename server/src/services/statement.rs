//! Account statements with running balances.
//!
//! DESIGN
//! ======
//! The starting balance is the sum of every ledger entry strictly before the
//! period, so a statement is reproducible at any time regardless of the
//! account's current denormalized balance. Lines are ordered ascending and
//! split into debit/credit columns with a running balance per line.

use sqlx::{PgPool, Row};

use crate::dates;

#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error("account not found: {0}")]
    AccountNotFound(i64),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("start date after end date")]
    InvertedRange,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One statement line. Exactly one of `debit_cents`/`credit_cents` is set,
/// both as positive magnitudes.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatementLine {
    pub transaction_id: i64,
    pub transaction_timestamp: String,
    pub transaction_type: String,
    pub description: Option<String>,
    pub debit_cents: Option<i64>,
    pub credit_cents: Option<i64>,
    pub running_balance_cents: i64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Statement {
    pub account_id: i64,
    pub account_number: String,
    pub account_type: String,
    pub currency: String,
    pub customer_name: String,
    pub period_start: String,
    pub period_end: String,
    pub starting_balance_cents: i64,
    pub ending_balance_cents: i64,
    pub lines: Vec<StatementLine>,
}

pub(crate) fn validate_period(start: &str, end: &str) -> Result<(), StatementError> {
    let start_date =
        dates::parse_iso_date(start).ok_or_else(|| StatementError::InvalidDate(start.to_string()))?;
    let end_date =
        dates::parse_iso_date(end).ok_or_else(|| StatementError::InvalidDate(end.to_string()))?;
    if start_date > end_date {
        return Err(StatementError::InvertedRange);
    }
    Ok(())
}

/// Build a statement for an inclusive `YYYY-MM-DD` period.
pub async fn build(
    pool: &PgPool,
    account_id: i64,
    period_start: &str,
    period_end: &str,
) -> Result<Statement, StatementError> {
    validate_period(period_start, period_end)?;

    let account = sqlx::query(
        "SELECT a.account_number, a.account_type, a.currency,
                c.first_name || ' ' || c.last_name AS customer_name
         FROM accounts a
         JOIN customers c ON c.customer_id = a.customer_id
         WHERE a.account_id = $1",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?
    .ok_or(StatementError::AccountNotFound(account_id))?;

    let starting_balance_cents: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_cents), 0)::bigint FROM transactions
         WHERE account_id = $1 AND transaction_timestamp < $2::date",
    )
    .bind(account_id)
    .bind(period_start)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query(
        r#"SELECT t.transaction_id,
                  to_char(t.transaction_timestamp AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
                      AS transaction_timestamp,
                  tt.type_name AS transaction_type,
                  t.description,
                  t.amount_cents
           FROM transactions t
           JOIN transaction_types tt ON tt.transaction_type_id = t.transaction_type_id
           WHERE t.account_id = $1
             AND t.transaction_timestamp >= $2::date
             AND t.transaction_timestamp < ($3::date + INTERVAL '1 day')
           ORDER BY t.transaction_timestamp ASC, t.transaction_id ASC"#,
    )
    .bind(account_id)
    .bind(period_start)
    .bind(period_end)
    .fetch_all(pool)
    .await?;

    let mut running = starting_balance_cents;
    let lines: Vec<StatementLine> = rows
        .into_iter()
        .map(|r| {
            let amount_cents: i64 = r.get("amount_cents");
            running += amount_cents;
            StatementLine {
                transaction_id: r.get("transaction_id"),
                transaction_timestamp: r.get("transaction_timestamp"),
                transaction_type: r.get("transaction_type"),
                description: r.get("description"),
                debit_cents: (amount_cents < 0).then(|| -amount_cents),
                credit_cents: (amount_cents >= 0).then_some(amount_cents),
                running_balance_cents: running,
            }
        })
        .collect();

    Ok(Statement {
        account_id,
        account_number: account.get("account_number"),
        account_type: account.get("account_type"),
        currency: account.get("currency"),
        customer_name: account.get("customer_name"),
        period_start: period_start.to_string(),
        period_end: period_end.to_string(),
        starting_balance_cents,
        ending_balance_cents: running,
        lines,
    })
}

#[cfg(test)]
#[path = "statement_test.rs"]
mod tests;
