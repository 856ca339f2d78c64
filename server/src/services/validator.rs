//! Accounting integrity checks.
//!
//! DESIGN
//! ======
//! Debits are stored as negative amounts, so a fully offset ledger sums to
//! zero and each account's stored balance equals the sum of its entries.
//! These checks report drift without repairing anything.

use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("account not found: {0}")]
    AccountNotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct LedgerCheck {
    pub is_balanced: bool,
    pub total_sum_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct AccountCheck {
    pub account_id: i64,
    pub matches: bool,
    pub reported_balance_cents: i64,
    pub transactions_sum_cents: i64,
}

/// An empty ledger counts as balanced.
pub async fn check_ledger(pool: &PgPool) -> Result<LedgerCheck, ValidatorError> {
    let total_sum_cents: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(amount_cents), 0)::bigint FROM transactions")
            .fetch_one(pool)
            .await?;
    Ok(LedgerCheck {
        is_balanced: total_sum_cents == 0,
        total_sum_cents,
    })
}

pub async fn check_account(pool: &PgPool, account_id: i64) -> Result<AccountCheck, ValidatorError> {
    let reported_balance_cents: i64 =
        sqlx::query_scalar("SELECT balance_cents FROM accounts WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(pool)
            .await?
            .ok_or(ValidatorError::AccountNotFound(account_id))?;

    let transactions_sum_cents: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_cents), 0)::bigint FROM transactions WHERE account_id = $1",
    )
    .bind(account_id)
    .fetch_one(pool)
    .await?;

    Ok(AccountCheck {
        account_id,
        matches: reported_balance_cents == transactions_sum_cents,
        reported_balance_cents,
        transactions_sum_cents,
    })
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
