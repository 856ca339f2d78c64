//! Fee assessment.
//!
//! DESIGN
//! ======
//! Fees debit through the withdrawal path so overdraft rules apply to them
//! the same way they apply to customer withdrawals. Each application leaves a
//! `FEE_APPLIED` audit event naming the fee and the resulting ledger row.

use sqlx::{PgPool, Row};

use crate::services::audit;
use crate::services::transaction::{self, LedgerEntry, TransactionError};

#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    #[error("fee type not found: {0}")]
    UnknownFee(String),
    #[error("fee amount must be positive")]
    NonPositiveAmount,
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FeeType {
    pub fee_type_id: i32,
    pub fee_name: String,
    pub default_amount_cents: i64,
}

/// All configured fee types, id-ordered.
pub async fn list_types(pool: &PgPool) -> Result<Vec<FeeType>, FeeError> {
    let rows = sqlx::query(
        "SELECT fee_type_id, fee_name, default_amount_cents
         FROM fee_types
         ORDER BY fee_type_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| FeeType {
            fee_type_id: r.get("fee_type_id"),
            fee_name: r.get("fee_name"),
            default_amount_cents: r.get("default_amount_cents"),
        })
        .collect())
}

fn fee_description(fee_name: &str, description: Option<&str>) -> String {
    match description {
        Some(d) if !d.trim().is_empty() => d.to_string(),
        _ => format!("Fee applied: {fee_name}"),
    }
}

/// Debit a fee from an account. The amount falls back to the fee type's
/// default when no override is given.
pub async fn apply_fee(
    pool: &PgPool,
    account_id: i64,
    fee_name: &str,
    override_amount_cents: Option<i64>,
    description: Option<&str>,
    acting_user_id: i64,
) -> Result<LedgerEntry, FeeError> {
    let default_amount: Option<i64> =
        sqlx::query_scalar("SELECT default_amount_cents FROM fee_types WHERE fee_name = $1")
            .bind(fee_name)
            .fetch_optional(pool)
            .await?;
    let Some(default_amount) = default_amount else {
        return Err(FeeError::UnknownFee(fee_name.to_string()));
    };

    let amount_cents = override_amount_cents.unwrap_or(default_amount);
    if amount_cents <= 0 {
        return Err(FeeError::NonPositiveAmount);
    }

    let desc = fee_description(fee_name, description);
    let entry = transaction::withdraw(
        pool,
        account_id,
        amount_cents,
        Some(&desc),
        Some(acting_user_id),
    )
    .await?;

    audit::record(
        pool,
        Some(acting_user_id),
        audit::FEE_APPLIED,
        "account",
        Some(account_id),
        serde_json::json!({
            "fee_name": fee_name,
            "amount_cents": amount_cents,
            "transaction_id": entry.transaction_id,
        }),
    )
    .await;

    Ok(entry)
}

#[cfg(test)]
#[path = "fee_test.rs"]
mod tests;
