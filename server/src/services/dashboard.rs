//! Back-office dashboard summary.
//!
//! DESIGN
//! ======
//! Read-only aggregation over customers, accounts and transactions. The
//! balance sum covers active accounts only and is a naive sum across
//! currencies; a multi-currency deployment would convert to a base currency
//! first. Only database errors can occur here, so queries surface
//! `sqlx::Error` directly instead of a dedicated error enum.

use serde::Serialize;
use sqlx::{PgPool, Row};

const RECENT_TRANSACTION_COUNT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct RecentTransaction {
    pub transaction_id: i64,
    pub transaction_timestamp: String,
    pub account_number: String,
    pub transaction_type: String,
    pub amount_cents: i64,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_customers: i64,
    pub total_accounts: i64,
    pub active_balance_sum_cents: i64,
    pub transactions_last_24h: i64,
    pub recent_transactions: Vec<RecentTransaction>,
}

pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, sqlx::Error> {
    let total_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;
    let total_accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(pool)
        .await?;
    let active_balance_sum_cents: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(a.balance_cents), 0)::bigint
         FROM accounts a
         JOIN account_status_types s ON s.status_id = a.status_id
         WHERE s.status_name = 'active'",
    )
    .fetch_one(pool)
    .await?;
    let transactions_last_24h: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions
         WHERE transaction_timestamp >= now() - INTERVAL '24 hours'",
    )
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query(
        r#"SELECT t.transaction_id,
                  to_char(t.transaction_timestamp AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
                      AS transaction_timestamp,
                  a.account_number,
                  tt.type_name,
                  t.amount_cents,
                  t.description
           FROM transactions t
           JOIN accounts a ON a.account_id = t.account_id
           JOIN transaction_types tt ON tt.transaction_type_id = t.transaction_type_id
           ORDER BY t.transaction_timestamp DESC, t.transaction_id DESC
           LIMIT $1"#,
    )
    .bind(RECENT_TRANSACTION_COUNT)
    .fetch_all(pool)
    .await?;

    let recent_transactions = rows
        .into_iter()
        .map(|row| RecentTransaction {
            transaction_id: row.get("transaction_id"),
            transaction_timestamp: row.get("transaction_timestamp"),
            account_number: row.get("account_number"),
            transaction_type: row.get("type_name"),
            amount_cents: row.get("amount_cents"),
            description: row.get("description"),
        })
        .collect();

    Ok(DashboardSummary {
        total_customers,
        total_accounts,
        active_balance_sum_cents,
        transactions_last_24h,
        recent_transactions,
    })
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
