//! Ledger operations: deposits, withdrawals, transfers, ACH and wire legs.
//!
//! DESIGN
//! ======
//! Every money movement runs inside one database transaction that locks the
//! touched account rows `FOR UPDATE` before reading balances, so concurrent
//! operations serialize per account. Transfers lock both rows in ascending
//! account-id order to avoid deadlocks between opposing transfers. Debits are
//! stored as negative amounts, which keeps the whole-ledger sum at zero.
//!
//! ERROR HANDLING
//! ==============
//! Business rejections (inactive account, insufficient funds, self-transfer)
//! are typed variants the routes map to 400s. Overdraft usage is not an
//! error; it is allowed up to the account's limit and leaves an audit event.

use sqlx::{PgConnection, PgPool, QueryBuilder, Row};

use crate::pagination::{Page, Paginated};
use crate::services::audit;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 200;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("account not found: {0}")]
    AccountNotFound(i64),
    #[error("transaction not found: {0}")]
    NotFound(i64),
    #[error("account is not active")]
    AccountNotActive,
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("amount out of range")]
    AmountOutOfRange,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("cannot transfer to the same account")]
    SelfTransfer,
    #[error("unknown transaction type: {0}")]
    UnknownType(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One ledger row as exposed over the API.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LedgerEntry {
    pub transaction_id: i64,
    pub account_id: i64,
    pub transaction_type: String,
    pub amount_cents: i64,
    pub transaction_timestamp: String,
    pub description: Option<String>,
    pub related_account_id: Option<i64>,
}

/// Both legs of a completed transfer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TransferResult {
    pub withdrawal: LedgerEntry,
    pub deposit: LedgerEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchDirection {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireDirection {
    Incoming,
    Outgoing,
}

// =============================================================================
// LOCKED BALANCE PLUMBING
// =============================================================================

struct LockedAccount {
    balance_cents: i64,
    overdraft_limit_cents: i64,
    status_name: String,
}

async fn lock_account(
    conn: &mut PgConnection,
    account_id: i64,
) -> Result<LockedAccount, TransactionError> {
    let row = sqlx::query(
        "SELECT a.balance_cents, a.overdraft_limit_cents, s.status_name
         FROM accounts a
         JOIN account_status_types s ON s.status_id = a.status_id
         WHERE a.account_id = $1
         FOR UPDATE OF a",
    )
    .bind(account_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(TransactionError::AccountNotFound(account_id))?;

    Ok(LockedAccount {
        balance_cents: row.get("balance_cents"),
        overdraft_limit_cents: row.get("overdraft_limit_cents"),
        status_name: row.get("status_name"),
    })
}

async fn type_id(conn: &mut PgConnection, type_name: &str) -> Result<i32, TransactionError> {
    sqlx::query_scalar("SELECT transaction_type_id FROM transaction_types WHERE type_name = $1")
        .bind(type_name)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| TransactionError::UnknownType(type_name.to_string()))
}

async fn insert_entry(
    conn: &mut PgConnection,
    account_id: i64,
    type_name: &str,
    amount_cents: i64,
    description: Option<&str>,
    related_account_id: Option<i64>,
) -> Result<LedgerEntry, TransactionError> {
    let tx_type_id = type_id(conn, type_name).await?;
    let row = sqlx::query(
        r#"INSERT INTO transactions
               (account_id, transaction_type_id, amount_cents, description, related_account_id)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING
               transaction_id,
               to_char(transaction_timestamp AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
                   AS transaction_timestamp"#,
    )
    .bind(account_id)
    .bind(tx_type_id)
    .bind(amount_cents)
    .bind(description)
    .bind(related_account_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(LedgerEntry {
        transaction_id: row.get("transaction_id"),
        account_id,
        transaction_type: type_name.to_string(),
        amount_cents,
        transaction_timestamp: row.get("transaction_timestamp"),
        description: description.map(ToString::to_string),
        related_account_id,
    })
}

async fn set_balance(
    conn: &mut PgConnection,
    account_id: i64,
    new_balance_cents: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE accounts SET balance_cents = $1, updated_at = now() WHERE account_id = $2",
    )
    .bind(new_balance_cents)
    .bind(account_id)
    .execute(conn)
    .await?;
    Ok(())
}

async fn record_overdraft_use(pool: &PgPool, account_id: i64, post_balance_cents: i64, acting_user_id: Option<i64>) {
    audit::record(
        pool,
        acting_user_id,
        audit::OVERDRAFT_USED,
        "account",
        Some(account_id),
        serde_json::json!({ "post_balance_cents": post_balance_cents }),
    )
    .await;
}

// =============================================================================
// CREDIT / DEBIT CORES
// =============================================================================

async fn credit(
    pool: &PgPool,
    account_id: i64,
    amount_cents: i64,
    type_name: &str,
    description: Option<&str>,
) -> Result<LedgerEntry, TransactionError> {
    if amount_cents <= 0 {
        return Err(TransactionError::NonPositiveAmount);
    }

    let mut tx = pool.begin().await?;
    let account = lock_account(&mut tx, account_id).await?;
    if account.status_name != "active" {
        return Err(TransactionError::AccountNotActive);
    }

    let new_balance = account
        .balance_cents
        .checked_add(amount_cents)
        .ok_or(TransactionError::AmountOutOfRange)?;
    let entry = insert_entry(&mut tx, account_id, type_name, amount_cents, description, None).await?;
    set_balance(&mut tx, account_id, new_balance).await?;
    tx.commit().await?;

    Ok(entry)
}

async fn debit(
    pool: &PgPool,
    account_id: i64,
    amount_cents: i64,
    type_name: &str,
    description: Option<&str>,
    acting_user_id: Option<i64>,
) -> Result<LedgerEntry, TransactionError> {
    if amount_cents <= 0 {
        return Err(TransactionError::NonPositiveAmount);
    }

    let mut tx = pool.begin().await?;
    let account = lock_account(&mut tx, account_id).await?;
    if account.status_name != "active" {
        return Err(TransactionError::AccountNotActive);
    }

    let new_balance = account
        .balance_cents
        .checked_sub(amount_cents)
        .ok_or(TransactionError::AmountOutOfRange)?;
    if new_balance < -account.overdraft_limit_cents {
        return Err(TransactionError::InsufficientFunds);
    }

    let entry =
        insert_entry(&mut tx, account_id, type_name, -amount_cents, description, None).await?;
    set_balance(&mut tx, account_id, new_balance).await?;
    tx.commit().await?;

    if new_balance < 0 {
        record_overdraft_use(pool, account_id, new_balance, acting_user_id).await;
    }

    Ok(entry)
}

// =============================================================================
// PUBLIC OPERATIONS
// =============================================================================

/// Deposit into an active account.
pub async fn deposit(
    pool: &PgPool,
    account_id: i64,
    amount_cents: i64,
    description: Option<&str>,
) -> Result<LedgerEntry, TransactionError> {
    credit(pool, account_id, amount_cents, "deposit", description).await
}

/// Withdraw from an active account, honoring its overdraft limit.
pub async fn withdraw(
    pool: &PgPool,
    account_id: i64,
    amount_cents: i64,
    description: Option<&str>,
    acting_user_id: Option<i64>,
) -> Result<LedgerEntry, TransactionError> {
    debit(pool, account_id, amount_cents, "withdrawal", description, acting_user_id).await
}

/// Move money between two accounts: a withdrawal leg and a deposit leg in one
/// database transaction, cross-referenced through `related_account_id`.
pub async fn transfer(
    pool: &PgPool,
    from_account_id: i64,
    to_account_id: i64,
    amount_cents: i64,
    description: Option<&str>,
    acting_user_id: Option<i64>,
) -> Result<TransferResult, TransactionError> {
    if from_account_id == to_account_id {
        return Err(TransactionError::SelfTransfer);
    }
    if amount_cents <= 0 {
        return Err(TransactionError::NonPositiveAmount);
    }

    let mut tx = pool.begin().await?;

    // Ascending lock order keeps two opposing transfers from deadlocking.
    let (first, second) = if from_account_id < to_account_id {
        (from_account_id, to_account_id)
    } else {
        (to_account_id, from_account_id)
    };
    let first_lock = lock_account(&mut tx, first).await?;
    let second_lock = lock_account(&mut tx, second).await?;
    let (from, to) = if from_account_id == first {
        (first_lock, second_lock)
    } else {
        (second_lock, first_lock)
    };

    if from.status_name != "active" || to.status_name != "active" {
        return Err(TransactionError::AccountNotActive);
    }

    let from_balance = from
        .balance_cents
        .checked_sub(amount_cents)
        .ok_or(TransactionError::AmountOutOfRange)?;
    if from_balance < -from.overdraft_limit_cents {
        return Err(TransactionError::InsufficientFunds);
    }
    let to_balance = to
        .balance_cents
        .checked_add(amount_cents)
        .ok_or(TransactionError::AmountOutOfRange)?;

    let withdrawal = insert_entry(
        &mut tx,
        from_account_id,
        "transfer",
        -amount_cents,
        description,
        Some(to_account_id),
    )
    .await?;
    let deposit = insert_entry(
        &mut tx,
        to_account_id,
        "transfer",
        amount_cents,
        description,
        Some(from_account_id),
    )
    .await?;

    set_balance(&mut tx, from_account_id, from_balance).await?;
    set_balance(&mut tx, to_account_id, to_balance).await?;
    tx.commit().await?;

    if from_balance < 0 {
        record_overdraft_use(pool, from_account_id, from_balance, acting_user_id).await;
    }

    Ok(TransferResult { withdrawal, deposit })
}

fn scheme_description(prefix: &str, description: Option<&str>) -> String {
    match description {
        Some(d) if !d.trim().is_empty() => format!("{prefix}: {d}"),
        _ => prefix.to_string(),
    }
}

/// Post an ACH leg. Credits behave like deposits, debits like withdrawals.
pub async fn ach(
    pool: &PgPool,
    account_id: i64,
    amount_cents: i64,
    direction: AchDirection,
    description: Option<&str>,
    acting_user_id: Option<i64>,
) -> Result<LedgerEntry, TransactionError> {
    match direction {
        AchDirection::Credit => {
            let desc = scheme_description("ACH credit", description);
            credit(pool, account_id, amount_cents, "ach_credit", Some(&desc)).await
        }
        AchDirection::Debit => {
            let desc = scheme_description("ACH debit", description);
            debit(pool, account_id, amount_cents, "ach_debit", Some(&desc), acting_user_id).await
        }
    }
}

/// Post a wire leg. Incoming wires credit, outgoing wires debit.
pub async fn wire(
    pool: &PgPool,
    account_id: i64,
    amount_cents: i64,
    direction: WireDirection,
    description: Option<&str>,
    acting_user_id: Option<i64>,
) -> Result<LedgerEntry, TransactionError> {
    match direction {
        WireDirection::Incoming => {
            let desc = scheme_description("Wire incoming", description);
            credit(pool, account_id, amount_cents, "wire_incoming", Some(&desc)).await
        }
        WireDirection::Outgoing => {
            let desc = scheme_description("Wire outgoing", description);
            debit(pool, account_id, amount_cents, "wire_outgoing", Some(&desc), acting_user_id)
                .await
        }
    }
}

// =============================================================================
// QUERIES
// =============================================================================

const ENTRY_COLUMNS: &str = r#"
    t.transaction_id,
    t.account_id,
    tt.type_name AS transaction_type,
    t.amount_cents,
    to_char(t.transaction_timestamp AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
        AS transaction_timestamp,
    t.description,
    t.related_account_id
"#;

fn entry_from_row(r: &sqlx::postgres::PgRow) -> LedgerEntry {
    LedgerEntry {
        transaction_id: r.get("transaction_id"),
        account_id: r.get("account_id"),
        transaction_type: r.get("transaction_type"),
        amount_cents: r.get("amount_cents"),
        transaction_timestamp: r.get("transaction_timestamp"),
        description: r.get("description"),
        related_account_id: r.get("related_account_id"),
    }
}

/// Clamp a requested history page size into the allowed window.
#[must_use]
pub fn clamp_history_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT)
}

/// Recent ledger entries for one account, newest first.
pub async fn history(
    pool: &PgPool,
    account_id: i64,
    limit: Option<i64>,
    offset: i64,
) -> Result<Vec<LedgerEntry>, TransactionError> {
    let rows = sqlx::query(&format!(
        "SELECT {ENTRY_COLUMNS}
         FROM transactions t
         JOIN transaction_types tt ON tt.transaction_type_id = t.transaction_type_id
         WHERE t.account_id = $1
         ORDER BY t.transaction_timestamp DESC, t.transaction_id DESC
         LIMIT $2 OFFSET $3"
    ))
    .bind(account_id)
    .bind(clamp_history_limit(limit))
    .bind(offset.max(0))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(entry_from_row).collect())
}

/// Optional filters for the admin transaction listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilters {
    pub account_id: Option<i64>,
    pub type_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn push_transaction_filters(
    builder: &mut QueryBuilder<'_, sqlx::Postgres>,
    filters: &TransactionFilters,
) {
    builder.push(" WHERE TRUE");
    if let Some(account_id) = filters.account_id {
        builder.push(" AND t.account_id = ");
        builder.push_bind(account_id);
    }
    if let Some(type_name) = &filters.type_name {
        builder.push(" AND tt.type_name = ");
        builder.push_bind(type_name.clone());
    }
    if let Some(start) = &filters.start_date {
        builder.push(" AND t.transaction_timestamp >= ");
        builder.push_bind(start.clone());
        builder.push("::date");
    }
    if let Some(end) = &filters.end_date {
        builder.push(" AND t.transaction_timestamp < (");
        builder.push_bind(end.clone());
        builder.push("::date + INTERVAL '1 day')");
    }
}

/// List ledger entries for the back-office, newest first, paginated.
pub async fn list(
    pool: &PgPool,
    filters: &TransactionFilters,
    page: Page,
) -> Result<Paginated<LedgerEntry>, TransactionError> {
    const FROM: &str = "
        FROM transactions t
        JOIN transaction_types tt ON tt.transaction_type_id = t.transaction_type_id";

    let mut count_builder = QueryBuilder::new(format!("SELECT COUNT(*) {FROM}"));
    push_transaction_filters(&mut count_builder, filters);
    let total_items: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut builder = QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} {FROM}"));
    push_transaction_filters(&mut builder, filters);
    builder.push(" ORDER BY t.transaction_timestamp DESC, t.transaction_id DESC LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());

    let rows = builder.build().fetch_all(pool).await?;
    Ok(Paginated::new(rows.iter().map(entry_from_row).collect(), page, total_items))
}

/// Ledger entry joined with account and owner context for the back-office.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AdminTransactionDetail {
    #[serde(flatten)]
    pub entry: LedgerEntry,
    pub account_number: String,
    pub customer_name: String,
    pub related_account_number: Option<String>,
}

/// Fetch one ledger entry with its account, owner and counterparty context.
pub async fn detail(pool: &PgPool, transaction_id: i64) -> Result<AdminTransactionDetail, TransactionError> {
    let row = sqlx::query(&format!(
        "SELECT {ENTRY_COLUMNS},
                a.account_number,
                c.first_name || ' ' || c.last_name AS customer_name,
                ra.account_number AS related_account_number
         FROM transactions t
         JOIN transaction_types tt ON tt.transaction_type_id = t.transaction_type_id
         JOIN accounts a ON a.account_id = t.account_id
         JOIN customers c ON c.customer_id = a.customer_id
         LEFT JOIN accounts ra ON ra.account_id = t.related_account_id
         WHERE t.transaction_id = $1"
    ))
    .bind(transaction_id)
    .fetch_optional(pool)
    .await?
    .ok_or(TransactionError::NotFound(transaction_id))?;

    Ok(AdminTransactionDetail {
        entry: entry_from_row(&row),
        account_number: row.get("account_number"),
        customer_name: row.get("customer_name"),
        related_account_number: row.get("related_account_number"),
    })
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
