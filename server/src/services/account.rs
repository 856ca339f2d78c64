//! Account lifecycle and balance bookkeeping.
//!
//! DESIGN
//! ======
//! Balances are denormalized onto the account row and updated in the same
//! transaction as the ledger insert (see the transaction service). Account
//! numbers are random 10-digit strings checked for uniqueness at generation
//! time. Status names are resolved through the lookup table so the set can
//! grow without code changes.

use rand::Rng;
use sqlx::{PgConnection, PgPool, QueryBuilder, Row};

use crate::pagination::{Page, Paginated};
use crate::services::audit;

const ACCOUNT_TYPES: [&str; 3] = ["checking", "savings", "credit"];
const MAX_NUMBER_ATTEMPTS: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("account not found: {0}")]
    NotFound(i64),
    #[error("customer not found: {0}")]
    CustomerNotFound(i64),
    #[error("invalid account type: {0}")]
    InvalidType(String),
    #[error("unknown account status: {0}")]
    UnknownStatus(String),
    #[error("cannot close an account with a non-zero balance")]
    NonZeroBalanceClose,
    #[error("overdraft limit cannot be negative")]
    NegativeOverdraftLimit,
    #[error("could not allocate a unique account number")]
    NumberSpaceExhausted,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Account {
    pub account_id: i64,
    pub customer_id: i64,
    pub account_number: String,
    pub account_type: String,
    pub balance_cents: i64,
    pub currency: String,
    pub status_name: String,
    pub overdraft_limit_cents: i64,
    pub opened_at: String,
    pub updated_at: String,
}

const ACCOUNT_COLUMNS: &str = r#"
    a.account_id,
    a.customer_id,
    a.account_number,
    a.account_type,
    a.balance_cents,
    a.currency,
    s.status_name,
    a.overdraft_limit_cents,
    to_char(a.opened_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS opened_at,
    to_char(a.updated_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
"#;

fn account_from_row(r: &sqlx::postgres::PgRow) -> Account {
    Account {
        account_id: r.get("account_id"),
        customer_id: r.get("customer_id"),
        account_number: r.get("account_number"),
        account_type: r.get("account_type"),
        balance_cents: r.get("balance_cents"),
        currency: r.get("currency"),
        status_name: r.get("status_name"),
        overdraft_limit_cents: r.get("overdraft_limit_cents"),
        opened_at: r.get("opened_at"),
        updated_at: r.get("updated_at"),
    }
}

pub(crate) fn random_account_number() -> String {
    let n: u64 = rand::rng().random_range(1_000_000_000..10_000_000_000);
    n.to_string()
}

/// Allocate an account number not yet present in the table.
pub(crate) async fn unique_account_number(
    conn: &mut PgConnection,
) -> Result<String, AccountError> {
    for _ in 0..MAX_NUMBER_ATTEMPTS {
        let candidate = random_account_number();
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE account_number = $1)",
        )
        .bind(&candidate)
        .fetch_one(&mut *conn)
        .await?;
        if !exists {
            return Ok(candidate);
        }
    }
    Err(AccountError::NumberSpaceExhausted)
}

/// Open a new active account for a customer.
pub async fn open(
    pool: &PgPool,
    customer_id: i64,
    account_type: &str,
    currency: &str,
) -> Result<Account, AccountError> {
    if !ACCOUNT_TYPES.contains(&account_type) {
        return Err(AccountError::InvalidType(account_type.to_string()));
    }

    let customer_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE customer_id = $1)")
            .bind(customer_id)
            .fetch_one(pool)
            .await?;
    if !customer_exists {
        return Err(AccountError::CustomerNotFound(customer_id));
    }

    let mut tx = pool.begin().await?;
    let account_number = unique_account_number(&mut tx).await?;
    let account_id: i64 = sqlx::query_scalar(
        "INSERT INTO accounts (customer_id, account_number, account_type, currency, status_id)
         VALUES ($1, $2, $3, $4,
                 (SELECT status_id FROM account_status_types WHERE status_name = 'active'))
         RETURNING account_id",
    )
    .bind(customer_id)
    .bind(&account_number)
    .bind(account_type)
    .bind(currency)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    get(pool, account_id).await
}

/// Fetch one account with its status name.
pub async fn get(pool: &PgPool, account_id: i64) -> Result<Account, AccountError> {
    let row = sqlx::query(&format!(
        "SELECT {ACCOUNT_COLUMNS}
         FROM accounts a
         JOIN account_status_types s ON s.status_id = a.status_id
         WHERE a.account_id = $1"
    ))
    .bind(account_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AccountError::NotFound(account_id))?;

    Ok(account_from_row(&row))
}

/// Fetch one account by its public number.
pub async fn get_by_number(pool: &PgPool, account_number: &str) -> Result<Option<Account>, AccountError> {
    let row = sqlx::query(&format!(
        "SELECT {ACCOUNT_COLUMNS}
         FROM accounts a
         JOIN account_status_types s ON s.status_id = a.status_id
         WHERE a.account_number = $1"
    ))
    .bind(account_number)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(account_from_row))
}

/// All accounts belonging to one customer, oldest first.
pub async fn list_for_customer(pool: &PgPool, customer_id: i64) -> Result<Vec<Account>, AccountError> {
    let rows = sqlx::query(&format!(
        "SELECT {ACCOUNT_COLUMNS}
         FROM accounts a
         JOIN account_status_types s ON s.status_id = a.status_id
         WHERE a.customer_id = $1
         ORDER BY a.account_id"
    ))
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(account_from_row).collect())
}

/// Account row plus owner name for the back-office grid.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AdminAccountRow {
    #[serde(flatten)]
    pub account: Account,
    pub customer_name: String,
}

/// Optional filters for the admin account listing.
#[derive(Debug, Clone, Default)]
pub struct AccountFilters {
    pub search: Option<String>,
    pub status: Option<String>,
    pub account_type: Option<String>,
    pub customer_id: Option<i64>,
}

fn push_account_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filters: &AccountFilters) {
    builder.push(" WHERE TRUE");
    if let Some(search) = &filters.search {
        let pattern = format!("%{search}%");
        builder.push(" AND (a.account_number ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR c.first_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR c.last_name ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    if let Some(status) = &filters.status {
        builder.push(" AND s.status_name = ");
        builder.push_bind(status.clone());
    }
    if let Some(account_type) = &filters.account_type {
        builder.push(" AND a.account_type = ");
        builder.push_bind(account_type.clone());
    }
    if let Some(customer_id) = filters.customer_id {
        builder.push(" AND a.customer_id = ");
        builder.push_bind(customer_id);
    }
}

/// List accounts for the back-office, id-ordered, paginated.
pub async fn list(
    pool: &PgPool,
    filters: &AccountFilters,
    page: Page,
) -> Result<Paginated<AdminAccountRow>, AccountError> {
    const FROM: &str = "
        FROM accounts a
        JOIN account_status_types s ON s.status_id = a.status_id
        JOIN customers c ON c.customer_id = a.customer_id";

    let mut count_builder = QueryBuilder::new(format!("SELECT COUNT(*) {FROM}"));
    push_account_filters(&mut count_builder, filters);
    let total_items: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut builder = QueryBuilder::new(format!(
        "SELECT {ACCOUNT_COLUMNS}, c.first_name || ' ' || c.last_name AS customer_name {FROM}"
    ));
    push_account_filters(&mut builder, filters);
    builder.push(" ORDER BY a.account_id LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());

    let rows = builder.build().fetch_all(pool).await?;
    let items = rows
        .iter()
        .map(|r| AdminAccountRow { account: account_from_row(r), customer_name: r.get("customer_name") })
        .collect();

    Ok(Paginated::new(items, page, total_items))
}

/// Change an account's status. Closing requires a zero balance. Audited.
pub async fn update_status(
    pool: &PgPool,
    account_id: i64,
    status_name: &str,
    acting_user_id: i64,
) -> Result<Account, AccountError> {
    let status_id: Option<i32> =
        sqlx::query_scalar("SELECT status_id FROM account_status_types WHERE status_name = $1")
            .bind(status_name)
            .fetch_optional(pool)
            .await?;
    let Some(status_id) = status_id else {
        return Err(AccountError::UnknownStatus(status_name.to_string()));
    };

    let current = get(pool, account_id).await?;
    if status_name == "closed" && current.balance_cents != 0 {
        return Err(AccountError::NonZeroBalanceClose);
    }

    sqlx::query("UPDATE accounts SET status_id = $1, updated_at = now() WHERE account_id = $2")
        .bind(status_id)
        .bind(account_id)
        .execute(pool)
        .await?;

    audit::record(
        pool,
        Some(acting_user_id),
        audit::ACCOUNT_STATUS_CHANGE,
        "account",
        Some(account_id),
        serde_json::json!({
            "old_status": current.status_name,
            "new_status": status_name,
        }),
    )
    .await;

    get(pool, account_id).await
}

/// Set an account's overdraft limit. Audited with the old and new values.
pub async fn set_overdraft_limit(
    pool: &PgPool,
    account_id: i64,
    new_limit_cents: i64,
    acting_user_id: i64,
) -> Result<Account, AccountError> {
    if new_limit_cents < 0 {
        return Err(AccountError::NegativeOverdraftLimit);
    }

    let current = get(pool, account_id).await?;

    sqlx::query(
        "UPDATE accounts SET overdraft_limit_cents = $1, updated_at = now() WHERE account_id = $2",
    )
    .bind(new_limit_cents)
    .bind(account_id)
    .execute(pool)
    .await?;

    audit::record(
        pool,
        Some(acting_user_id),
        audit::OVERDRAFT_LIMIT_CHANGE,
        "account",
        Some(account_id),
        serde_json::json!({
            "old_limit_cents": current.overdraft_limit_cents,
            "new_limit_cents": new_limit_cents,
        }),
    )
    .await;

    get(pool, account_id).await
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
