//! User accounts: authentication, self-registration, admin management.
//!
//! DESIGN
//! ======
//! Authentication is deliberately two-phase: `authenticate` only proves the
//! password, while the route layer applies surface-specific policy (active
//! check on the customer portal, role check on the admin panel) so each
//! surface keeps its own rejection semantics. Registration creates the user,
//! the customer profile and a starter savings account in one transaction.

use sqlx::{PgPool, QueryBuilder, Row};

use crate::pagination::{Page, Paginated};
use crate::services::account;
use crate::services::password::{self, PasswordError};
use crate::services::session::AuthedUser;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user is inactive")]
    Inactive,
    #[error("password below minimum length")]
    PasswordTooShort,
    #[error("username already registered")]
    UsernameTaken,
    #[error("email already registered")]
    EmailTaken,
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("user not found: {0}")]
    NotFound(i64),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Account(#[from] account::AccountError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<PasswordError> for UserError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Hash(msg) => Self::Hash(msg),
        }
    }
}

fn authed_user_from_row(row: &sqlx::postgres::PgRow) -> AuthedUser {
    AuthedUser {
        user_id: row.get("user_id"),
        username: row.get("username"),
        email: row.get("email"),
        role_name: row.get("role_name"),
        is_active: row.get("is_active"),
        customer_id: row.get("customer_id"),
    }
}

/// Verify a username/password pair. Unknown usernames and wrong passwords
/// both collapse to `InvalidCredentials`.
pub async fn authenticate(
    pool: &PgPool,
    username: &str,
    password_input: &str,
) -> Result<AuthedUser, UserError> {
    let row = sqlx::query(
        r"SELECT u.user_id, u.username, u.email, u.password_hash,
                 r.role_name, u.is_active, u.customer_id
          FROM users u
          JOIN roles r ON r.role_id = u.role_id
          WHERE u.username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or(UserError::InvalidCredentials)?;

    let stored_hash: String = row.get("password_hash");
    if !password::verify_password(password_input, &stored_hash) {
        return Err(UserError::InvalidCredentials);
    }

    Ok(authed_user_from_row(&row))
}

/// Stamp a successful login.
pub async fn touch_last_login(pool: &PgPool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = now() WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Self-registration payload from the customer portal.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Register a new customer: user row, customer profile and a starter savings
/// account awaiting approval, all in one transaction.
pub async fn register(pool: &PgPool, new: &NewRegistration) -> Result<AuthedUser, UserError> {
    if new.password.len() < MIN_PASSWORD_LEN {
        return Err(UserError::PasswordTooShort);
    }

    let username_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(&new.username)
            .fetch_one(pool)
            .await?;
    if username_taken {
        return Err(UserError::UsernameTaken);
    }

    let email_taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
         OR EXISTS(SELECT 1 FROM customers WHERE email = $1)",
    )
    .bind(&new.email)
    .fetch_one(pool)
    .await?;
    if email_taken {
        return Err(UserError::EmailTaken);
    }

    let password_hash = password::hash_password(&new.password)?;

    let mut tx = pool.begin().await?;

    let customer_id: i64 = sqlx::query_scalar(
        "INSERT INTO customers (first_name, last_name, email, phone_number, address)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING customer_id",
    )
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.email)
    .bind(&new.phone_number)
    .bind(&new.address)
    .fetch_one(&mut *tx)
    .await?;

    let user_row = sqlx::query(
        r"INSERT INTO users (username, email, password_hash, role_id, customer_id)
          VALUES ($1, $2, $3, (SELECT role_id FROM roles WHERE role_name = 'customer'), $4)
          RETURNING user_id, username, email, 'customer' AS role_name, is_active, customer_id",
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&password_hash)
    .bind(customer_id)
    .fetch_one(&mut *tx)
    .await?;

    let account_number = account::unique_account_number(&mut tx).await?;
    sqlx::query(
        "INSERT INTO accounts (customer_id, account_number, account_type, status_id)
         VALUES ($1, $2, 'savings',
                 (SELECT status_id FROM account_status_types WHERE status_name = 'pending_approval'))",
    )
    .bind(customer_id)
    .bind(&account_number)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(authed_user_from_row(&user_row))
}

// =============================================================================
// ADMIN MANAGEMENT
// =============================================================================

/// User row as shown in the back-office.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AdminUserRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role_name: String,
    pub is_active: bool,
    pub customer_id: Option<i64>,
    pub created_at: String,
    pub last_login: Option<String>,
}

fn admin_row(r: &sqlx::postgres::PgRow) -> AdminUserRow {
    AdminUserRow {
        user_id: r.get("user_id"),
        username: r.get("username"),
        email: r.get("email"),
        role_name: r.get("role_name"),
        is_active: r.get("is_active"),
        customer_id: r.get("customer_id"),
        created_at: r.get("created_at"),
        last_login: r.get("last_login"),
    }
}

const ADMIN_USER_COLUMNS: &str = r#"
    u.user_id,
    u.username,
    u.email,
    r.role_name,
    u.is_active,
    u.customer_id,
    to_char(u.created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(u.last_login AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS last_login
"#;

/// Optional filters for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub search: Option<String>,
    pub role: Option<String>,
}

fn push_user_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filters: &UserFilters) {
    builder.push(" WHERE TRUE");
    if let Some(search) = &filters.search {
        let pattern = format!("%{search}%");
        builder.push(" AND (u.username ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR u.email ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    if let Some(role) = &filters.role {
        builder.push(" AND r.role_name = ");
        builder.push_bind(role.clone());
    }
}

/// List users for the back-office, id-ordered, paginated.
pub async fn list(
    pool: &PgPool,
    filters: &UserFilters,
    page: Page,
) -> Result<Paginated<AdminUserRow>, UserError> {
    let mut count_builder =
        QueryBuilder::new("SELECT COUNT(*) FROM users u JOIN roles r ON r.role_id = u.role_id");
    push_user_filters(&mut count_builder, filters);
    let total_items: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut builder = QueryBuilder::new(format!(
        "SELECT {ADMIN_USER_COLUMNS} FROM users u JOIN roles r ON r.role_id = u.role_id"
    ));
    push_user_filters(&mut builder, filters);
    builder.push(" ORDER BY u.user_id LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());

    let rows = builder.build().fetch_all(pool).await?;
    Ok(Paginated::new(rows.iter().map(admin_row).collect(), page, total_items))
}

/// Fetch one user for the back-office.
pub async fn get(pool: &PgPool, user_id: i64) -> Result<AdminUserRow, UserError> {
    let row = sqlx::query(&format!(
        "SELECT {ADMIN_USER_COLUMNS}
         FROM users u JOIN roles r ON r.role_id = u.role_id
         WHERE u.user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(UserError::NotFound(user_id))?;

    Ok(admin_row(&row))
}

/// Payload for creating a staff or customer user from the back-office.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role_name: String,
    #[serde(default)]
    pub customer_id: Option<i64>,
}

/// Create a user with an explicit role.
pub async fn create(pool: &PgPool, new: &NewUser) -> Result<AdminUserRow, UserError> {
    if new.password.len() < MIN_PASSWORD_LEN {
        return Err(UserError::PasswordTooShort);
    }

    let role_id: Option<i32> = sqlx::query_scalar("SELECT role_id FROM roles WHERE role_name = $1")
        .bind(&new.role_name)
        .fetch_optional(pool)
        .await?;
    let Some(role_id) = role_id else {
        return Err(UserError::UnknownRole(new.role_name.clone()));
    };

    let username_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(&new.username)
            .fetch_one(pool)
            .await?;
    if username_taken {
        return Err(UserError::UsernameTaken);
    }
    let email_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(&new.email)
            .fetch_one(pool)
            .await?;
    if email_taken {
        return Err(UserError::EmailTaken);
    }

    let password_hash = password::hash_password(&new.password)?;
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash, role_id, customer_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING user_id",
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&password_hash)
    .bind(role_id)
    .bind(new.customer_id)
    .fetch_one(pool)
    .await?;

    get(pool, user_id).await
}

/// Partial update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Apply a partial update to a user.
pub async fn update(pool: &PgPool, user_id: i64, patch: &UserPatch) -> Result<AdminUserRow, UserError> {
    // Existence check up front so an empty patch still 404s correctly.
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(UserError::NotFound(user_id));
    }

    if let Some(email) = &patch.email {
        let email_taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND user_id <> $2)",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        if email_taken {
            return Err(UserError::EmailTaken);
        }
        sqlx::query("UPDATE users SET email = $1 WHERE user_id = $2")
            .bind(email)
            .bind(user_id)
            .execute(pool)
            .await?;
    }

    if let Some(new_password) = &patch.password {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(UserError::PasswordTooShort);
        }
        let password_hash = password::hash_password(new_password)?;
        sqlx::query("UPDATE users SET password_hash = $1 WHERE user_id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(pool)
            .await?;
    }

    if let Some(role_name) = &patch.role_name {
        let role_id: Option<i32> =
            sqlx::query_scalar("SELECT role_id FROM roles WHERE role_name = $1")
                .bind(role_name)
                .fetch_optional(pool)
                .await?;
        let Some(role_id) = role_id else {
            return Err(UserError::UnknownRole(role_name.clone()));
        };
        sqlx::query("UPDATE users SET role_id = $1 WHERE user_id = $2")
            .bind(role_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    }

    if let Some(is_active) = patch.is_active {
        sqlx::query("UPDATE users SET is_active = $1 WHERE user_id = $2")
            .bind(is_active)
            .bind(user_id)
            .execute(pool)
            .await?;
    }

    get(pool, user_id).await
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
