//! Customer profiles.

use sqlx::{PgPool, QueryBuilder, Row};

use crate::pagination::{Page, Paginated};

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("customer not found: {0}")]
    NotFound(i64),
    #[error("user has no customer profile")]
    NoProfile,
    #[error("email already registered")]
    EmailTaken,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

const CUSTOMER_COLUMNS: &str = r#"
    customer_id,
    first_name,
    last_name,
    email,
    phone_number,
    address,
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(updated_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
"#;

fn customer_from_row(r: &sqlx::postgres::PgRow) -> Customer {
    Customer {
        customer_id: r.get("customer_id"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        email: r.get("email"),
        phone_number: r.get("phone_number"),
        address: r.get("address"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

/// Fetch one customer profile.
pub async fn get(pool: &PgPool, customer_id: i64) -> Result<Customer, CustomerError> {
    let row = sqlx::query(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id = $1"
    ))
    .bind(customer_id)
    .fetch_optional(pool)
    .await?
    .ok_or(CustomerError::NotFound(customer_id))?;

    Ok(customer_from_row(&row))
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CustomerPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Apply a partial update and bump `updated_at`.
pub async fn update(
    pool: &PgPool,
    customer_id: i64,
    patch: &CustomerPatch,
) -> Result<Customer, CustomerError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE customer_id = $1)")
            .bind(customer_id)
            .fetch_one(pool)
            .await?;
    if !exists {
        return Err(CustomerError::NotFound(customer_id));
    }

    if let Some(email) = &patch.email {
        let email_taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1 AND customer_id <> $2)",
        )
        .bind(email)
        .bind(customer_id)
        .fetch_one(pool)
        .await?;
        if email_taken {
            return Err(CustomerError::EmailTaken);
        }
    }

    sqlx::query(
        "UPDATE customers SET
             first_name = COALESCE($1, first_name),
             last_name = COALESCE($2, last_name),
             email = COALESCE($3, email),
             phone_number = COALESCE($4, phone_number),
             address = COALESCE($5, address),
             updated_at = now()
         WHERE customer_id = $6",
    )
    .bind(&patch.first_name)
    .bind(&patch.last_name)
    .bind(&patch.email)
    .bind(&patch.phone_number)
    .bind(&patch.address)
    .bind(customer_id)
    .execute(pool)
    .await?;

    get(pool, customer_id).await
}

/// Payload for creating a customer profile from the back-office.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Create a customer profile.
pub async fn create(pool: &PgPool, new: &NewCustomer) -> Result<Customer, CustomerError> {
    let email_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE email = $1)")
            .bind(&new.email)
            .fetch_one(pool)
            .await?;
    if email_taken {
        return Err(CustomerError::EmailTaken);
    }

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
    .fetch_one(pool)
    .await?;

    get(pool, customer_id).await
}

/// List customers for the back-office, id-ordered, with an optional
/// name/email search.
pub async fn list(
    pool: &PgPool,
    search: Option<&str>,
    page: Page,
) -> Result<Paginated<Customer>, CustomerError> {
    let push_search = |builder: &mut QueryBuilder<'_, sqlx::Postgres>| {
        if let Some(term) = search {
            let pattern = format!("%{term}%");
            builder.push(" WHERE (first_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR last_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR email ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    };

    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM customers");
    push_search(&mut count_builder);
    let total_items: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut builder = QueryBuilder::new(format!("SELECT {CUSTOMER_COLUMNS} FROM customers"));
    push_search(&mut builder);
    builder.push(" ORDER BY customer_id LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());

    let rows = builder.build().fetch_all(pool).await?;
    Ok(Paginated::new(rows.iter().map(customer_from_row).collect(), page, total_items))
}

#[cfg(test)]
#[path = "customer_test.rs"]
mod tests;
