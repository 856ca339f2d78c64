//! Audit trail for privileged and money-moving operations.
//!
//! DESIGN
//! ======
//! Every sensitive action inserts one `audit_log` row with a machine-readable
//! action type and a free-form JSON details blob. Recording is best-effort:
//! a failed insert is logged and swallowed so the underlying operation never
//! fails because the audit trail was unavailable.

use sqlx::{PgPool, QueryBuilder, Row};

use crate::pagination::{Page, Paginated};

pub const ADMIN_LOGIN_SUCCESS: &str = "ADMIN_LOGIN_SUCCESS";
pub const ADMIN_LOGIN_PERMISSION_DENIED: &str = "ADMIN_LOGIN_PERMISSION_DENIED";
pub const ADMIN_LOGOUT: &str = "ADMIN_LOGOUT";
pub const USER_REGISTERED: &str = "USER_REGISTERED";
pub const ACCOUNT_STATUS_CHANGE: &str = "ACCOUNT_STATUS_CHANGE";
pub const OVERDRAFT_LIMIT_CHANGE: &str = "OVERDRAFT_LIMIT_CHANGE";
pub const OVERDRAFT_USED: &str = "OVERDRAFT_USED";
pub const FEE_APPLIED: &str = "FEE_APPLIED";

/// Record an audit event. Failures are downgraded to warnings.
pub async fn record(
    pool: &PgPool,
    user_id: Option<i64>,
    action_type: &str,
    target_entity: &str,
    target_id: Option<i64>,
    details: serde_json::Value,
) {
    let result = sqlx::query(
        "INSERT INTO audit_log (user_id, action_type, target_entity, target_id, details)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(action_type)
    .bind(target_entity)
    .bind(target_id)
    .bind(details)
    .execute(pool)
    .await;

    if let Err(err) = result {
        tracing::warn!(error = %err, action_type, "audit event not recorded");
    }
}

/// One audit trail entry joined with the acting username.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuditEntry {
    pub log_id: i64,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub action_type: String,
    pub target_entity: String,
    pub target_id: Option<i64>,
    pub details: Option<serde_json::Value>,
    pub logged_at: String,
}

/// Optional filters for the audit listing. Dates are `YYYY-MM-DD` strings
/// validated by the route layer; the end date is inclusive through the whole
/// day.
#[derive(Debug, Clone, Default)]
pub struct AuditFilters {
    pub username: Option<String>,
    pub action_type: Option<String>,
    pub target_entity: Option<String>,
    pub target_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filters: &AuditFilters) {
    builder.push(" WHERE TRUE");
    if let Some(username) = &filters.username {
        builder.push(" AND u.username = ");
        builder.push_bind(username.clone());
    }
    if let Some(action_type) = &filters.action_type {
        builder.push(" AND a.action_type ILIKE ");
        builder.push_bind(format!("%{action_type}%"));
    }
    if let Some(target_entity) = &filters.target_entity {
        builder.push(" AND a.target_entity ILIKE ");
        builder.push_bind(format!("%{target_entity}%"));
    }
    if let Some(target_id) = &filters.target_id {
        builder.push(" AND CAST(a.target_id AS TEXT) ILIKE ");
        builder.push_bind(format!("%{target_id}%"));
    }
    if let Some(start) = &filters.start_date {
        builder.push(" AND a.logged_at >= ");
        builder.push_bind(start.clone());
        builder.push("::date");
    }
    if let Some(end) = &filters.end_date {
        builder.push(" AND a.logged_at < (");
        builder.push_bind(end.clone());
        builder.push("::date + INTERVAL '1 day')");
    }
}

/// List audit entries newest first with optional filters and pagination.
pub async fn list(
    pool: &PgPool,
    filters: &AuditFilters,
    page: Page,
) -> Result<Paginated<AuditEntry>, sqlx::Error> {
    let mut count_builder = QueryBuilder::new(
        "SELECT COUNT(*) FROM audit_log a LEFT JOIN users u ON u.user_id = a.user_id",
    );
    push_filters(&mut count_builder, filters);
    let total_items: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut builder = QueryBuilder::new(
        r#"SELECT
              a.log_id,
              a.user_id,
              u.username,
              a.action_type,
              a.target_entity,
              a.target_id,
              a.details,
              to_char(a.logged_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS logged_at
          FROM audit_log a
          LEFT JOIN users u ON u.user_id = a.user_id"#,
    );
    push_filters(&mut builder, filters);
    builder.push(" ORDER BY a.logged_at DESC, a.log_id DESC LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());

    let rows = builder.build().fetch_all(pool).await?;
    let items = rows
        .into_iter()
        .map(|r| AuditEntry {
            log_id: r.get("log_id"),
            user_id: r.get("user_id"),
            username: r.get("username"),
            action_type: r.get("action_type"),
            target_entity: r.get("target_entity"),
            target_id: r.get("target_id"),
            details: r.get("details"),
            logged_at: r.get("logged_at"),
        })
        .collect();

    Ok(Paginated::new(items, page, total_items))
}

#[cfg(test)]
#[path = "audit_test.rs"]
mod tests;
