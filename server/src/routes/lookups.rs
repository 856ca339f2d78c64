//! Lookup-table routes for back-office form dropdowns.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use sqlx::Row;

use crate::error::ApiError;
use crate::routes::admin_auth::AdminUser;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AccountStatusType {
    pub status_id: i32,
    pub status_name: String,
}

#[derive(Serialize)]
pub struct TransactionType {
    pub transaction_type_id: i32,
    pub type_name: String,
}

/// `GET /api/admin/lookups/account-status-types`: all statuses, id-ordered.
pub async fn account_status_types(
    State(state): State<AppState>,
    _auth: AdminUser,
) -> Result<Json<Vec<AccountStatusType>>, ApiError> {
    let rows =
        sqlx::query("SELECT status_id, status_name FROM account_status_types ORDER BY status_id")
            .fetch_all(&state.pool)
            .await?;
    let types = rows
        .iter()
        .map(|row| AccountStatusType {
            status_id: row.get("status_id"),
            status_name: row.get("status_name"),
        })
        .collect();
    Ok(Json(types))
}

/// `GET /api/admin/lookups/transaction-types`: all transaction types,
/// id-ordered.
pub async fn transaction_types(
    State(state): State<AppState>,
    _auth: AdminUser,
) -> Result<Json<Vec<TransactionType>>, ApiError> {
    let rows = sqlx::query(
        "SELECT transaction_type_id, type_name FROM transaction_types ORDER BY transaction_type_id",
    )
    .fetch_all(&state.pool)
    .await?;
    let types = rows
        .iter()
        .map(|row| TransactionType {
            transaction_type_id: row.get("transaction_type_id"),
            type_name: row.get("type_name"),
        })
        .collect();
    Ok(Json(types))
}
