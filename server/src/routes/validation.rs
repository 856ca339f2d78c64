//! Accounting validation routes.

use axum::Json;
use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::routes::admin_auth::AdminUser;
use crate::services::validator::{self, AccountCheck, LedgerCheck};
use crate::state::AppState;

/// `GET /api/admin/validation/ledger`: whole-ledger zero-sum check.
pub async fn ledger(
    State(state): State<AppState>,
    _auth: AdminUser,
) -> Result<Json<LedgerCheck>, ApiError> {
    let check = validator::check_ledger(&state.pool).await?;
    Ok(Json(check))
}

/// `GET /api/admin/validation/accounts/{id}`: stored balance vs entry sum
/// for one account.
pub async fn account(
    State(state): State<AppState>,
    _auth: AdminUser,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountCheck>, ApiError> {
    let check = validator::check_account(&state.pool, account_id).await?;
    Ok(Json(check))
}
