//! Money movement routes, portal-side and back-office.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::error::ApiError;
use crate::pagination::{Page, PageQuery, Paginated};
use crate::routes::accounts::owned_account;
use crate::routes::admin_auth::AdminUser;
use crate::routes::auth::CustomerUser;
use crate::routes::check_date_param;
use crate::services::account;
use crate::services::transaction::{
    self, AchDirection, AdminTransactionDetail, LedgerEntry, TransactionFilters, TransferResult,
    WireDirection,
};
use crate::state::AppState;

// =============================================================================
// PORTAL
// =============================================================================

#[derive(Deserialize)]
pub struct MovementRequest {
    pub account_id: i64,
    pub amount_cents: i64,
    pub description: Option<String>,
}

/// `POST /api/v1/transactions/deposit`: credit an owned account.
pub async fn deposit(
    State(state): State<AppState>,
    auth: CustomerUser,
    Json(payload): Json<MovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    owned_account(&state, &auth, payload.account_id).await?;
    let entry = transaction::deposit(
        &state.pool,
        payload.account_id,
        payload.amount_cents,
        payload.description.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `POST /api/v1/transactions/withdraw`: debit an owned account, subject to
/// the overdraft limit.
pub async fn withdraw(
    State(state): State<AppState>,
    auth: CustomerUser,
    Json(payload): Json<MovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    owned_account(&state, &auth, payload.account_id).await?;
    let entry = transaction::withdraw(
        &state.pool,
        payload.account_id,
        payload.amount_cents,
        payload.description.as_deref(),
        Some(auth.user.user_id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Deserialize)]
pub struct PortalTransferRequest {
    pub from_account_id: i64,
    pub to_account_number: String,
    pub amount_cents: i64,
    pub description: Option<String>,
}

/// `POST /api/v1/transactions/transfer`: move money from an owned account to
/// another account addressed by number.
pub async fn transfer(
    State(state): State<AppState>,
    auth: CustomerUser,
    Json(payload): Json<PortalTransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    owned_account(&state, &auth, payload.from_account_id).await?;
    let recipient = account::get_by_number(&state.pool, &payload.to_account_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipient account not found"))?;

    let result = transaction::transfer(
        &state.pool,
        payload.from_account_id,
        recipient.account_id,
        payload.amount_cents,
        payload.description.as_deref(),
        Some(auth.user.user_id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

// =============================================================================
// BACK-OFFICE
// =============================================================================

#[derive(Deserialize)]
pub struct TransactionListQuery {
    pub account_id: Option<i64>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// `GET /api/admin/transactions`: paginated ledger listing with filters.
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminUser,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Paginated<LedgerEntry>>, ApiError> {
    check_date_param(query.start_date.as_deref())?;
    check_date_param(query.end_date.as_deref())?;

    let filters = TransactionFilters {
        account_id: query.account_id,
        type_name: query.type_name,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let page = Page::from_query(PageQuery { page: query.page, per_page: query.per_page });
    let entries = transaction::list(&state.pool, &filters, page).await?;
    Ok(Json(entries))
}

/// `GET /api/admin/transactions/{id}`: one entry with account, owner and
/// related-account context.
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminUser,
    Path(transaction_id): Path<i64>,
) -> Result<Json<AdminTransactionDetail>, ApiError> {
    let detail = transaction::detail(&state.pool, transaction_id).await?;
    Ok(Json(detail))
}

/// `POST /api/admin/transactions/deposit`: credit any account.
pub async fn admin_deposit(
    State(state): State<AppState>,
    _auth: AdminUser,
    Json(payload): Json<MovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = transaction::deposit(
        &state.pool,
        payload.account_id,
        payload.amount_cents,
        payload.description.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `POST /api/admin/transactions/withdraw`: debit any account.
pub async fn admin_withdraw(
    State(state): State<AppState>,
    auth: AdminUser,
    Json(payload): Json<MovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = transaction::withdraw(
        &state.pool,
        payload.account_id,
        payload.amount_cents,
        payload.description.as_deref(),
        Some(auth.user.user_id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Deserialize)]
pub struct AdminTransferRequest {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount_cents: i64,
    pub description: Option<String>,
}

/// `POST /api/admin/transactions/transfer`: transfer between two accounts by
/// id.
pub async fn admin_transfer(
    State(state): State<AppState>,
    auth: AdminUser,
    Json(payload): Json<AdminTransferRequest>,
) -> Result<(StatusCode, Json<TransferResult>), ApiError> {
    let result = transaction::transfer(
        &state.pool,
        payload.from_account_id,
        payload.to_account_id,
        payload.amount_cents,
        payload.description.as_deref(),
        Some(auth.user.user_id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[derive(Deserialize)]
pub struct AchRequest {
    pub account_id: i64,
    pub amount_cents: i64,
    pub direction: AchDirection,
    pub description: Option<String>,
}

/// `POST /api/admin/transactions/ach`: post an ACH credit or debit.
pub async fn admin_ach(
    State(state): State<AppState>,
    auth: AdminUser,
    Json(payload): Json<AchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = transaction::ach(
        &state.pool,
        payload.account_id,
        payload.amount_cents,
        payload.direction,
        payload.description.as_deref(),
        Some(auth.user.user_id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Deserialize)]
pub struct WireRequest {
    pub account_id: i64,
    pub amount_cents: i64,
    pub direction: WireDirection,
    pub description: Option<String>,
}

/// `POST /api/admin/transactions/wire`: post an incoming or outgoing wire.
pub async fn admin_wire(
    State(state): State<AppState>,
    auth: AdminUser,
    Json(payload): Json<WireRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = transaction::wire(
        &state.pool,
        payload.account_id,
        payload.amount_cents,
        payload.direction,
        payload.description.as_deref(),
        Some(auth.user.user_id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[cfg(test)]
#[path = "transactions_test.rs"]
mod tests;
