//! Account routes, portal-side and back-office.
//!
//! DESIGN
//! ======
//! Portal handlers never reveal whether a foreign account exists: any id the
//! caller does not own answers 404 "Account not found", same as a missing id.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::pagination::{Page, PageQuery, Paginated};
use crate::routes::admin_auth::AdminUser;
use crate::routes::auth::CustomerUser;
use crate::services::account::{self, Account, AccountFilters, AdminAccountRow};
use crate::services::customer::{self, Customer, CustomerError};
use crate::services::statement::{self, Statement};
use crate::services::transaction::{self, LedgerEntry};
use crate::state::AppState;

const DEFAULT_CURRENCY: &str = "USD";

/// Fetch an account and require that the portal caller owns it.
pub(crate) async fn owned_account(
    state: &AppState,
    auth: &CustomerUser,
    account_id: i64,
) -> Result<Account, ApiError> {
    let customer_id = auth
        .user
        .customer_id
        .ok_or_else(|| ApiError::from(CustomerError::NoProfile))?;
    let account = account::get(&state.pool, account_id).await?;
    if account.customer_id != customer_id {
        return Err(ApiError::not_found("Account not found"));
    }
    Ok(account)
}

// =============================================================================
// PORTAL
// =============================================================================

#[derive(Deserialize)]
pub struct OpenAccountRequest {
    pub account_type: String,
    pub currency: Option<String>,
}

/// `POST /api/v1/accounts`: open an account for the caller's own customer.
pub async fn open(
    State(state): State<AppState>,
    auth: CustomerUser,
    Json(payload): Json<OpenAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let customer_id = auth
        .user
        .customer_id
        .ok_or_else(|| ApiError::from(CustomerError::NoProfile))?;
    let currency = payload.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    let account = account::open(&state.pool, customer_id, &payload.account_type, currency).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /api/v1/accounts`: every account the caller owns.
pub async fn list_own(
    State(state): State<AppState>,
    auth: CustomerUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    let customer_id = auth
        .user
        .customer_id
        .ok_or_else(|| ApiError::from(CustomerError::NoProfile))?;
    let accounts = account::list_for_customer(&state.pool, customer_id).await?;
    Ok(Json(accounts))
}

/// `GET /api/v1/accounts/{id}`: one owned account.
pub async fn get_own(
    State(state): State<AppState>,
    auth: CustomerUser,
    Path(account_id): Path<i64>,
) -> Result<Json<Account>, ApiError> {
    let account = owned_account(&state, &auth, account_id).await?;
    Ok(Json(account))
}

#[derive(Deserialize)]
pub struct StatementQuery {
    pub start_date: String,
    pub end_date: String,
}

/// `GET /api/v1/accounts/{id}/statement`: period statement with running
/// balances for an owned account.
pub async fn statement(
    State(state): State<AppState>,
    auth: CustomerUser,
    Path(account_id): Path<i64>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<Statement>, ApiError> {
    owned_account(&state, &auth, account_id).await?;
    let statement =
        statement::build(&state.pool, account_id, &query.start_date, &query.end_date).await?;
    Ok(Json(statement))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /api/v1/accounts/{id}/transactions`: newest-first entries for an
/// owned account.
pub async fn history(
    State(state): State<AppState>,
    auth: CustomerUser,
    Path(account_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    owned_account(&state, &auth, account_id).await?;
    let entries = transaction::history(
        &state.pool,
        account_id,
        query.limit,
        query.offset.unwrap_or(0),
    )
    .await?;
    Ok(Json(entries))
}

// =============================================================================
// BACK-OFFICE
// =============================================================================

#[derive(Deserialize)]
pub struct AccountListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub account_type: Option<String>,
    pub customer_id: Option<i64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// `GET /api/admin/accounts`: paginated listing with search and filters.
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminUser,
    Query(query): Query<AccountListQuery>,
) -> Result<Json<Paginated<AdminAccountRow>>, ApiError> {
    let filters = AccountFilters {
        search: query.search,
        status: query.status,
        account_type: query.account_type,
        customer_id: query.customer_id,
    };
    let page = Page::from_query(PageQuery { page: query.page, per_page: query.per_page });
    let accounts = account::list(&state.pool, &filters, page).await?;
    Ok(Json(accounts))
}

/// An account with its owner's full profile embedded.
#[derive(Serialize)]
pub struct AdminAccountDetail {
    #[serde(flatten)]
    pub account: Account,
    pub customer: Customer,
}

/// `GET /api/admin/accounts/{id}`: account plus owning customer.
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminUser,
    Path(account_id): Path<i64>,
) -> Result<Json<AdminAccountDetail>, ApiError> {
    let account = account::get(&state.pool, account_id).await?;
    let customer = customer::get(&state.pool, account.customer_id).await?;
    Ok(Json(AdminAccountDetail { account, customer }))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// `PUT /api/admin/accounts/{id}/status`: change the account status.
/// Closing requires a zero balance.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AdminUser,
    Path(account_id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<Account>, ApiError> {
    let updated =
        account::update_status(&state.pool, account_id, &payload.status, auth.user.user_id)
            .await?;
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct OverdraftLimitRequest {
    pub overdraft_limit_cents: i64,
}

/// `PUT /api/admin/accounts/{id}/overdraft_limit`: set the overdraft limit.
pub async fn update_overdraft_limit(
    State(state): State<AppState>,
    auth: AdminUser,
    Path(account_id): Path<i64>,
    Json(payload): Json<OverdraftLimitRequest>,
) -> Result<Json<Account>, ApiError> {
    let updated = account::set_overdraft_limit(
        &state.pool,
        account_id,
        payload.overdraft_limit_cents,
        auth.user.user_id,
    )
    .await?;
    Ok(Json(updated))
}
