//! Customer profile routes, portal-side and back-office.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::pagination::{Page, PageQuery, Paginated};
use crate::routes::admin_auth::AdminUser;
use crate::routes::auth::CustomerUser;
use crate::services::account::{self, Account};
use crate::services::customer::{self, Customer, CustomerError, CustomerPatch, NewCustomer};
use crate::state::AppState;

fn own_customer_id(auth: &CustomerUser) -> Result<i64, ApiError> {
    auth.user
        .customer_id
        .ok_or_else(|| ApiError::from(CustomerError::NoProfile))
}

// =============================================================================
// PORTAL: OWN PROFILE
// =============================================================================

/// `GET /api/v1/customers/me`: the caller's customer profile.
pub async fn get_me(
    State(state): State<AppState>,
    auth: CustomerUser,
) -> Result<Json<Customer>, ApiError> {
    let customer_id = own_customer_id(&auth)?;
    let profile = customer::get(&state.pool, customer_id).await?;
    Ok(Json(profile))
}

/// `PUT /api/v1/customers/me`: partial update of the caller's own profile.
pub async fn update_me(
    State(state): State<AppState>,
    auth: CustomerUser,
    Json(payload): Json<CustomerPatch>,
) -> Result<Json<Customer>, ApiError> {
    let customer_id = own_customer_id(&auth)?;
    let updated = customer::update(&state.pool, customer_id, &payload).await?;
    Ok(Json(updated))
}

// =============================================================================
// BACK-OFFICE
// =============================================================================

#[derive(Deserialize)]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// `GET /api/admin/customers`: paginated listing with name/email search.
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminUser,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<Paginated<Customer>>, ApiError> {
    let page = Page::from_query(PageQuery { page: query.page, per_page: query.per_page });
    let customers = customer::list(&state.pool, query.search.as_deref(), page).await?;
    Ok(Json(customers))
}

/// A customer together with every account they hold.
#[derive(Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub accounts: Vec<Account>,
}

/// `GET /api/admin/customers/{id}`: profile plus the customer's accounts.
pub async fn detail(
    State(state): State<AppState>,
    _auth: AdminUser,
    Path(customer_id): Path<i64>,
) -> Result<Json<CustomerDetail>, ApiError> {
    let customer = customer::get(&state.pool, customer_id).await?;
    let accounts = account::list_for_customer(&state.pool, customer_id).await?;
    Ok(Json(CustomerDetail { customer, accounts }))
}

/// `POST /api/admin/customers`: create a standalone customer profile.
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminUser,
    Json(payload): Json<NewCustomer>,
) -> Result<impl IntoResponse, ApiError> {
    let created = customer::create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/admin/customers/{id}`: partial profile update.
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminUser,
    Path(customer_id): Path<i64>,
    Json(payload): Json<CustomerPatch>,
) -> Result<Json<Customer>, ApiError> {
    let updated = customer::update(&state.pool, customer_id, &payload).await?;
    Ok(Json(updated))
}
