//! Back-office fee routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::admin_auth::AdminUser;
use crate::services::fee::{self, FeeType};
use crate::state::AppState;

/// `GET /api/admin/fees/types`: the configured fee types with their default
/// amounts.
pub async fn list_types(
    State(state): State<AppState>,
    _auth: AdminUser,
) -> Result<Json<Vec<FeeType>>, ApiError> {
    let types = fee::list_types(&state.pool).await?;
    Ok(Json(types))
}

#[derive(Deserialize)]
pub struct ApplyFeeRequest {
    pub account_id: i64,
    pub fee_name: String,
    pub amount_cents: Option<i64>,
    pub description: Option<String>,
}

/// `POST /api/admin/fees/apply`: charge a fee through the withdrawal path,
/// at the default amount unless overridden.
pub async fn apply(
    State(state): State<AppState>,
    auth: AdminUser,
    Json(payload): Json<ApplyFeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = fee::apply_fee(
        &state.pool,
        payload.account_id,
        &payload.fee_name,
        payload.amount_cents,
        payload.description.as_deref(),
        auth.user.user_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
