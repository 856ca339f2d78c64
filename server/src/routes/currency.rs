//! Currency conversion route.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::auth::CustomerUser;
use crate::services::currency;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ConvertQuery {
    pub from: String,
    pub to: String,
    pub amount_cents: i64,
}

#[derive(Serialize)]
pub struct ConvertResponse {
    pub from: String,
    pub to: String,
    pub amount_cents: i64,
    pub rate_micros: i64,
    pub converted_cents: i64,
}

/// `GET /api/v1/currency/convert`: convert an amount using the latest stored
/// exchange rate.
pub async fn convert(
    State(state): State<AppState>,
    _auth: CustomerUser,
    Query(query): Query<ConvertQuery>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let (rate_micros, converted_cents) =
        currency::convert(&state.pool, query.amount_cents, &query.from, &query.to).await?;
    Ok(Json(ConvertResponse {
        from: query.from,
        to: query.to,
        amount_cents: query.amount_cents,
        rate_micros,
        converted_cents,
    }))
}
