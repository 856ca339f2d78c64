//! CSV export route.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::auth::CustomerUser;
use crate::services::customer::CustomerError;
use crate::services::report;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CsvExportQuery {
    pub account_id: i64,
    pub start_date: String,
    pub end_date: String,
}

/// `GET /api/v1/reports/transactions/csv`: download one owned account's
/// transactions for a period as CSV.
pub async fn transactions_csv(
    State(state): State<AppState>,
    auth: CustomerUser,
    Query(query): Query<CsvExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let customer_id = auth
        .user
        .customer_id
        .ok_or_else(|| ApiError::from(CustomerError::NoProfile))?;
    let csv = report::customer_transactions_csv(
        &state.pool,
        customer_id,
        query.account_id,
        &query.start_date,
        &query.end_date,
    )
    .await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"transactions.csv\"",
        ),
    ];
    Ok((headers, csv))
}
