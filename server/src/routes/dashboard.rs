//! Back-office dashboard route.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::routes::admin_auth::AdminUser;
use crate::services::dashboard::{self, DashboardSummary};
use crate::state::AppState;

/// `GET /api/admin/dashboard`: summary totals and recent activity.
pub async fn summary(
    State(state): State<AppState>,
    _auth: AdminUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = dashboard::summary(&state.pool).await?;
    Ok(Json(summary))
}
