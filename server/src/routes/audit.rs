//! Audit log route.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::pagination::{Page, PageQuery, Paginated};
use crate::routes::admin_auth::AdminUser;
use crate::routes::check_date_param;
use crate::services::audit::{self, AuditEntry, AuditFilters};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AuditListQuery {
    pub username: Option<String>,
    pub action_type: Option<String>,
    pub target_entity: Option<String>,
    pub target_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// `GET /api/admin/audit_logs`: newest-first audit trail with filters.
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminUser,
    Query(query): Query<AuditListQuery>,
) -> Result<Json<Paginated<AuditEntry>>, ApiError> {
    check_date_param(query.start_date.as_deref())?;
    check_date_param(query.end_date.as_deref())?;

    let filters = AuditFilters {
        username: query.username,
        action_type: query.action_type,
        target_entity: query.target_entity,
        target_id: query.target_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let page = Page::from_query(PageQuery { page: query.page, per_page: query.per_page });
    let entries = audit::list(&state.pool, &filters, page).await?;
    Ok(Json(entries))
}
