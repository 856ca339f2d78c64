//! Back-office user management routes.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::error::ApiError;
use crate::pagination::{Page, PageQuery, Paginated};
use crate::routes::admin_auth::AdminUser;
use crate::services::user::{self, AdminUserRow, NewUser, UserFilters, UserPatch};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// `GET /api/admin/users`: paginated listing with search and role filters.
pub async fn list(
    State(state): State<AppState>,
    _auth: AdminUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Paginated<AdminUserRow>>, ApiError> {
    let filters = UserFilters { search: query.search, role: query.role };
    let page = Page::from_query(PageQuery { page: query.page, per_page: query.per_page });
    let users = user::list(&state.pool, &filters, page).await?;
    Ok(Json(users))
}

/// `POST /api/admin/users`: create a user with an explicit role.
pub async fn create(
    State(state): State<AppState>,
    _auth: AdminUser,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let created = user::create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/admin/users/{id}`: partial update of email, password, role or
/// active flag.
pub async fn update(
    State(state): State<AppState>,
    _auth: AdminUser,
    Path(user_id): Path<i64>,
    Json(payload): Json<UserPatch>,
) -> Result<Json<AdminUserRow>, ApiError> {
    let updated = user::update(&state.pool, user_id, &payload).await?;
    Ok(Json(updated))
}
