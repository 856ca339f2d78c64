//! Back-office auth routes and the admin session extractor.
//!
//! SYSTEM CONTEXT
//! ==============
//! The back-office SPA uses its own cookie (`admin_session_token`) and the
//! `admin` session domain, so portal and back-office logins cannot be mixed.
//! Only the admin, teller and auditor roles may hold an admin session; a
//! valid password with any other role is refused and audited.

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;

use crate::error::ApiError;
use crate::routes::auth::{LoginRequest, clear_cookie, session_cookie};
use crate::services::session::{self, AuthedUser, SessionDomain};
use crate::services::user::UserError;
use crate::services::{audit, user};
use crate::state::AppState;

pub const ADMIN_COOKIE_NAME: &str = "admin_session_token";

pub(crate) const ALLOWED_ROLES: [&str; 3] = ["admin", "teller", "auditor"];

fn permission_denied() -> ApiError {
    ApiError::forbidden("You do not have permission to access the admin panel.")
}

// =============================================================================
// ADMIN EXTRACTOR
// =============================================================================

/// Authenticated back-office user extracted from the `admin_session_token`
/// cookie. Validates the session in the admin domain and the caller's role.
pub struct AdminUser {
    pub user: AuthedUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ADMIN_COOKIE_NAME)
            .map(Cookie::value)
            .unwrap_or_default();
        if token.is_empty() {
            return Err(ApiError::unauthorized("Not authenticated"));
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token, SessionDomain::Admin)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
        if !ALLOWED_ROLES.contains(&user.role_name.as_str()) {
            return Err(permission_denied());
        }

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/admin/auth/login`: verify credentials and role, then set the
/// admin session cookie. Denied roles are audited; inactive users are
/// indistinguishable from bad credentials.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = user::authenticate(&state.pool, &payload.username, &payload.password)
        .await
        .map_err(|err| match err {
            UserError::InvalidCredentials => {
                ApiError::unauthorized("Invalid username or password.")
            }
            other => other.into(),
        })?;
    if !user.is_active {
        return Err(ApiError::unauthorized("Invalid username or password."));
    }

    if !ALLOWED_ROLES.contains(&user.role_name.as_str()) {
        audit::record(
            &state.pool,
            Some(user.user_id),
            audit::ADMIN_LOGIN_PERMISSION_DENIED,
            "users",
            Some(user.user_id),
            json!({ "username": user.username, "role": user.role_name }),
        )
        .await;
        return Err(permission_denied());
    }

    user::touch_last_login(&state.pool, user.user_id).await?;
    let token = session::create_session(&state.pool, user.user_id, SessionDomain::Admin).await?;
    audit::record(
        &state.pool,
        Some(user.user_id),
        audit::ADMIN_LOGIN_SUCCESS,
        "users",
        Some(user.user_id),
        json!({ "username": user.username }),
    )
    .await;

    let jar = jar.add(session_cookie(ADMIN_COOKIE_NAME, token));
    Ok((jar, Json(user)))
}

/// `POST /api/admin/auth/logout`: delete the session, audit the logout when
/// the cookie still maps to one, and expire the cookie either way.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(token) = jar.get(ADMIN_COOKIE_NAME).map(Cookie::value) {
        match session::validate_session(&state.pool, token, SessionDomain::Admin).await {
            Ok(Some(user)) => {
                audit::record(
                    &state.pool,
                    Some(user.user_id),
                    audit::ADMIN_LOGOUT,
                    "users",
                    Some(user.user_id),
                    json!({ "username": user.username }),
                )
                .await;
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "session lookup failed during logout"),
        }
        if let Err(err) = session::delete_session(&state.pool, token).await {
            tracing::warn!(error = %err, "session delete failed during logout");
        }
    }

    let jar = CookieJar::new().add(clear_cookie(ADMIN_COOKIE_NAME));
    (jar, StatusCode::NO_CONTENT)
}

/// `GET /api/admin/users/me`: return the caller's identity.
pub async fn me(auth: AdminUser) -> Json<AuthedUser> {
    Json(auth.user)
}

#[cfg(test)]
#[path = "admin_auth_test.rs"]
mod tests;
