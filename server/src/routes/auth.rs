//! Customer-portal auth routes and the session-cookie extractor.
//!
//! SYSTEM CONTEXT
//! ==============
//! The portal SPA authenticates once against `/api/v1/auth/login` and then
//! relies on the HTTP-only `session_token` cookie for every call. The client
//! never reads the cookie; it learns its auth state from `/api/v1/auth/me`.
//! Admin sessions live in the same table under a different domain and cookie
//! (see `admin_auth`), so a customer cookie can never unlock admin routes.

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::error::ApiError;
use crate::services::session::{self, AuthedUser, SessionDomain};
use crate::services::{audit, user};
use crate::state::AppState;

pub const COOKIE_NAME: &str = "session_token";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// `Secure` cookie attribute: explicit `COOKIE_SECURE` wins, otherwise only
/// set over an https public URL.
pub(crate) fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("PUBLIC_BASE_URL")
        .map(|url| url.starts_with("https://"))
        .unwrap_or(false)
}

pub(crate) fn session_cookie(name: &'static str, token: String) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .build()
}

pub(crate) fn clear_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated portal user extracted from the `session_token` cookie.
/// Use as a handler parameter to require customer authentication.
pub struct CustomerUser {
    pub user: AuthedUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for CustomerUser
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
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(ApiError::unauthorized("Not authenticated"));
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token, SessionDomain::Customer)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /api/v1/auth/login`: verify credentials, reject inactive users, set
/// the session cookie and return the caller's identity.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = user::authenticate(&state.pool, &payload.username, &payload.password).await?;
    if !user.is_active {
        return Err(ApiError::bad_request("Inactive user. Please contact support."));
    }

    user::touch_last_login(&state.pool, user.user_id).await?;
    let token = session::create_session(&state.pool, user.user_id, SessionDomain::Customer).await?;

    let jar = jar.add(session_cookie(COOKIE_NAME, token));
    Ok((jar, Json(user)))
}

/// `POST /api/v1/auth/logout`: delete the session row and expire the cookie.
/// Succeeds even without a valid session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(token) = jar.get(COOKIE_NAME).map(Cookie::value) {
        if let Err(err) = session::delete_session(&state.pool, token).await {
            tracing::warn!(error = %err, "session delete failed during logout");
        }
    }

    let jar = CookieJar::new().add(clear_cookie(COOKIE_NAME));
    (jar, StatusCode::NO_CONTENT)
}

/// `GET /api/v1/auth/me`: return the caller's identity.
pub async fn me(auth: CustomerUser) -> Json<AuthedUser> {
    Json(auth.user)
}

/// `POST /api/v1/auth/register`: create user + customer profile + initial
/// savings account. Does not log the new user in.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<user::NewRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    let created = user::register(&state.pool, &payload).await?;
    audit::record(
        &state.pool,
        Some(created.user_id),
        audit::USER_REGISTERED,
        "users",
        Some(created.user_id),
        json!({ "username": created.username }),
    )
    .await;
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
