//! Cookie-session management.
//!
//! ARCHITECTURE
//! ============
//! Both frontends authenticate with an opaque random token stored server-side
//! in the `sessions` table and carried in an HTTP-only cookie. Customer and
//! admin sessions share the table but are tagged with a `domain` column, so a
//! token minted for one surface never validates on the other.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgPool, Row};

const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Which authentication surface a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDomain {
    Customer,
    Admin,
}

impl SessionDomain {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

fn session_ttl_hours() -> i64 {
    std::env::var("SESSION_TTL_HOURS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|hours| *hours > 0)
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
}

/// User row returned from session validation. Shape matches what the
/// frontends cache as their identity payload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthedUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role_name: String,
    pub is_active: bool,
    pub customer_id: Option<i64>,
}

/// Create a session for the given user and domain, returning the token.
pub async fn create_session(
    pool: &PgPool,
    user_id: i64,
    domain: SessionDomain,
) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query(
        "INSERT INTO sessions (token, user_id, domain, expires_at)
         VALUES ($1, $2, $3, now() + make_interval(hours => $4::int))",
    )
    .bind(&token)
    .bind(user_id)
    .bind(domain.as_str())
    .bind(session_ttl_hours())
    .execute(pool)
    .await?;
    Ok(token)
}

/// Validate a session token for a domain and return the associated user.
pub async fn validate_session(
    pool: &PgPool,
    token: &str,
    domain: SessionDomain,
) -> Result<Option<AuthedUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT
              u.user_id,
              u.username,
              u.email,
              r.role_name,
              u.is_active,
              u.customer_id
          FROM sessions s
          JOIN users u ON u.user_id = s.user_id
          JOIN roles r ON r.role_id = u.role_id
          WHERE s.token = $1 AND s.domain = $2 AND s.expires_at > now()",
    )
    .bind(token)
    .bind(domain.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| AuthedUser {
        user_id: r.get("user_id"),
        username: r.get("username"),
        email: r.get("email"),
        role_name: r.get("role_name"),
        is_active: r.get("is_active"),
        customer_id: r.get("customer_id"),
    }))
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
