//! Identity payload returned by the login and whoami endpoints.

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// The authenticated caller as reported by the backend.
///
/// Replaced wholesale on login/refresh, never partially mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role_name: String,
    pub is_active: bool,
    /// Linked customer profile, present only for customer-domain users.
    #[serde(default)]
    pub customer_id: Option<i64>,
}
