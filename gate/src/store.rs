//! Session store: the per-domain authentication state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! One store exists per identity domain (customer, admin), constructed at
//! app start and threaded explicitly to the guard and UI bindings. It
//! caches the backend's view of the session; the HTTP-only cookie is the
//! source of truth and the cache can desynchronize until the next
//! `check_status` call.
//!
//! DESIGN
//! ======
//! - `is_authenticated` is true exactly when an identity is cached; every
//!   transition out of the authenticated state drops both in one step, so
//!   there is never a stale-identity window.
//! - Operations take `&mut self`: two calls on one store can never be in
//!   flight at once, and sharing a store across tasks goes through a lock
//!   that serializes them the same way.
//! - `login` is the only operation that surfaces errors to the caller;
//!   `logout` and `check_status` reset state silently.

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use std::sync::Arc;

use crate::api::{AuthApi, AuthError, Credentials};
use crate::domain::DomainConfig;
use crate::identity::Identity;
use crate::marker::MarkerStore;

/// Fallback login error for the rare failure that carries no message of
/// its own.
const LOGIN_FALLBACK_ERROR: &str = "Login failed. Please try again.";

/// Cached session state for one identity domain.
pub struct SessionStore {
    config: DomainConfig,
    api: Arc<dyn AuthApi>,
    marker: Arc<dyn MarkerStore>,
    identity: Option<Identity>,
    last_error: Option<String>,
    is_loading: bool,
    hydrated: bool,
}

impl SessionStore {
    /// A fresh, unauthenticated store for `config`'s domain.
    #[must_use]
    pub fn new(config: DomainConfig, api: Arc<dyn AuthApi>, marker: Arc<dyn MarkerStore>) -> Self {
        Self {
            config,
            api,
            marker,
            identity: None,
            last_error: None,
            is_loading: false,
            hydrated: false,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// True exactly when an identity is cached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Message from the most recent failed login, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    /// Whether any operation has settled since construction.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Authentication view for the navigation guard.
    ///
    /// Until the first operation settles this falls back to the persisted
    /// marker, a fast hint only; once hydrated the real flag wins.
    #[must_use]
    pub fn guard_hint(&self) -> bool {
        if self.hydrated {
            self.is_authenticated()
        } else {
            self.marker.get(self.config.marker_key)
        }
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Attempt a login. Returns whether the store ended authenticated.
    ///
    /// On failure, `last_error` holds the most specific message available:
    /// the server's detail string, else the failure's own message, else a
    /// fixed fallback. Loading is cleared on every path.
    pub async fn login(&mut self, credentials: &Credentials) -> bool {
        self.is_loading = true;
        self.last_error = None;

        let success = match self.api.login(credentials).await {
            Ok(identity) => {
                self.identity = Some(identity);
                self.marker.set(self.config.marker_key, true);
                true
            }
            Err(err) => {
                self.last_error = Some(login_error_message(&err));
                self.clear_session();
                false
            }
        };

        self.is_loading = false;
        self.hydrated = true;
        success
    }

    /// Sign out. Local state is cleared even when the backend call fails;
    /// the failure is logged, never surfaced.
    pub async fn logout(&mut self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!(
                domain = self.config.domain.as_str(),
                error = %err,
                "logout request failed; clearing local session anyway"
            );
        }
        self.clear_session();
        self.last_error = None;
        self.hydrated = true;
    }

    /// Refresh the cached session from the backend.
    ///
    /// Passive probe: any failure clears the session without recording an
    /// error, and an existing `last_error` is left untouched.
    pub async fn check_status(&mut self) -> bool {
        let success = match self.api.whoami().await {
            Ok(identity) => {
                self.identity = Some(identity);
                self.marker.set(self.config.marker_key, true);
                true
            }
            Err(_) => {
                self.clear_session();
                false
            }
        };
        self.hydrated = true;
        success
    }

    /// Drop identity, authentication flag and marker in one step.
    fn clear_session(&mut self) {
        self.identity = None;
        self.marker.set(self.config.marker_key, false);
    }
}

/// Most specific message for a failed login: server detail, else the
/// failure's own message, else the fixed fallback.
fn login_error_message(err: &AuthError) -> String {
    if let Some(detail) = err.detail() {
        return detail.to_owned();
    }
    let message = err.to_string();
    if message.is_empty() {
        LOGIN_FALLBACK_ERROR.to_owned()
    } else {
        message
    }
}
