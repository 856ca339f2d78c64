//! Per-domain configuration for the two identity domains.
//!
//! DESIGN
//! ======
//! The customer portal and the admin panel run identical session machinery
//! against different endpoints, routes and storage keys. One config struct
//! instantiated twice replaces two copy-pasted store/guard pairs.

#[cfg(test)]
#[path = "domain_test.rs"]
mod tests;

/// Which identity domain a session, route or marker belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    Customer,
    Admin,
}

impl Domain {
    /// Lowercase name used in logs and storage keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

/// Endpoints, SPA routes and storage key for one identity domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainConfig {
    pub domain: Domain,
    /// SPA route presenting the login form.
    pub login_route: &'static str,
    /// SPA route an already-authenticated visit to the login form lands on.
    pub landing_route: &'static str,
    /// Backend endpoint paths, relative to the API base URL.
    pub login_endpoint: &'static str,
    pub logout_endpoint: &'static str,
    pub whoami_endpoint: &'static str,
    /// Client-side storage key for the non-authoritative logged-in marker.
    pub marker_key: &'static str,
}

impl DomainConfig {
    /// Customer-portal domain.
    #[must_use]
    pub fn customer() -> Self {
        Self {
            domain: Domain::Customer,
            login_route: "/login",
            landing_route: "/dashboard",
            login_endpoint: "/api/v1/auth/login",
            logout_endpoint: "/api/v1/auth/logout",
            whoami_endpoint: "/api/v1/auth/me",
            marker_key: "ledgerbank.customer.logged_in",
        }
    }

    /// Admin back-office domain.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            domain: Domain::Admin,
            login_route: "/admin/login",
            landing_route: "/admin",
            login_endpoint: "/api/admin/auth/login",
            logout_endpoint: "/api/admin/auth/logout",
            whoami_endpoint: "/api/admin/users/me",
            marker_key: "ledgerbank.admin.logged_in",
        }
    }
}
