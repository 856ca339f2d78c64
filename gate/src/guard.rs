//! Navigation guard: pure route-transition decisions.
//!
//! DESIGN
//! ======
//! Runs synchronously before every route transition and reads cached
//! boolean state only; the stores own all mutation. No network call ever
//! happens here, which is what makes per-navigation execution safe.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use crate::domain::{Domain, DomainConfig};
use crate::store::SessionStore;

/// Static metadata contributed by one matched route record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Route requires an authenticated session in its domain.
    pub requires_auth: bool,
    /// Route record belongs to the admin domain.
    pub admin: bool,
}

impl RouteMeta {
    /// Public route, no markers.
    #[must_use]
    pub fn public() -> Self {
        Self::default()
    }

    /// Customer-domain route requiring authentication.
    #[must_use]
    pub fn protected() -> Self {
        Self { requires_auth: true, admin: false }
    }

    /// Admin-domain route requiring authentication.
    #[must_use]
    pub fn admin_protected() -> Self {
        Self { requires_auth: true, admin: true }
    }
}

/// Target of a navigation: paths plus the matched chain's metadata.
#[derive(Clone, Copy, Debug)]
pub struct RouteTarget<'a> {
    /// Full path including query, carried as the `redirect` parameter.
    pub full_path: &'a str,
    /// Path without query, compared against the domain's login route.
    pub path: &'a str,
    /// Metadata of every matched route record, outermost first.
    pub matched: &'a [RouteMeta],
}

/// Authentication view of both domains at decision time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionView {
    pub customer_authenticated: bool,
    pub admin_authenticated: bool,
}

impl SessionView {
    /// Snapshot both stores through their guard hints.
    #[must_use]
    pub fn from_stores(customer: &SessionStore, admin: &SessionStore) -> Self {
        Self {
            customer_authenticated: customer.guard_hint(),
            admin_authenticated: admin.guard_hint(),
        }
    }

    fn authenticated(self, domain: Domain) -> bool {
        match domain {
            Domain::Customer => self.customer_authenticated,
            Domain::Admin => self.admin_authenticated,
        }
    }
}

/// Outcome of a guard decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the transition proceed unchanged.
    Allow,
    /// Send the navigation to `path` instead, optionally attaching the
    /// original full path as the `redirect` query parameter.
    Redirect { path: String, redirect: Option<String> },
}

/// Route-transition guard over the two domain configs.
pub struct NavigationGuard {
    customer: DomainConfig,
    admin: DomainConfig,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(customer: DomainConfig, admin: DomainConfig) -> Self {
        Self { customer, admin }
    }

    /// Classify a target by its matched chain: any admin-marked record
    /// puts the whole navigation in the admin domain.
    #[must_use]
    pub fn classify(&self, target: &RouteTarget<'_>) -> Domain {
        if target.matched.iter().any(|meta| meta.admin) {
            Domain::Admin
        } else {
            Domain::Customer
        }
    }

    /// Decide one route transition.
    #[must_use]
    pub fn decide(&self, target: &RouteTarget<'_>, sessions: SessionView) -> GuardDecision {
        let domain = self.classify(target);
        let config = match domain {
            Domain::Customer => &self.customer,
            Domain::Admin => &self.admin,
        };
        let authenticated = sessions.authenticated(domain);

        // Authenticated visits to the login form bounce to the landing
        // route; unauthenticated ones proceed.
        if target.path == config.login_route {
            if authenticated {
                return GuardDecision::Redirect {
                    path: config.landing_route.to_owned(),
                    redirect: None,
                };
            }
            return GuardDecision::Allow;
        }

        let requires_auth = target.matched.iter().any(|meta| meta.requires_auth);
        if requires_auth && !authenticated {
            return GuardDecision::Redirect {
                path: config.login_route.to_owned(),
                redirect: Some(target.full_path.to_owned()),
            };
        }

        GuardDecision::Allow
    }
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new(DomainConfig::customer(), DomainConfig::admin())
    }
}
