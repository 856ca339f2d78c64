//! Session authentication gate shared by the customer portal and the admin
//! back-office.
//!
//! This crate owns the client-side session machinery both SPAs embed: a
//! per-domain session store caching the backend's view of the session, a
//! typed HTTP boundary to the auth endpoints, and a synchronous navigation
//! guard. The backend's HTTP-only cookie is the source of truth; everything
//! here is a cache of it, refreshed through call outcomes.
//!
//! One [`DomainConfig`] parameterizes the whole stack per identity domain
//! (customer, admin), so the two domains share one state machine instead of
//! two hand-copied ones.

pub mod api;
pub mod domain;
pub mod guard;
pub mod identity;
pub mod marker;
pub mod store;

pub use api::{AuthApi, AuthError, Credentials, HttpAuthApi};
pub use domain::{Domain, DomainConfig};
pub use guard::{GuardDecision, NavigationGuard, RouteMeta, RouteTarget, SessionView};
pub use identity::Identity;
pub use marker::{MarkerStore, MemoryMarker};
pub use store::SessionStore;
