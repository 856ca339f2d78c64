use super::*;

fn guard() -> NavigationGuard {
    NavigationGuard::default()
}

fn target<'a>(path: &'a str, matched: &'a [RouteMeta]) -> RouteTarget<'a> {
    RouteTarget { full_path: path, path, matched }
}

// =============================================================================
// Domain classification
// =============================================================================

#[test]
fn classify_defaults_to_customer() {
    let matched = [RouteMeta::public()];
    assert_eq!(guard().classify(&target("/about", &matched)), Domain::Customer);
}

#[test]
fn classify_admin_when_any_matched_record_is_admin_marked() {
    let matched = [RouteMeta::public(), RouteMeta::admin_protected()];
    assert_eq!(guard().classify(&target("/admin/users", &matched)), Domain::Admin);
}

#[test]
fn classify_admin_from_parent_record() {
    // A nested child route inherits the domain from an admin-marked parent.
    let matched = [
        RouteMeta { requires_auth: true, admin: true },
        RouteMeta { requires_auth: false, admin: false },
    ];
    assert_eq!(guard().classify(&target("/admin/users/3", &matched)), Domain::Admin);
}

// =============================================================================
// Protected routes
// =============================================================================

#[test]
fn unauthenticated_protected_route_redirects_to_login_with_redirect_param() {
    let matched = [RouteMeta::protected()];
    let decision = guard().decide(
        &target("/accounts/42", &matched),
        SessionView::default(),
    );
    assert_eq!(
        decision,
        GuardDecision::Redirect {
            path: "/login".to_owned(),
            redirect: Some("/accounts/42".to_owned()),
        }
    );
}

#[test]
fn redirect_param_carries_the_full_path_with_query() {
    let matched = [RouteMeta::protected()];
    let target = RouteTarget {
        full_path: "/accounts/42?tab=statement",
        path: "/accounts/42",
        matched: &matched,
    };
    let decision = guard().decide(&target, SessionView::default());
    assert_eq!(
        decision,
        GuardDecision::Redirect {
            path: "/login".to_owned(),
            redirect: Some("/accounts/42?tab=statement".to_owned()),
        }
    );
}

#[test]
fn authenticated_protected_route_is_allowed() {
    let matched = [RouteMeta::protected()];
    let sessions = SessionView { customer_authenticated: true, admin_authenticated: false };
    assert_eq!(
        guard().decide(&target("/accounts/42", &matched), sessions),
        GuardDecision::Allow
    );
}

#[test]
fn unauthenticated_admin_route_redirects_to_admin_login() {
    let matched = [RouteMeta::admin_protected()];
    let decision = guard().decide(&target("/admin/audit", &matched), SessionView::default());
    assert_eq!(
        decision,
        GuardDecision::Redirect {
            path: "/admin/login".to_owned(),
            redirect: Some("/admin/audit".to_owned()),
        }
    );
}

#[test]
fn customer_session_does_not_unlock_admin_routes() {
    let matched = [RouteMeta::admin_protected()];
    let sessions = SessionView { customer_authenticated: true, admin_authenticated: false };
    let decision = guard().decide(&target("/admin/audit", &matched), sessions);
    assert!(matches!(decision, GuardDecision::Redirect { path, .. } if path == "/admin/login"));
}

#[test]
fn admin_session_does_not_unlock_customer_routes() {
    let matched = [RouteMeta::protected()];
    let sessions = SessionView { customer_authenticated: false, admin_authenticated: true };
    let decision = guard().decide(&target("/accounts/42", &matched), sessions);
    assert!(matches!(decision, GuardDecision::Redirect { path, .. } if path == "/login"));
}

// =============================================================================
// Login routes
// =============================================================================

#[test]
fn authenticated_visit_to_login_bounces_to_landing() {
    let matched = [RouteMeta::public()];
    let sessions = SessionView { customer_authenticated: true, admin_authenticated: false };
    assert_eq!(
        guard().decide(&target("/login", &matched), sessions),
        GuardDecision::Redirect { path: "/dashboard".to_owned(), redirect: None }
    );
}

#[test]
fn unauthenticated_visit_to_login_is_allowed() {
    let matched = [RouteMeta::public()];
    assert_eq!(
        guard().decide(&target("/login", &matched), SessionView::default()),
        GuardDecision::Allow
    );
}

#[test]
fn authenticated_admin_visit_to_admin_login_bounces_to_admin_landing() {
    let matched = [RouteMeta { requires_auth: false, admin: true }];
    let sessions = SessionView { customer_authenticated: false, admin_authenticated: true };
    assert_eq!(
        guard().decide(&target("/admin/login", &matched), sessions),
        GuardDecision::Redirect { path: "/admin".to_owned(), redirect: None }
    );
}

// =============================================================================
// Public routes
// =============================================================================

#[test]
fn public_route_allowed_regardless_of_sessions() {
    let matched = [RouteMeta::public()];
    assert_eq!(
        guard().decide(&target("/about", &matched), SessionView::default()),
        GuardDecision::Allow
    );
    let both = SessionView { customer_authenticated: true, admin_authenticated: true };
    assert_eq!(guard().decide(&target("/about", &matched), both), GuardDecision::Allow);
}

#[test]
fn empty_matched_chain_is_a_public_customer_route() {
    assert_eq!(
        guard().decide(&target("/", &[]), SessionView::default()),
        GuardDecision::Allow
    );
}
