use super::*;

// =============================================================================
// DomainConfig::customer
// =============================================================================

#[test]
fn customer_config_routes() {
    let config = DomainConfig::customer();
    assert_eq!(config.domain, Domain::Customer);
    assert_eq!(config.login_route, "/login");
    assert_eq!(config.landing_route, "/dashboard");
}

#[test]
fn customer_config_endpoints_under_v1() {
    let config = DomainConfig::customer();
    assert!(config.login_endpoint.starts_with("/api/v1/"));
    assert!(config.logout_endpoint.starts_with("/api/v1/"));
    assert!(config.whoami_endpoint.starts_with("/api/v1/"));
}

// =============================================================================
// DomainConfig::admin
// =============================================================================

#[test]
fn admin_config_routes() {
    let config = DomainConfig::admin();
    assert_eq!(config.domain, Domain::Admin);
    assert_eq!(config.login_route, "/admin/login");
    assert_eq!(config.landing_route, "/admin");
}

#[test]
fn admin_config_endpoints_under_admin() {
    let config = DomainConfig::admin();
    assert!(config.login_endpoint.starts_with("/api/admin/"));
    assert!(config.logout_endpoint.starts_with("/api/admin/"));
    assert!(config.whoami_endpoint.starts_with("/api/admin/"));
}

// =============================================================================
// Cross-domain isolation
// =============================================================================

#[test]
fn domains_use_distinct_marker_keys() {
    assert_ne!(
        DomainConfig::customer().marker_key,
        DomainConfig::admin().marker_key
    );
}

#[test]
fn domains_use_distinct_login_routes() {
    assert_ne!(
        DomainConfig::customer().login_route,
        DomainConfig::admin().login_route
    );
}

#[test]
fn domain_as_str_names() {
    assert_eq!(Domain::Customer.as_str(), "customer");
    assert_eq!(Domain::Admin.as_str(), "admin");
}
