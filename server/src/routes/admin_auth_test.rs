use super::*;

#[test]
fn back_office_roles_are_admin_teller_auditor() {
    assert!(ALLOWED_ROLES.contains(&"admin"));
    assert!(ALLOWED_ROLES.contains(&"teller"));
    assert!(ALLOWED_ROLES.contains(&"auditor"));
    assert!(!ALLOWED_ROLES.contains(&"customer"));
}

#[test]
fn permission_denied_is_a_403_with_the_panel_message() {
    let err = permission_denied();
    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert_eq!(err.detail, "You do not have permission to access the admin panel.");
}

#[test]
fn admin_cookie_is_distinct_from_the_portal_cookie() {
    assert_ne!(ADMIN_COOKIE_NAME, crate::routes::auth::COOKIE_NAME);
    let cookie = session_cookie(ADMIN_COOKIE_NAME, "tok".to_string());
    assert_eq!(cookie.name(), "admin_session_token");
    assert_eq!(cookie.http_only(), Some(true));
}
