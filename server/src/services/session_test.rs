use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_single_byte() {
    assert_eq!(bytes_to_hex(&[0xff]), "ff");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
}

#[test]
fn generate_token_all_valid_hex() {
    let token = generate_token();
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    let a = generate_token();
    let b = generate_token();
    assert_ne!(a, b);
}

// =============================================================================
// SessionDomain
// =============================================================================

#[test]
fn domain_strings_match_schema_check() {
    assert_eq!(SessionDomain::Customer.as_str(), "customer");
    assert_eq!(SessionDomain::Admin.as_str(), "admin");
}

#[test]
fn domains_are_distinct() {
    assert_ne!(SessionDomain::Customer, SessionDomain::Admin);
}

// =============================================================================
// AuthedUser
// =============================================================================

#[test]
fn authed_user_serializes_identity_fields() {
    let user = AuthedUser {
        user_id: 7,
        username: "alice".into(),
        email: "alice@example.com".into(),
        role_name: "customer".into(),
        is_active: true,
        customer_id: Some(3),
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["user_id"], 7);
    assert_eq!(json["username"], "alice");
    assert_eq!(json["role_name"], "customer");
    assert_eq!(json["customer_id"], 3);
}

#[test]
fn authed_user_serializes_null_customer_id() {
    let user = AuthedUser {
        user_id: 1,
        username: "root".into(),
        email: "root@example.com".into(),
        role_name: "admin".into(),
        is_active: true,
        customer_id: None,
    };
    let json = serde_json::to_value(&user).unwrap();
    assert!(json["customer_id"].is_null());
}

// =============================================================================
// session_ttl_hours
// =============================================================================

#[test]
fn ttl_defaults_to_24() {
    // Runs without SESSION_TTL_HOURS set in the test environment.
    if std::env::var("SESSION_TTL_HOURS").is_err() {
        assert_eq!(session_ttl_hours(), DEFAULT_SESSION_TTL_HOURS);
    }
}
