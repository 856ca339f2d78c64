use super::*;

// =============================================================================
// env_bool: uses unique env var names to avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on"].iter().enumerate() {
        let key = format!("__TEST_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__TEST_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_case_insensitive_and_trimmed() {
    let key = "__TEST_EB_CI_71__";
    unsafe { std::env::set_var(key, "  TRUE  ") };
    assert_eq!(env_bool(key), Some(true));
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_bool_invalid_or_unset_returns_none() {
    let key = "__TEST_EB_INVALID_72__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };

    assert_eq!(env_bool("__TEST_EB_SURELY_UNSET_73__"), None);
}

#[test]
fn cookie_secure_https_inference_logic() {
    assert!("https://bank.example.com".starts_with("https://"));
    assert!(!"http://localhost:8080".starts_with("https://"));
}

// =============================================================================
// Cookie attributes
// =============================================================================

#[test]
fn session_cookie_is_http_only_lax_and_site_wide() {
    let cookie = session_cookie(COOKIE_NAME, "abc123".to_string());
    assert_eq!(cookie.name(), "session_token");
    assert_eq!(cookie.value(), "abc123");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}

#[test]
fn clear_cookie_expires_immediately() {
    let cookie = clear_cookie(COOKIE_NAME);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.http_only(), Some(true));
}

#[test]
fn login_request_deserializes() {
    let payload: LoginRequest =
        serde_json::from_value(json!({ "username": "alice", "password": "hunter22" })).unwrap();
    assert_eq!(payload.username, "alice");
    assert_eq!(payload.password, "hunter22");
}
