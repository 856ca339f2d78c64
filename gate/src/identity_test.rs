use super::*;

#[test]
fn deserializes_full_payload() {
    let body = r#"{
        "user_id": 7,
        "username": "alice",
        "email": "alice@example.com",
        "role_name": "customer",
        "is_active": true,
        "customer_id": 42
    }"#;
    let identity: Identity = serde_json::from_str(body).expect("valid payload");
    assert_eq!(identity.user_id, 7);
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.role_name, "customer");
    assert_eq!(identity.customer_id, Some(42));
}

#[test]
fn customer_id_defaults_to_none_when_absent() {
    let body = r#"{
        "user_id": 1,
        "username": "teller1",
        "email": "teller@example.com",
        "role_name": "teller",
        "is_active": true
    }"#;
    let identity: Identity = serde_json::from_str(body).expect("valid payload");
    assert_eq!(identity.customer_id, None);
}

#[test]
fn missing_username_fails_to_deserialize() {
    let body = r#"{
        "user_id": 1,
        "email": "x@example.com",
        "role_name": "customer",
        "is_active": true
    }"#;
    assert!(serde_json::from_str::<Identity>(body).is_err());
}

#[test]
fn round_trips_through_serde() {
    let identity = Identity {
        user_id: 3,
        username: "auditor1".to_owned(),
        email: "auditor@example.com".to_owned(),
        role_name: "auditor".to_owned(),
        is_active: false,
        customer_id: None,
    };
    let json = serde_json::to_string(&identity).expect("serialize");
    let back: Identity = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, identity);
}
