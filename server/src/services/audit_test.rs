use super::*;

// =============================================================================
// filter SQL assembly
// =============================================================================

#[test]
fn no_filters_is_where_true_only() {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM audit_log a");
    push_filters(&mut builder, &AuditFilters::default());
    assert_eq!(builder.sql(), "SELECT COUNT(*) FROM audit_log a WHERE TRUE");
}

#[test]
fn username_filter_is_exact_match() {
    let mut builder = QueryBuilder::new("SELECT 1");
    let filters = AuditFilters { username: Some("alice".into()), ..Default::default() };
    push_filters(&mut builder, &filters);
    assert!(builder.sql().contains("u.username = $1"));
    assert!(!builder.sql().contains("ILIKE $1"));
}

#[test]
fn action_and_entity_filters_use_ilike() {
    let mut builder = QueryBuilder::new("SELECT 1");
    let filters = AuditFilters {
        action_type: Some("LOGIN".into()),
        target_entity: Some("account".into()),
        ..Default::default()
    };
    push_filters(&mut builder, &filters);
    let sql = builder.sql();
    assert!(sql.contains("a.action_type ILIKE $1"));
    assert!(sql.contains("a.target_entity ILIKE $2"));
}

#[test]
fn target_id_filter_casts_to_text() {
    let mut builder = QueryBuilder::new("SELECT 1");
    let filters = AuditFilters { target_id: Some("42".into()), ..Default::default() };
    push_filters(&mut builder, &filters);
    assert!(builder.sql().contains("CAST(a.target_id AS TEXT) ILIKE $1"));
}

#[test]
fn end_date_covers_the_whole_day() {
    let mut builder = QueryBuilder::new("SELECT 1");
    let filters = AuditFilters {
        start_date: Some("2025-01-01".into()),
        end_date: Some("2025-01-31".into()),
        ..Default::default()
    };
    push_filters(&mut builder, &filters);
    let sql = builder.sql();
    assert!(sql.contains("a.logged_at >= $1::date"));
    assert!(sql.contains("a.logged_at < ($2::date + INTERVAL '1 day')"));
}

#[test]
fn all_filters_bind_in_order() {
    let mut builder = QueryBuilder::new("SELECT 1");
    let filters = AuditFilters {
        username: Some("root".into()),
        action_type: Some("FEE".into()),
        target_entity: Some("account".into()),
        target_id: Some("9".into()),
        start_date: Some("2025-06-01".into()),
        end_date: Some("2025-06-30".into()),
    };
    push_filters(&mut builder, &filters);
    let sql = builder.sql();
    for placeholder in ["$1", "$2", "$3", "$4", "$5", "$6"] {
        assert!(sql.contains(placeholder), "missing {placeholder} in {sql}");
    }
}

// =============================================================================
// AuditEntry serialization
// =============================================================================

#[test]
fn audit_entry_serializes_details_json() {
    let entry = AuditEntry {
        log_id: 1,
        user_id: Some(2),
        username: Some("root".into()),
        action_type: ADMIN_LOGIN_SUCCESS.into(),
        target_entity: "user".into(),
        target_id: Some(2),
        details: Some(serde_json::json!({ "ip": "127.0.0.1" })),
        logged_at: "2025-03-01T12:00:00Z".into(),
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["action_type"], "ADMIN_LOGIN_SUCCESS");
    assert_eq!(json["details"]["ip"], "127.0.0.1");
}

#[test]
fn audit_entry_tolerates_system_events() {
    let entry = AuditEntry {
        log_id: 2,
        user_id: None,
        username: None,
        action_type: OVERDRAFT_USED.into(),
        target_entity: "account".into(),
        target_id: Some(5),
        details: None,
        logged_at: "2025-03-01T12:00:00Z".into(),
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert!(json["user_id"].is_null());
    assert!(json["username"].is_null());
    assert!(json["details"].is_null());
}

// =============================================================================
// action type constants
// =============================================================================

#[test]
fn action_types_are_distinct() {
    let all = [
        ADMIN_LOGIN_SUCCESS,
        ADMIN_LOGIN_PERMISSION_DENIED,
        ADMIN_LOGOUT,
        USER_REGISTERED,
        ACCOUNT_STATUS_CHANGE,
        OVERDRAFT_LIMIT_CHANGE,
        OVERDRAFT_USED,
        FEE_APPLIED,
    ];
    let unique: std::collections::HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), all.len());
}
