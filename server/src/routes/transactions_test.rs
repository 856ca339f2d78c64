use super::*;

#[test]
fn movement_request_deserializes_with_optional_description() {
    let payload: MovementRequest = serde_json::from_value(serde_json::json!({
        "account_id": 3,
        "amount_cents": 1500
    }))
    .unwrap();
    assert_eq!(payload.account_id, 3);
    assert_eq!(payload.amount_cents, 1500);
    assert!(payload.description.is_none());
}

#[test]
fn portal_transfer_addresses_the_recipient_by_number() {
    let payload: PortalTransferRequest = serde_json::from_value(serde_json::json!({
        "from_account_id": 1,
        "to_account_number": "1000000002",
        "amount_cents": 2500,
        "description": "rent"
    }))
    .unwrap();
    assert_eq!(payload.to_account_number, "1000000002");
    assert_eq!(payload.description.as_deref(), Some("rent"));
}

#[test]
fn ach_and_wire_directions_use_lowercase_names() {
    let payload: AchRequest = serde_json::from_value(serde_json::json!({
        "account_id": 4,
        "amount_cents": 100_00,
        "direction": "credit"
    }))
    .unwrap();
    assert_eq!(payload.direction, AchDirection::Credit);

    let payload: WireRequest = serde_json::from_value(serde_json::json!({
        "account_id": 4,
        "amount_cents": 100_00,
        "direction": "outgoing"
    }))
    .unwrap();
    assert_eq!(payload.direction, WireDirection::Outgoing);

    let bad = serde_json::from_value::<AchRequest>(serde_json::json!({
        "account_id": 4,
        "amount_cents": 100_00,
        "direction": "sideways"
    }));
    assert!(bad.is_err());
}

#[test]
fn list_query_accepts_type_as_the_filter_name() {
    let query: TransactionListQuery =
        serde_json::from_value(serde_json::json!({ "type": "deposit", "page": 2 })).unwrap();
    assert_eq!(query.type_name.as_deref(), Some("deposit"));
    assert_eq!(query.page, Some(2));
    assert!(query.start_date.is_none());
}
