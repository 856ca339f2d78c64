use super::*;

#[test]
fn constructors_set_expected_statuses() {
    assert_eq!(ApiError::bad_request("x").status, StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::unauthorized("x").status, StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::forbidden("x").status, StatusCode::FORBIDDEN);
    assert_eq!(ApiError::not_found("x").status, StatusCode::NOT_FOUND);
    assert_eq!(ApiError::conflict("x").status, StatusCode::CONFLICT);
    assert_eq!(ApiError::unprocessable("x").status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ApiError::internal().status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(ApiError::internal().detail, "Internal server error");
}

#[tokio::test]
async fn response_body_is_detail_json() {
    let response = ApiError::not_found("Account not found").into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "detail": "Account not found" }));
}

#[test]
fn database_errors_collapse_to_opaque_500() {
    let err = ApiError::from(sqlx::Error::RowNotFound);
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.detail, "Internal server error");
}

#[test]
fn user_errors_map_to_portal_statuses() {
    let err = ApiError::from(UserError::InvalidCredentials);
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.detail, "Incorrect username or password");

    let err = ApiError::from(UserError::Inactive);
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.detail, "Inactive user. Please contact support.");

    let err = ApiError::from(UserError::PasswordTooShort);
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(ApiError::from(UserError::UsernameTaken).status, StatusCode::CONFLICT);
    assert_eq!(ApiError::from(UserError::EmailTaken).status, StatusCode::CONFLICT);
    assert_eq!(ApiError::from(UserError::NotFound(9)).status, StatusCode::NOT_FOUND);

    let err = ApiError::from(UserError::UnknownRole("wizard".to_string()));
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert!(err.detail.contains("wizard"));
}

#[test]
fn account_errors_carry_the_offending_name() {
    let err = ApiError::from(AccountError::InvalidType("gold".to_string()));
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.detail, "Invalid account type: gold");

    let err = ApiError::from(AccountError::UnknownStatus("dormant".to_string()));
    assert_eq!(err.detail, "Invalid account status: dormant");

    let err = ApiError::from(AccountError::NonZeroBalanceClose);
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.detail, "Cannot close an account with a non-zero balance");

    assert_eq!(ApiError::from(AccountError::NotFound(1)).status, StatusCode::NOT_FOUND);
}

#[test]
fn transaction_rejections_map_to_bad_requests() {
    for err in [
        TransactionError::AccountNotActive,
        TransactionError::NonPositiveAmount,
        TransactionError::AmountOutOfRange,
        TransactionError::InsufficientFunds,
        TransactionError::SelfTransfer,
    ] {
        assert_eq!(ApiError::from(err).status, StatusCode::BAD_REQUEST);
    }
    assert_eq!(
        ApiError::from(TransactionError::AccountNotFound(4)).status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        ApiError::from(TransactionError::InsufficientFunds).detail,
        "Insufficient funds"
    );
}

#[test]
fn fee_errors_recurse_into_transaction_mapping() {
    let err = ApiError::from(FeeError::UnknownFee("late_fee".to_string()));
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.detail, "Fee type not found: late_fee");

    let err = ApiError::from(FeeError::Transaction(TransactionError::InsufficientFunds));
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.detail, "Insufficient funds");
}

#[test]
fn currency_rate_miss_names_both_currencies() {
    let err = ApiError::from(CurrencyError::RateNotFound {
        from: "USD".to_string(),
        to: "JPY".to_string(),
    });
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.detail, "No exchange rate from USD to JPY");
}

#[test]
fn statement_date_errors_explain_the_format() {
    let err = ApiError::from(StatementError::InvalidDate("01/02/2026".to_string()));
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.detail, "Invalid date: 01/02/2026. Expected YYYY-MM-DD");

    let err = ApiError::from(StatementError::InvertedRange);
    assert_eq!(err.detail, "Start date must not be after end date");
}

#[test]
fn report_access_errors_are_forbidden() {
    let err = ApiError::from(ReportError::NotOwned);
    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert_eq!(err.detail, "You do not have access to this account");

    assert_eq!(ApiError::from(ReportError::AccountNotFound(2)).status, StatusCode::NOT_FOUND);
}
