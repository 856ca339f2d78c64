//! HTTP error responses.
//!
//! ERROR HANDLING
//! ==============
//! Services return their own `thiserror` enums; handlers convert them into an
//! [`ApiError`] via the `From` impls below and bubble with `?`. Every error
//! response carries a `{"detail": "..."}` JSON body, which is the string the
//! frontends surface to users. Database failures are logged server-side and
//! collapse to an opaque 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::services::account::AccountError;
use crate::services::customer::CustomerError;
use crate::services::currency::CurrencyError;
use crate::services::fee::FeeError;
use crate::services::report::ReportError;
use crate::services::statement::StatementError;
use crate::services::transaction::TransactionError;
use crate::services::user::UserError;
use crate::services::validator::ValidatorError;

/// An HTTP status paired with the user-facing detail message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    #[must_use]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    #[must_use]
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    #[must_use]
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    #[must_use]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    #[must_use]
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, detail)
    }

    #[must_use]
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "database error");
        Self::internal()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidCredentials => Self::unauthorized("Incorrect username or password"),
            UserError::Inactive => Self::bad_request("Inactive user. Please contact support."),
            UserError::PasswordTooShort => {
                Self::unprocessable("Password must be at least 8 characters long")
            }
            UserError::UsernameTaken => Self::conflict("Username already registered"),
            UserError::EmailTaken => Self::conflict("Email already registered"),
            UserError::UnknownRole(name) => Self::bad_request(format!("Unknown role: {name}")),
            UserError::NotFound(_) => Self::not_found("User not found"),
            UserError::Hash(err) => {
                tracing::error!(error = %err, "password hashing failed");
                Self::internal()
            }
            UserError::Account(err) => err.into(),
            UserError::Database(err) => err.into(),
        }
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(_) => Self::not_found("Customer not found"),
            CustomerError::NoProfile => Self::not_found("Customer profile not found"),
            CustomerError::EmailTaken => Self::conflict("Email already registered"),
            CustomerError::Database(err) => err.into(),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self::not_found("Account not found"),
            AccountError::CustomerNotFound(_) => Self::not_found("Customer not found"),
            AccountError::InvalidType(name) => {
                Self::bad_request(format!("Invalid account type: {name}"))
            }
            AccountError::UnknownStatus(name) => {
                Self::bad_request(format!("Invalid account status: {name}"))
            }
            AccountError::NonZeroBalanceClose => {
                Self::bad_request("Cannot close an account with a non-zero balance")
            }
            AccountError::NegativeOverdraftLimit => {
                Self::bad_request("Overdraft limit cannot be negative")
            }
            AccountError::NumberSpaceExhausted => {
                tracing::error!("account number generation exhausted retries");
                Self::internal()
            }
            AccountError::Database(err) => err.into(),
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::AccountNotFound(_) => Self::not_found("Account not found"),
            TransactionError::NotFound(_) => Self::not_found("Transaction not found"),
            TransactionError::AccountNotActive => Self::bad_request("Account is not active"),
            TransactionError::NonPositiveAmount => Self::bad_request("Amount must be positive"),
            TransactionError::AmountOutOfRange => Self::bad_request("Amount out of range"),
            TransactionError::InsufficientFunds => Self::bad_request("Insufficient funds"),
            TransactionError::SelfTransfer => {
                Self::bad_request("Cannot transfer to the same account")
            }
            TransactionError::UnknownType(name) => {
                tracing::error!(type_name = %name, "transaction type missing from lookup table");
                Self::internal()
            }
            TransactionError::Database(err) => err.into(),
        }
    }
}

impl From<FeeError> for ApiError {
    fn from(err: FeeError) -> Self {
        match err {
            FeeError::UnknownFee(name) => Self::not_found(format!("Fee type not found: {name}")),
            FeeError::NonPositiveAmount => Self::bad_request("Fee amount must be positive."),
            FeeError::Transaction(err) => err.into(),
            FeeError::Database(err) => err.into(),
        }
    }
}

impl From<CurrencyError> for ApiError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::RateNotFound { from, to } => {
                Self::not_found(format!("No exchange rate from {from} to {to}"))
            }
            CurrencyError::Overflow => Self::bad_request("Amount out of range for conversion"),
            CurrencyError::Database(err) => err.into(),
        }
    }
}

impl From<StatementError> for ApiError {
    fn from(err: StatementError) -> Self {
        match err {
            StatementError::AccountNotFound(_) => Self::not_found("Account not found"),
            StatementError::InvalidDate(value) => {
                Self::bad_request(format!("Invalid date: {value}. Expected YYYY-MM-DD"))
            }
            StatementError::InvertedRange => {
                Self::bad_request("Start date must not be after end date")
            }
            StatementError::Database(err) => err.into(),
        }
    }
}

impl From<ValidatorError> for ApiError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::AccountNotFound(_) => Self::not_found("Account not found"),
            ValidatorError::Database(err) => err.into(),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::AccountNotFound(_) => Self::not_found("Account not found"),
            ReportError::NotOwned => {
                Self::forbidden("You do not have access to this account")
            }
            ReportError::InvalidDate(value) => {
                Self::bad_request(format!("Invalid date: {value}. Expected YYYY-MM-DD"))
            }
            ReportError::InvertedRange => {
                Self::bad_request("Start date must not be after end date")
            }
            ReportError::Database(err) => err.into(),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
