//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two SPAs talk to this server: the customer portal under `/api/v1` and the
//! back-office under `/api/admin`. Each surface has its own session cookie
//! and extractor; handlers live in per-resource modules below. `/healthz` is
//! unauthenticated for load balancers.

pub mod accounts;
pub mod admin_auth;
pub mod audit;
pub mod auth;
pub mod currency;
pub mod customers;
pub mod dashboard;
pub mod fees;
pub mod lookups;
pub mod reports;
pub mod transactions;
pub mod users;
pub mod validation;

use axum::Router;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post, put};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::dates;
use crate::error::ApiError;
use crate::state::AppState;

/// Reject a `YYYY-MM-DD` query parameter before it reaches a SQL cast.
pub(crate) fn check_date_param(value: Option<&str>) -> Result<(), ApiError> {
    if let Some(value) = value {
        if dates::parse_iso_date(value).is_none() {
            return Err(ApiError::bad_request(format!(
                "Invalid date: {value}. Expected YYYY-MM-DD"
            )));
        }
    }
    Ok(())
}

/// Credentialed CORS for the origins named in `CORS_ALLOWED_ORIGINS`
/// (comma-separated); a permissive cookie-less layer when unset.
fn cors_layer() -> CorsLayer {
    match std::env::var("CORS_ALLOWED_ORIGINS") {
        Ok(raw) => {
            let origins: Vec<HeaderValue> = raw
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true)
        }
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/register", post(auth::register))
        .route("/customers/me", get(customers::get_me).put(customers::update_me))
        .route("/accounts", post(accounts::open).get(accounts::list_own))
        .route("/accounts/{id}", get(accounts::get_own))
        .route("/accounts/{id}/statement", get(accounts::statement))
        .route("/accounts/{id}/transactions", get(accounts::history))
        .route("/transactions/deposit", post(transactions::deposit))
        .route("/transactions/withdraw", post(transactions::withdraw))
        .route("/transactions/transfer", post(transactions::transfer))
        .route("/reports/transactions/csv", get(reports::transactions_csv))
        .route("/currency/convert", get(currency::convert))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(admin_auth::login))
        .route("/auth/logout", post(admin_auth::logout))
        .route("/users/me", get(admin_auth::me))
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", put(users::update))
        .route("/customers", get(customers::list).post(customers::create))
        .route("/customers/{id}", get(customers::detail).put(customers::update))
        .route("/accounts", get(accounts::list))
        .route("/accounts/{id}", get(accounts::detail))
        .route("/accounts/{id}/status", put(accounts::update_status))
        .route("/accounts/{id}/overdraft_limit", put(accounts::update_overdraft_limit))
        .route("/transactions", get(transactions::list))
        .route("/transactions/{id}", get(transactions::detail))
        .route("/transactions/deposit", post(transactions::admin_deposit))
        .route("/transactions/withdraw", post(transactions::admin_withdraw))
        .route("/transactions/transfer", post(transactions::admin_transfer))
        .route("/transactions/ach", post(transactions::admin_ach))
        .route("/transactions/wire", post(transactions::admin_wire))
        .route("/fees/types", get(fees::list_types))
        .route("/fees/apply", post(fees::apply))
        .route("/audit_logs", get(audit::list))
        .route("/dashboard", get(dashboard::summary))
        .route("/lookups/account-status-types", get(lookups::account_status_types))
        .route("/lookups/transaction-types", get(lookups::transaction_types))
        .route("/validation/ledger", get(validation::ledger))
        .route("/validation/accounts/{id}", get(validation::account))
}

/// Full application router: both API surfaces plus the health probe.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", customer_routes())
        .nest("/api/admin", admin_routes())
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
