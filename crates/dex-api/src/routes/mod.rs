//! API route handlers

pub mod deployment;
pub mod dex;
pub mod eth;
pub mod health;
pub mod token;

use axum::{http::StatusCode, routing::get, Json, Router};
use dex_core::{Address, DexError, LedgerError, U256};

use crate::dto::ApiError;
use crate::AppState;

/// Error half of every handler result
pub(crate) type ErrorResponse = (StatusCode, Json<ApiError>);

pub(crate) type ApiResult<T> = Result<Json<T>, ErrorResponse>;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/deployment", get(deployment::get_deployment))
        .nest("/dex", dex::router())
        .nest("/token", token::router())
        .nest("/eth", eth::router())
        .with_state(state)
}

pub(crate) fn bad_request(message: impl Into<String>) -> ErrorResponse {
    (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message)))
}

pub(crate) fn dex_error(err: DexError) -> ErrorResponse {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::new(err.error_code(), err.to_string())))
}

pub(crate) fn ledger_error(err: LedgerError) -> ErrorResponse {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiError::new(err.error_code(), err.to_string())),
    )
}

pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address, ErrorResponse> {
    value
        .parse::<Address>()
        .map_err(|e| bad_request(format!("Invalid {}: {}", field, e)))
}

/// Decimal, or hex with a 0x prefix
pub(crate) fn parse_amount(field: &str, value: &str) -> Result<U256, ErrorResponse> {
    value
        .parse::<U256>()
        .map_err(|e| bad_request(format!("Invalid {}: {}", field, e)))
}
