//! Token Routes
//!
//! Account-level calls on the Balloons ledger. Transfers into or out of the pool
//! account, and approvals granted by it, are refused: pool reserves only move
//! through pool operations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ledger::TokenLedger;

use super::{ledger_error, parse_address, parse_amount, ApiResult, ErrorResponse};
use crate::dto::{
    AllowanceResponse, ApiError, ApproveRequest, BalanceResponse, TokenInfoResponse,
    TransferRequest,
};
use crate::AppState;

/// Create token routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_token))
        .route("/balance/:address", get(get_balance))
        .route("/approve", post(approve))
        .route("/transfer", post(transfer))
}

/// GET /token - Token metadata
async fn get_token(State(state): State<AppState>) -> Json<TokenInfoResponse> {
    let devnet = state.devnet().await;
    let token = devnet.dex.token_ledger();
    Json(TokenInfoResponse::new(token.info(), token.events()))
}

/// GET /token/balance/:address - Tokens held by an account
async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<BalanceResponse> {
    let address = parse_address("address", &address)?;
    let devnet = state.devnet().await;
    let balance = devnet.dex.token_ledger().balance_of(&address);
    Ok(Json(BalanceResponse::new(address, balance)))
}

/// POST /token/approve - Set a spender's allowance
async fn approve(
    State(state): State<AppState>,
    Json(request): Json<ApproveRequest>,
) -> ApiResult<AllowanceResponse> {
    let owner = parse_address("owner", &request.owner)?;
    let spender = parse_address("spender", &request.spender)?;
    let amount = parse_amount("amount", &request.amount)?;

    let mut devnet = state.devnet_mut().await;
    if owner == devnet.dex.address() {
        return Err(pool_account_rejected());
    }

    let token = devnet.dex.token_ledger_mut();
    token
        .approve(owner, spender, amount)
        .map_err(ledger_error)?;

    Ok(Json(AllowanceResponse {
        owner: owner.to_string(),
        spender: spender.to_string(),
        allowance: token.allowance(&owner, &spender).to_string(),
    }))
}

/// POST /token/transfer - Move tokens between accounts
async fn transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> ApiResult<BalanceResponse> {
    let from = parse_address("from", &request.from)?;
    let to = parse_address("to", &request.to)?;
    let amount = parse_amount("amount", &request.amount)?;

    let mut devnet = state.devnet_mut().await;
    let pool = devnet.dex.address();
    if from == pool || to == pool {
        return Err(pool_account_rejected());
    }

    let token = devnet.dex.token_ledger_mut();
    token.transfer(from, to, amount).map_err(ledger_error)?;
    tracing::info!("Transferred {} {} from {} to {}", amount, token.symbol(), from, to);
    Ok(Json(BalanceResponse::new(from, token.balance_of(&from))))
}

fn pool_account_rejected() -> ErrorResponse {
    (
        StatusCode::FORBIDDEN,
        Json(ApiError::new(
            "pool_transfer_rejected",
            "Pool tokens move only through pool operations",
        )),
    )
}
