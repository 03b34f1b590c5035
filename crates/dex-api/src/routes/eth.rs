//! Base-currency balance lookups

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use ledger::NativeLedger;

use super::{parse_address, ApiResult};
use crate::dto::BalanceResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/balance/:address", get(get_balance))
}

/// GET /eth/balance/:address - Wei held by an account
async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<BalanceResponse> {
    let address = parse_address("address", &address)?;
    let devnet = state.devnet().await;
    let balance = devnet.dex.native_ledger().balance_of(&address);
    Ok(Json(BalanceResponse::new(address, balance)))
}
