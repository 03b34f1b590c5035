//! Pool Routes

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use dex::{DevnetDex, SwapDirection};
use dex_core::{CallContext, U256};

use super::{bad_request, dex_error, parse_address, parse_amount, ApiResult, ErrorResponse};
use crate::dto::{
    AmountRequest, BalanceResponse, CallResponse, DepositQuoteRequest, DepositQuoteResponse,
    DexEventDto, EventsResponse, PayableRequest, PoolStateResponse, PriceRequest, PriceResponse,
    QuoteRequest, QuoteResponse,
};
use crate::AppState;

/// Create pool routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_state))
        .route("/liquidity/:address", get(get_liquidity))
        .route("/events", get(get_events))
        .route("/price", post(get_price))
        .route("/quote", post(get_quote))
        .route("/deposit-quote", post(get_deposit_quote))
        .route("/init", post(init))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/eth-to-token", post(eth_to_token))
        .route("/token-to-eth", post(token_to_eth))
}

fn pool_state(dex: &DevnetDex) -> PoolStateResponse {
    PoolStateResponse::new(
        dex.address(),
        dex.token_ledger().address(),
        dex.pool_state(),
        dex.fee(),
    )
}

fn call_response(dex: &DevnetDex, output: U256, secondary_output: Option<U256>) -> CallResponse {
    CallResponse {
        output: output.to_string(),
        secondary_output: secondary_output.map(|v| v.to_string()),
        state: pool_state(dex),
    }
}

fn payable_context(request: &PayableRequest) -> Result<CallContext, ErrorResponse> {
    Ok(CallContext::with_value(
        parse_address("caller", &request.caller)?,
        parse_amount("value", &request.value)?,
    ))
}

/// GET /dex/state - Reserves, share supply and fee
async fn get_state(State(state): State<AppState>) -> Json<PoolStateResponse> {
    let devnet = state.devnet().await;
    Json(pool_state(&devnet.dex))
}

/// GET /dex/liquidity/:address - Shares held by a provider
async fn get_liquidity(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<BalanceResponse> {
    let address = parse_address("address", &address)?;
    let devnet = state.devnet().await;
    Ok(Json(BalanceResponse::new(
        address,
        devnet.dex.get_liquidity(&address),
    )))
}

/// GET /dex/events - Pool event log, oldest first
async fn get_events(State(state): State<AppState>) -> Json<EventsResponse> {
    let devnet = state.devnet().await;
    let events: Vec<DexEventDto> = devnet.dex.events().iter().map(Into::into).collect();
    let count = events.len();
    Json(EventsResponse { events, count })
}

/// POST /dex/price - Constant-product output for arbitrary reserves
async fn get_price(
    State(state): State<AppState>,
    Json(request): Json<PriceRequest>,
) -> ApiResult<PriceResponse> {
    let x_input = parse_amount("x_input", &request.x_input)?;
    let x_reserves = parse_amount("x_reserves", &request.x_reserves)?;
    let y_reserves = parse_amount("y_reserves", &request.y_reserves)?;

    let devnet = state.devnet().await;
    let output = devnet
        .dex
        .price(x_input, x_reserves, y_reserves)
        .map_err(dex_error)?;
    Ok(Json(PriceResponse {
        output: output.to_string(),
    }))
}

/// POST /dex/quote - Swap preview against the live reserves
async fn get_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> ApiResult<QuoteResponse> {
    let amount = parse_amount("amount", &request.amount)?;
    let devnet = state.devnet().await;
    let quote = match request.direction {
        SwapDirection::EthToToken => devnet.dex.quote_eth_to_token(amount),
        SwapDirection::TokenToEth => devnet.dex.quote_token_to_eth(amount),
    }
    .map_err(dex_error)?;
    tracing::debug!("Quoted {:?} {} -> {}", quote.direction, quote.input, quote.output);
    Ok(Json(quote.into()))
}

/// POST /dex/deposit-quote - Tokens and shares for a prospective deposit
async fn get_deposit_quote(
    State(state): State<AppState>,
    Json(request): Json<DepositQuoteRequest>,
) -> ApiResult<DepositQuoteResponse> {
    let eth_input = parse_amount("eth_input", &request.eth_input)?;
    let devnet = state.devnet().await;
    let quote = devnet
        .dex
        .deposit_requirement(eth_input)
        .map_err(dex_error)?;
    Ok(Json(quote.into()))
}

/// POST /dex/init - Seed an empty pool
async fn init(
    State(state): State<AppState>,
    Json(request): Json<PayableRequest>,
) -> ApiResult<CallResponse> {
    let ctx = payable_context(&request)?;
    let tokens = request
        .tokens
        .as_deref()
        .ok_or_else(|| bad_request("tokens is required for init"))?;
    let tokens = parse_amount("tokens", tokens)?;

    let mut devnet = state.devnet_mut().await;
    let total = devnet.dex.init(ctx, tokens).map_err(dex_error)?;
    Ok(Json(call_response(&devnet.dex, total, None)))
}

/// POST /dex/deposit - Add liquidity at the current ratio
async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<PayableRequest>,
) -> ApiResult<CallResponse> {
    let ctx = payable_context(&request)?;
    let mut devnet = state.devnet_mut().await;
    let tokens = devnet.dex.deposit(ctx).map_err(dex_error)?;
    Ok(Json(call_response(&devnet.dex, tokens, None)))
}

/// POST /dex/withdraw - Burn shares for a proportional payout
async fn withdraw(
    State(state): State<AppState>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<CallResponse> {
    let caller = parse_address("caller", &request.caller)?;
    let amount = parse_amount("amount", &request.amount)?;

    let mut devnet = state.devnet_mut().await;
    let (eth, tokens) = devnet.dex.withdraw(caller, amount).map_err(dex_error)?;
    Ok(Json(call_response(&devnet.dex, eth, Some(tokens))))
}

/// POST /dex/eth-to-token - Sell the attached ETH for tokens
async fn eth_to_token(
    State(state): State<AppState>,
    Json(request): Json<PayableRequest>,
) -> ApiResult<CallResponse> {
    let ctx = payable_context(&request)?;
    let mut devnet = state.devnet_mut().await;
    let tokens = devnet.dex.eth_to_token(ctx).map_err(dex_error)?;
    Ok(Json(call_response(&devnet.dex, tokens, None)))
}

/// POST /dex/token-to-eth - Sell approved tokens for ETH
async fn token_to_eth(
    State(state): State<AppState>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<CallResponse> {
    let caller = parse_address("caller", &request.caller)?;
    let amount = parse_amount("amount", &request.amount)?;

    let mut devnet = state.devnet_mut().await;
    let eth = devnet.dex.token_to_eth(caller, amount).map_err(dex_error)?;
    Ok(Json(call_response(&devnet.dex, eth, None)))
}
