//! Data Transfer Objects for API requests and responses
//!
//! Amounts travel as base-10 strings of the smallest unit (wei, token base
//! units) and addresses as 0x-prefixed hex.

use dex::{DepositQuote, DexEvent, PoolState, SwapDirection, SwapQuote};
use dex_core::{Address, FeeConfig, U256};
use ledger::{TokenEvent, TokenInfo};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}

/// Pool snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStateResponse {
    pub address: String,
    pub token: String,
    pub eth_reserve: String,
    pub token_reserve: String,
    pub total_liquidity: String,
    pub initialized: bool,
    pub fee_numerator: u64,
    pub fee_denominator: u64,
    pub fee_bps: u64,
}

impl PoolStateResponse {
    pub fn new(address: Address, token: Address, state: PoolState, fee: FeeConfig) -> Self {
        Self {
            address: address.to_string(),
            token: token.to_string(),
            eth_reserve: state.eth_reserve.to_string(),
            token_reserve: state.token_reserve.to_string(),
            total_liquidity: state.total_liquidity.to_string(),
            initialized: state.initialized,
            fee_numerator: fee.numerator,
            fee_denominator: fee.denominator,
            fee_bps: fee.fee_bps(),
        }
    }
}

/// Balance or share lookup for one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub address: String,
    pub amount: String,
}

impl BalanceResponse {
    pub fn new(address: Address, amount: U256) -> Self {
        Self {
            address: address.to_string(),
            amount: amount.to_string(),
        }
    }
}

/// Stateless constant-product quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRequest {
    pub x_input: String,
    pub x_reserves: String,
    pub y_reserves: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceResponse {
    pub output: String,
}

/// Swap quote request against the live reserves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub direction: SwapDirection,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub direction: SwapDirection,
    pub input: String,
    pub output: String,
    pub fee_amount: String,
    pub price_impact_bps: u64,
}

impl From<SwapQuote> for QuoteResponse {
    fn from(quote: SwapQuote) -> Self {
        Self {
            direction: quote.direction,
            input: quote.input.to_string(),
            output: quote.output.to_string(),
            fee_amount: quote.fee_amount.to_string(),
            price_impact_bps: quote.price_impact_bps,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositQuoteRequest {
    pub eth_input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositQuoteResponse {
    pub eth_input: String,
    pub token_deposit: String,
    pub liquidity_minted: String,
}

impl From<DepositQuote> for DepositQuoteResponse {
    fn from(quote: DepositQuote) -> Self {
        Self {
            eth_input: quote.eth_input.to_string(),
            token_deposit: quote.token_deposit.to_string(),
            liquidity_minted: quote.liquidity_minted.to_string(),
        }
    }
}

/// Call carrying base currency (`init`, `deposit`, `eth-to-token`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayableRequest {
    pub caller: String,
    pub value: String,
    /// Token amount, only read by `init`
    #[serde(default)]
    pub tokens: Option<String>,
}

/// Call carrying an amount but no value (`withdraw`, `token-to-eth`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    pub caller: String,
    pub amount: String,
}

/// Result of a state-changing pool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResponse {
    /// Primary return value (tokens out, eth out, tokens deposited, ...)
    pub output: String,
    /// Second return value where the call has one (withdraw: tokens out)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_output: Option<String>,
    pub state: PoolStateResponse,
}

/// Pool event with amounts rendered as strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum DexEventDto {
    EthToTokenSwap {
        swapper: String,
        token_output: String,
        eth_input: String,
    },
    TokenToEthSwap {
        swapper: String,
        tokens_input: String,
        eth_output: String,
    },
    LiquidityProvided {
        liquidity_provider: String,
        liquidity_minted: String,
        eth_input: String,
        tokens_input: String,
    },
    LiquidityRemoved {
        liquidity_remover: String,
        liquidity_withdrawn: String,
        tokens_output: String,
        eth_output: String,
    },
}

impl From<&DexEvent> for DexEventDto {
    fn from(event: &DexEvent) -> Self {
        match event {
            DexEvent::EthToTokenSwap {
                swapper,
                token_output,
                eth_input,
            } => Self::EthToTokenSwap {
                swapper: swapper.to_string(),
                token_output: token_output.to_string(),
                eth_input: eth_input.to_string(),
            },
            DexEvent::TokenToEthSwap {
                swapper,
                tokens_input,
                eth_output,
            } => Self::TokenToEthSwap {
                swapper: swapper.to_string(),
                tokens_input: tokens_input.to_string(),
                eth_output: eth_output.to_string(),
            },
            DexEvent::LiquidityProvided {
                liquidity_provider,
                liquidity_minted,
                eth_input,
                tokens_input,
            } => Self::LiquidityProvided {
                liquidity_provider: liquidity_provider.to_string(),
                liquidity_minted: liquidity_minted.to_string(),
                eth_input: eth_input.to_string(),
                tokens_input: tokens_input.to_string(),
            },
            DexEvent::LiquidityRemoved {
                liquidity_remover,
                liquidity_withdrawn,
                tokens_output,
                eth_output,
            } => Self::LiquidityRemoved {
                liquidity_remover: liquidity_remover.to_string(),
                liquidity_withdrawn: liquidity_withdrawn.to_string(),
                tokens_output: tokens_output.to_string(),
                eth_output: eth_output.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<DexEventDto>,
    pub count: usize,
}

/// Token metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfoResponse {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    /// Number of Transfer/Approval events logged so far
    pub event_count: usize,
}

impl TokenInfoResponse {
    pub fn new(info: TokenInfo, events: &[TokenEvent]) -> Self {
        Self {
            address: info.address.to_string(),
            name: info.name,
            symbol: info.symbol,
            decimals: info.decimals,
            total_supply: info.total_supply.to_string(),
            event_count: events.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequest {
    pub owner: String,
    pub spender: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// Allowance after an approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceResponse {
    pub owner: String,
    pub spender: String,
    pub allowance: String,
}
