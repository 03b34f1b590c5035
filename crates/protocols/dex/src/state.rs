//! DEX State Types
//!
//! Data structures for the pool, its events, and quotes.

use dex_core::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pool reserves and share supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolState {
    /// Base currency held by the pool (wei)
    pub eth_reserve: U256,
    /// Tokens held by the pool
    pub token_reserve: U256,
    /// Outstanding liquidity shares
    pub total_liquidity: U256,
    /// Set once by `init`, never cleared
    pub initialized: bool,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ETH: {} | Token: {} | Liquidity: {}",
            self.eth_reserve, self.token_reserve, self.total_liquidity
        )
    }
}

/// Events emitted by committed pool operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum DexEvent {
    EthToTokenSwap {
        swapper: Address,
        token_output: U256,
        eth_input: U256,
    },
    TokenToEthSwap {
        swapper: Address,
        tokens_input: U256,
        eth_output: U256,
    },
    LiquidityProvided {
        liquidity_provider: Address,
        liquidity_minted: U256,
        eth_input: U256,
        tokens_input: U256,
    },
    LiquidityRemoved {
        liquidity_remover: Address,
        liquidity_withdrawn: U256,
        tokens_output: U256,
        eth_output: U256,
    },
}

/// Swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// Base currency in, token out
    EthToToken,
    /// Token in, base currency out
    TokenToEth,
}

/// Read-only quote for a swap against current reserves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub direction: SwapDirection,
    pub input: U256,
    /// Output the swap would pay right now
    pub output: U256,
    /// Input units retained by the pool as fee
    pub fee_amount: U256,
    /// Shortfall of execution price vs spot price, in basis points
    pub price_impact_bps: u64,
}

/// Read-only preview of a deposit against current reserves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositQuote {
    pub eth_input: U256,
    /// Tokens the pool would pull from the depositor
    pub token_deposit: U256,
    /// Shares the depositor would receive
    pub liquidity_minted: U256,
}
