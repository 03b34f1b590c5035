//! Balloon DEX pool engine
//!
//! A single-pair constant-product market between the base currency and one
//! fungible token, with liquidity shares, swap quotes and devnet provisioning.

pub mod calculator;
pub mod constants;
mod journal;
pub mod pool;
pub mod provision;
mod quote;
pub mod state;

// Re-exports
pub use calculator::{deposit_amounts, fee_amount, price, price_impact_bps, redeem_amounts};
pub use constants::{contracts, nonces};
pub use pool::Dex;
pub use provision::{provision, Deployment, DevnetDex};
pub use state::{DepositQuote, DexEvent, PoolState, SwapDirection, SwapQuote};
