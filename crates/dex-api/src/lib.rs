//! dex-api: HTTP API layer for the Balloon DEX
//!
//! Exposes a provisioned devnet (pool, token and ETH balances) to the frontend.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::{AppState, Devnet};
