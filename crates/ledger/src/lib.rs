//! Balance ledgers consumed by the pool engine
//!
//! The engine only sees the [`TokenLedger`] and [`NativeLedger`] traits. This
//! crate also ships the in-memory implementations used by the devnet: the
//! [`Balloons`] ERC-20 style token and the [`EtherBank`] base-currency table.

pub mod balloons;
pub mod ether_bank;
pub mod traits;

// Re-exports
pub use balloons::{Balloons, TokenEvent, TokenInfo};
pub use ether_bank::EtherBank;
pub use traits::{NativeLedger, TokenLedger};
