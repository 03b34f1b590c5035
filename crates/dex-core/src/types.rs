//! Core type definitions for the Balloon DEX

use serde::{Deserialize, Serialize};
use std::fmt;

pub use alloy_primitives::{address, Address, U256};

/// Base-currency amount in wei (1 ETH = 10^18 wei)
pub type Wei = U256;

/// Token amount in the token's smallest unit
pub type TokenUnits = U256;

/// Chain the devnet identifies as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Localhost,
    Sepolia,
}

impl Chain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Localhost => "localhost",
            Self::Sepolia => "sepolia",
        }
    }

    /// EIP-155 chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Localhost => 31337,
            Self::Sepolia => 11_155_111,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller identity and attached base-currency value of a single call.
///
/// Operations that do not accept value are invoked with `value == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    #[serde(default)]
    pub value: Wei,
}

impl CallContext {
    /// A call carrying no base currency
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::ZERO,
        }
    }

    /// A payable call carrying `value` wei
    pub fn with_value(caller: Address, value: Wei) -> Self {
        Self { caller, value }
    }
}

/// Constants
pub mod constants {
    use super::{address, Address, U256};

    /// 1 ETH in wei
    pub const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

    /// Decimals of the base currency and of the default token
    pub const DEFAULT_DECIMALS: u8 = 18;

    /// First well-known development account (hardhat / anvil mnemonic)
    pub const DEV_DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    /// Frontend burner account funded by the deploy step
    pub const DEV_FRONTEND_ACCOUNT: Address =
        address!("80584B69e51DAE0D0b03BE93EBc014FAAB6D15dF");
}

/// Whole-unit amount scaled by 10^18
pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * constants::WEI_PER_ETHER
}
