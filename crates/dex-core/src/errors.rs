//! Error types for the Balloon DEX

use thiserror::Error;

use crate::U256;

/// Core errors that can occur in the workspace
#[derive(Debug, Error)]
pub enum Error {
    #[error("DEX error: {0}")]
    Dex(#[from] DexError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Pool engine errors.
///
/// Every variant rejects the whole call; no state change survives it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    #[error("Must deposit a non-zero value")]
    MustDepositValue,

    #[error("Pool already has liquidity")]
    AlreadyHasLiquidity,

    #[error("Not enough liquidity")]
    NotEnoughLiquidity,

    #[error("Failed to transfer ETH")]
    FailedToTransferEth,

    #[error("Failed to transfer tokens")]
    FailedToTransferTokens,

    #[error("Arithmetic overflow")]
    Overflow,
}

/// Balance-table errors raised by the token and native ledgers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: U256, available: U256 },

    #[error("Insufficient allowance: need {required}, have {available}")]
    InsufficientAllowance { required: U256, available: U256 },

    #[error("Allowance decreased below zero")]
    AllowanceUnderflow,

    #[error("Zero address is not a valid {role}")]
    ZeroAddress { role: &'static str },

    #[error("Balance overflow")]
    Overflow,
}

/// Result type alias for workspace operations
pub type Result<T> = std::result::Result<T, Error>;

impl DexError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MustDepositValue => "must_deposit_value",
            Self::AlreadyHasLiquidity => "already_has_liquidity",
            Self::NotEnoughLiquidity => "not_enough_liquidity",
            Self::FailedToTransferEth => "failed_to_transfer_eth",
            Self::FailedToTransferTokens => "failed_to_transfer_tokens",
            Self::Overflow => "overflow",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MustDepositValue => 400,
            Self::AlreadyHasLiquidity => 409,
            Self::NotEnoughLiquidity => 422,
            Self::FailedToTransferEth | Self::FailedToTransferTokens => 422,
            Self::Overflow => 400,
        }
    }
}

impl LedgerError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::InsufficientAllowance { .. } => "insufficient_allowance",
            Self::AllowanceUnderflow => "allowance_underflow",
            Self::ZeroAddress { .. } => "zero_address",
            Self::Overflow => "overflow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dex_error_codes() {
        let err = DexError::MustDepositValue;
        assert_eq!(err.error_code(), "must_deposit_value");
        assert_eq!(err.status_code(), 400);

        let err = DexError::AlreadyHasLiquidity;
        assert_eq!(err.error_code(), "already_has_liquidity");
        assert_eq!(err.status_code(), 409);

        let err = DexError::FailedToTransferTokens;
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::InsufficientBalance {
            required: U256::from(100),
            available: U256::from(50),
        };
        assert_eq!(err.to_string(), "Insufficient balance: need 100, have 50");
        assert_eq!(err.error_code(), "insufficient_balance");
    }

    #[test]
    fn test_error_from_conversions() {
        let err: Error = DexError::NotEnoughLiquidity.into();
        assert!(matches!(err, Error::Dex(DexError::NotEnoughLiquidity)));
        let err: Error = LedgerError::Overflow.into();
        assert!(matches!(err, Error::Ledger(LedgerError::Overflow)));
    }
}
