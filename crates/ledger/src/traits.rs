//! Ledger capabilities the pool engine depends on

use dex_core::{Address, LedgerError, U256};

/// Fungible-token balance table (ERC-20 transfer surface).
///
/// A failed call must leave the ledger unchanged.
pub trait TokenLedger {
    /// Tokens held by `account`
    fn balance_of(&self, account: &Address) -> U256;

    /// Move `amount` of `sender`'s own tokens to `to`
    fn transfer(&mut self, sender: Address, to: Address, amount: U256)
        -> Result<(), LedgerError>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;
}

/// Base-currency balance table.
///
/// A failed call must leave the ledger unchanged.
pub trait NativeLedger {
    /// Wei held by `account`
    fn balance_of(&self, account: &Address) -> U256;

    /// Move `amount` wei from `from` to `to`
    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError>;
}
