//! Base-currency balance table

use std::collections::HashMap;

use dex_core::{Address, LedgerError, U256};

use crate::traits::NativeLedger;

/// In-memory wei balances
#[derive(Debug, Clone, Default)]
pub struct EtherBank {
    balances: HashMap<Address, U256>,
    total: U256,
}

impl EtherBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Genesis allocation of `amount` wei to `account`
    pub fn fund(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
        let total = self.total.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(&account)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(account, balance);
        self.total = total;
        tracing::debug!("Funded {} with {} wei", account, amount);
        Ok(())
    }

    /// Sum of all balances
    pub fn total(&self) -> U256 {
        self.total
    }
}

impl NativeLedger for EtherBank {
    fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: from_balance,
            });
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(from, from_balance - amount);
        self.balances.insert(to, to_balance);
        Ok(())
    }
}
