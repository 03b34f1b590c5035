//! Balloons token
//!
//! ERC-20 style fungible token held in memory. Balances and allowances live in
//! hash maps; every state change appends a [`TokenEvent`].

use std::collections::HashMap;

use dex_core::{Address, LedgerError, TokenConfig, U256};
use serde::{Deserialize, Serialize};

use crate::traits::TokenLedger;

/// Token events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TokenEvent {
    /// Tokens moved between accounts (`from == 0` on mint)
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
    /// Allowance set for a spender
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },
}

/// Token metadata snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

/// In-memory ERC-20 token
#[derive(Debug, Clone)]
pub struct Balloons {
    address: Address,
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<Address, HashMap<Address, U256>>,
    events: Vec<TokenEvent>,
}

impl Balloons {
    /// Deploy the token at `address`, minting the configured supply to `deployer`
    pub fn deploy(address: Address, deployer: Address, config: &TokenConfig) -> Self {
        let mut token = Self {
            address,
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            total_supply: U256::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            events: Vec::new(),
        };
        token.mint(deployer, config.initial_supply);
        tracing::info!(
            "Deployed {} ({}) at {} with supply {}",
            token.name,
            token.symbol,
            address,
            token.total_supply
        );
        token
    }

    fn mint(&mut self, to: Address, amount: U256) {
        // Genesis mint into an empty table cannot overflow a U256 supply
        self.total_supply = self.total_supply.saturating_add(amount);
        let balance = self.balances.entry(to).or_default();
        *balance = balance.saturating_add(amount);
        self.events.push(TokenEvent::Transfer {
            from: Address::ZERO,
            to,
            value: amount,
        });
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn info(&self) -> TokenInfo {
        TokenInfo {
            address: self.address,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            total_supply: self.total_supply,
        }
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or_default()
    }

    /// Emitted events, oldest first
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Set `spender`'s allowance over `owner`'s tokens
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if owner == Address::ZERO {
            return Err(LedgerError::ZeroAddress { role: "owner" });
        }
        if spender == Address::ZERO {
            return Err(LedgerError::ZeroAddress { role: "spender" });
        }
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
        self.events.push(TokenEvent::Approval {
            owner,
            spender,
            value: amount,
        });
        Ok(())
    }

    pub fn increase_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        added: U256,
    ) -> Result<(), LedgerError> {
        let current = self.allowance(&owner, &spender);
        let updated = current.checked_add(added).ok_or(LedgerError::Overflow)?;
        self.approve(owner, spender, updated)
    }

    pub fn decrease_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        subtracted: U256,
    ) -> Result<(), LedgerError> {
        let current = self.allowance(&owner, &spender);
        let updated = current
            .checked_sub(subtracted)
            .ok_or(LedgerError::AllowanceUnderflow)?;
        self.approve(owner, spender, updated)
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        if from == Address::ZERO {
            return Err(LedgerError::ZeroAddress { role: "sender" });
        }
        if to == Address::ZERO {
            return Err(LedgerError::ZeroAddress { role: "recipient" });
        }

        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: from_balance,
            });
        }
        if from != to {
            let to_balance = self.balance_of(&to);
            let new_to = to_balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
            self.balances.insert(from, from_balance - amount);
            self.balances.insert(to, new_to);
        }

        self.events.push(TokenEvent::Transfer {
            from,
            to,
            value: amount,
        });
        Ok(())
    }
}

impl TokenLedger for Balloons {
    fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn transfer(
        &mut self,
        sender: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        self.move_balance(sender, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let allowance = self.allowance(&from, &spender);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                required: amount,
                available: allowance,
            });
        }

        self.move_balance(from, to, amount)?;

        // An unlimited approval is never spent down
        if allowance != U256::MAX {
            self.allowances
                .entry(from)
                .or_default()
                .insert(spender, allowance - amount);
        }
        Ok(())
    }
}
