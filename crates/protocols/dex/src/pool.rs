//! Pool engine
//!
//! A single ETH/token constant-product pool. Every mutating call either commits
//! completely or leaves pool state and both ledgers exactly as they were:
//! ledger movements are journaled as they happen and reversed if a later step
//! fails, and pool state is only written once every movement has succeeded.

use std::collections::HashMap;

use dex_core::{Address, CallContext, DexError, FeeConfig, Result as CoreResult, U256};
use ledger::{NativeLedger, TokenLedger};

use crate::calculator;
use crate::journal::{Journal, Movement};
use crate::state::{DexEvent, PoolState};

/// ETH/token liquidity pool bound to one token ledger for its lifetime
#[derive(Debug)]
pub struct Dex<T, N> {
    address: Address,
    token: T,
    bank: N,
    fee: FeeConfig,
    state: PoolState,
    liquidity: HashMap<Address, U256>,
    events: Vec<DexEvent>,
}

fn reject(operation: &str, err: DexError) -> DexError {
    tracing::warn!("{} rejected: {}", operation, err);
    err
}

impl<T: TokenLedger, N: NativeLedger> Dex<T, N> {
    /// Create an uninitialised pool.
    ///
    /// `address` is the pool's own account on both ledgers. Fails with a
    /// config error if `fee` is not a valid fraction.
    pub fn new(address: Address, token: T, bank: N, fee: FeeConfig) -> CoreResult<Self> {
        fee.validate()?;
        Ok(Self {
            address,
            token,
            bank,
            fee,
            state: PoolState::default(),
            liquidity: HashMap::new(),
            events: Vec::new(),
        })
    }

    /// Seed the pool with `ctx.value` wei and `tokens` tokens pulled from the
    /// caller, minting `ctx.value` shares to the caller.
    ///
    /// Returns the resulting total liquidity.
    ///
    /// # Errors
    /// - `AlreadyHasLiquidity` if the pool was initialised before
    /// - `MustDepositValue` if no value is attached
    /// - `FailedToTransferEth` / `FailedToTransferTokens` if funding fails
    pub fn init(&mut self, ctx: CallContext, tokens: U256) -> Result<U256, DexError> {
        if self.state.initialized || !self.state.total_liquidity.is_zero() {
            return Err(reject("init", DexError::AlreadyHasLiquidity));
        }
        if ctx.value.is_zero() {
            return Err(reject("init", DexError::MustDepositValue));
        }
        self.reject_self_call("init", ctx.caller, DexError::FailedToTransferEth)?;

        self.transact("init", |dex, journal| {
            dex.collect_value(journal, &ctx)?;
            dex.pull_tokens(journal, ctx.caller, tokens)?;

            dex.state = PoolState {
                eth_reserve: ctx.value,
                token_reserve: tokens,
                total_liquidity: ctx.value,
                initialized: true,
            };
            dex.liquidity.insert(ctx.caller, ctx.value);
            Ok(ctx.value)
        })
    }

    /// Swap the attached ETH for tokens. Returns the tokens paid out.
    pub fn eth_to_token(&mut self, ctx: CallContext) -> Result<U256, DexError> {
        let eth_input = ctx.value;
        if eth_input.is_zero() {
            return Err(reject("eth_to_token", DexError::MustDepositValue));
        }
        self.reject_self_call("eth_to_token", ctx.caller, DexError::FailedToTransferEth)?;

        let PoolState {
            eth_reserve,
            token_reserve,
            ..
        } = self.state;
        let token_output = self
            .price(eth_input, eth_reserve, token_reserve)
            .map_err(|e| reject("eth_to_token", e))?;
        let new_eth_reserve = eth_reserve
            .checked_add(eth_input)
            .ok_or_else(|| reject("eth_to_token", DexError::Overflow))?;
        let new_token_reserve = token_reserve
            .checked_sub(token_output)
            .ok_or_else(|| reject("eth_to_token", DexError::NotEnoughLiquidity))?;

        self.transact("eth_to_token", |dex, journal| {
            dex.collect_value(journal, &ctx)?;
            dex.push_tokens(journal, ctx.caller, token_output)?;

            dex.state.eth_reserve = new_eth_reserve;
            dex.state.token_reserve = new_token_reserve;
            dex.emit(DexEvent::EthToTokenSwap {
                swapper: ctx.caller,
                token_output,
                eth_input,
            });
            Ok(token_output)
        })
    }

    /// Swap `token_input` tokens (pulled from the caller) for ETH. Returns the
    /// ETH paid out.
    pub fn token_to_eth(&mut self, caller: Address, token_input: U256) -> Result<U256, DexError> {
        if token_input.is_zero() {
            return Err(reject("token_to_eth", DexError::MustDepositValue));
        }
        self.reject_self_call("token_to_eth", caller, DexError::FailedToTransferTokens)?;

        let PoolState {
            eth_reserve,
            token_reserve,
            ..
        } = self.state;
        let eth_output = self
            .price(token_input, token_reserve, eth_reserve)
            .map_err(|e| reject("token_to_eth", e))?;
        let new_token_reserve = token_reserve
            .checked_add(token_input)
            .ok_or_else(|| reject("token_to_eth", DexError::Overflow))?;
        let new_eth_reserve = eth_reserve
            .checked_sub(eth_output)
            .ok_or_else(|| reject("token_to_eth", DexError::NotEnoughLiquidity))?;

        self.transact("token_to_eth", |dex, journal| {
            dex.pull_tokens(journal, caller, token_input)?;
            dex.pay_eth(journal, caller, eth_output)?;

            dex.state.token_reserve = new_token_reserve;
            dex.state.eth_reserve = new_eth_reserve;
            dex.emit(DexEvent::TokenToEthSwap {
                swapper: caller,
                tokens_input: token_input,
                eth_output,
            });
            Ok(eth_output)
        })
    }

    /// Add the attached ETH plus the proportional amount of tokens to the
    /// reserves, minting shares to the caller. Returns the tokens pulled.
    pub fn deposit(&mut self, ctx: CallContext) -> Result<U256, DexError> {
        let eth_input = ctx.value;
        if eth_input.is_zero() {
            return Err(reject("deposit", DexError::MustDepositValue));
        }
        self.reject_self_call("deposit", ctx.caller, DexError::FailedToTransferEth)?;

        let state = self.state;
        let (token_deposit, liquidity_minted) = calculator::deposit_amounts(
            eth_input,
            state.eth_reserve,
            state.token_reserve,
            state.total_liquidity,
        )
        .map_err(|e| reject("deposit", e))?;

        let committed = (|| {
            Some(PoolState {
                eth_reserve: state.eth_reserve.checked_add(eth_input)?,
                token_reserve: state.token_reserve.checked_add(token_deposit)?,
                total_liquidity: state.total_liquidity.checked_add(liquidity_minted)?,
                initialized: state.initialized,
            })
        })()
        .ok_or_else(|| reject("deposit", DexError::Overflow))?;
        let provider_shares = self
            .get_liquidity(&ctx.caller)
            .checked_add(liquidity_minted)
            .ok_or_else(|| reject("deposit", DexError::Overflow))?;

        self.transact("deposit", |dex, journal| {
            dex.collect_value(journal, &ctx)?;
            dex.pull_tokens(journal, ctx.caller, token_deposit)?;

            dex.state = committed;
            dex.liquidity.insert(ctx.caller, provider_shares);
            dex.emit(DexEvent::LiquidityProvided {
                liquidity_provider: ctx.caller,
                liquidity_minted,
                eth_input,
                tokens_input: token_deposit,
            });
            Ok(token_deposit)
        })
    }

    /// Burn `amount` of the caller's shares and pay out the proportional
    /// reserves. Returns `(eth_payout, token_payout)`.
    pub fn withdraw(&mut self, caller: Address, amount: U256) -> Result<(U256, U256), DexError> {
        if amount.is_zero() {
            return Err(reject("withdraw", DexError::MustDepositValue));
        }
        self.reject_self_call("withdraw", caller, DexError::FailedToTransferEth)?;
        let shares = self.get_liquidity(&caller);
        if amount > shares {
            return Err(reject("withdraw", DexError::NotEnoughLiquidity));
        }

        let state = self.state;
        let (eth_payout, token_payout) = calculator::redeem_amounts(
            amount,
            state.eth_reserve,
            state.token_reserve,
            state.total_liquidity,
        )
        .map_err(|e| reject("withdraw", e))?;

        let committed = (|| {
            Some(PoolState {
                eth_reserve: state.eth_reserve.checked_sub(eth_payout)?,
                token_reserve: state.token_reserve.checked_sub(token_payout)?,
                total_liquidity: state.total_liquidity.checked_sub(amount)?,
                initialized: state.initialized,
            })
        })()
        .ok_or_else(|| reject("withdraw", DexError::NotEnoughLiquidity))?;
        let remaining = shares - amount;

        self.transact("withdraw", |dex, journal| {
            dex.pay_eth(journal, caller, eth_payout)?;
            dex.push_tokens(journal, caller, token_payout)?;

            dex.state = committed;
            if remaining.is_zero() {
                dex.liquidity.remove(&caller);
            } else {
                dex.liquidity.insert(caller, remaining);
            }
            dex.emit(DexEvent::LiquidityRemoved {
                liquidity_remover: caller,
                liquidity_withdrawn: amount,
                tokens_output: token_payout,
                eth_output: eth_payout,
            });
            Ok((eth_payout, token_payout))
        })
    }

    /// Constant-product quote with this pool's fee. Reads no pool state.
    pub fn price(
        &self,
        x_input: U256,
        x_reserves: U256,
        y_reserves: U256,
    ) -> Result<U256, DexError> {
        calculator::price(x_input, x_reserves, y_reserves, &self.fee)
    }

    /// The pool's own account cannot trade with the pool: both ledgers would
    /// treat the transfers as no-ops while the reserves still moved.
    fn reject_self_call(
        &self,
        operation: &str,
        caller: Address,
        err: DexError,
    ) -> Result<(), DexError> {
        if caller == self.address {
            return Err(reject(operation, err));
        }
        Ok(())
    }

    fn transact<R>(
        &mut self,
        operation: &str,
        f: impl FnOnce(&mut Self, &mut Journal) -> Result<R, DexError>,
    ) -> Result<R, DexError> {
        let mut journal = Journal::default();
        match f(self, &mut journal) {
            Ok(result) => {
                tracing::info!("{} committed ({})", operation, self.state);
                Ok(result)
            }
            Err(e) => {
                tracing::warn!("{} failed, rolling back: {}", operation, e);
                self.unwind(&mut journal);
                Err(e)
            }
        }
    }

    fn unwind(&mut self, journal: &mut Journal) {
        if journal.is_empty() {
            return;
        }
        for movement in journal.drain_reversed() {
            let result = match movement {
                Movement::Eth { from, to, amount } => self.bank.transfer(to, from, amount),
                Movement::Token { from, to, amount } => self.token.transfer(to, from, amount),
            };
            if let Err(e) = result {
                tracing::error!("Failed to reverse {:?}: {}", movement, e);
            }
        }
    }

    fn collect_value(&mut self, journal: &mut Journal, ctx: &CallContext) -> Result<(), DexError> {
        self.move_eth(journal, ctx.caller, self.address, ctx.value)
    }

    fn pay_eth(&mut self, journal: &mut Journal, to: Address, amount: U256) -> Result<(), DexError> {
        self.move_eth(journal, self.address, to, amount)
    }

    fn move_eth(
        &mut self,
        journal: &mut Journal,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), DexError> {
        self.bank.transfer(from, to, amount).map_err(|e| {
            tracing::warn!("ETH transfer {} -> {} of {} failed: {}", from, to, amount, e);
            DexError::FailedToTransferEth
        })?;
        journal.record(Movement::Eth { from, to, amount });
        Ok(())
    }

    fn pull_tokens(&mut self, journal: &mut Journal, from: Address, amount: U256) -> Result<(), DexError> {
        let pool = self.address;
        self.token
            .transfer_from(pool, from, pool, amount)
            .map_err(|e| {
                tracing::warn!("Token pull from {} of {} failed: {}", from, amount, e);
                DexError::FailedToTransferTokens
            })?;
        journal.record(Movement::Token {
            from,
            to: pool,
            amount,
        });
        Ok(())
    }

    fn push_tokens(&mut self, journal: &mut Journal, to: Address, amount: U256) -> Result<(), DexError> {
        let pool = self.address;
        self.token.transfer(pool, to, amount).map_err(|e| {
            tracing::warn!("Token payout to {} of {} failed: {}", to, amount, e);
            DexError::FailedToTransferTokens
        })?;
        journal.record(Movement::Token {
            from: pool,
            to,
            amount,
        });
        Ok(())
    }

    fn emit(&mut self, event: DexEvent) {
        tracing::debug!("Emitting {:?}", event);
        self.events.push(event);
    }
}

impl<T, N> Dex<T, N> {
    /// Shares held by `provider` (zero if none)
    pub fn get_liquidity(&self, provider: &Address) -> U256 {
        self.liquidity.get(provider).copied().unwrap_or_default()
    }

    /// Public share mapping lookup; same as [`Dex::get_liquidity`]
    pub fn liquidity(&self, provider: &Address) -> U256 {
        self.get_liquidity(provider)
    }

    pub fn total_liquidity(&self) -> U256 {
        self.state.total_liquidity
    }

    /// Every entry of the share table
    pub fn liquidity_providers(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.liquidity.iter()
    }

    pub fn pool_state(&self) -> PoolState {
        self.state
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn fee(&self) -> FeeConfig {
        self.fee
    }

    /// Emitted events, oldest first
    pub fn events(&self) -> &[DexEvent] {
        &self.events
    }

    pub fn token_ledger(&self) -> &T {
        &self.token
    }

    /// Direct access for account operations that do not touch the pool
    /// (approvals, transfers between users).
    pub fn token_ledger_mut(&mut self) -> &mut T {
        &mut self.token
    }

    pub fn native_ledger(&self) -> &N {
        &self.bank
    }

    /// Direct access for account operations that do not touch the pool.
    pub fn native_ledger_mut(&mut self) -> &mut N {
        &mut self.bank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::{address, ether, LedgerError, TokenConfig};
    use ledger::{Balloons, EtherBank};

    const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const ALICE: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    const POOL: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");

    /// Token ledger whose payouts can be switched off
    struct FlakyToken {
        inner: Balloons,
        fail_transfers: bool,
    }

    impl TokenLedger for FlakyToken {
        fn balance_of(&self, account: &Address) -> U256 {
            self.inner.balance_of(account)
        }

        fn transfer(
            &mut self,
            sender: Address,
            to: Address,
            amount: U256,
        ) -> Result<(), LedgerError> {
            if self.fail_transfers {
                return Err(LedgerError::ZeroAddress { role: "recipient" });
            }
            self.inner.transfer(sender, to, amount)
        }

        fn transfer_from(
            &mut self,
            spender: Address,
            from: Address,
            to: Address,
            amount: U256,
        ) -> Result<(), LedgerError> {
            self.inner.transfer_from(spender, from, to, amount)
        }
    }

    /// Native ledger that refuses to pay out of the pool account
    struct FlakyBank {
        inner: EtherBank,
        fail_payouts: bool,
    }

    impl NativeLedger for FlakyBank {
        fn balance_of(&self, account: &Address) -> U256 {
            self.inner.balance_of(account)
        }

        fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
            if self.fail_payouts && from == POOL {
                return Err(LedgerError::InsufficientBalance {
                    required: amount,
                    available: U256::ZERO,
                });
            }
            self.inner.transfer(from, to, amount)
        }
    }

    fn ledgers() -> (Balloons, EtherBank) {
        let mut bank = EtherBank::new();
        bank.fund(DEPLOYER, ether(100)).unwrap();
        bank.fund(ALICE, ether(100)).unwrap();

        let mut token = Balloons::deploy(TOKEN, DEPLOYER, &TokenConfig::default());
        token.transfer(DEPLOYER, ALICE, ether(100)).unwrap();
        token.approve(DEPLOYER, POOL, ether(1000)).unwrap();
        token.approve(ALICE, POOL, ether(1000)).unwrap();
        (token, bank)
    }

    fn fresh() -> Dex<Balloons, EtherBank> {
        let (token, bank) = ledgers();
        Dex::new(POOL, token, bank, FeeConfig::default()).unwrap()
    }

    fn seeded() -> Dex<Balloons, EtherBank> {
        let mut dex = fresh();
        dex.init(CallContext::with_value(DEPLOYER, ether(5)), ether(5))
            .unwrap();
        dex
    }

    fn assert_consistent<T: TokenLedger, N: NativeLedger>(dex: &Dex<T, N>) {
        let state = dex.pool_state();
        assert_eq!(state.eth_reserve, dex.native_ledger().balance_of(&POOL));
        assert_eq!(state.token_reserve, dex.token_ledger().balance_of(&POOL));
        let shares = dex
            .liquidity_providers()
            .fold(U256::ZERO, |acc, (_, s)| acc + *s);
        assert_eq!(shares, state.total_liquidity);
    }

    #[test]
    fn test_init_seeds_pool() {
        let mut dex = fresh();
        let total = dex
            .init(CallContext::with_value(DEPLOYER, ether(5)), ether(5))
            .unwrap();

        assert_eq!(total, ether(5));
        assert_eq!(dex.total_liquidity(), ether(5));
        assert_eq!(dex.get_liquidity(&DEPLOYER), ether(5));
        assert_eq!(dex.pool_state().eth_reserve, ether(5));
        assert_eq!(dex.pool_state().token_reserve, ether(5));
        assert!(dex.pool_state().initialized);
        assert_eq!(dex.native_ledger().balance_of(&DEPLOYER), ether(95));
        assert_consistent(&dex);
    }

    #[test]
    fn test_init_twice_rejected() {
        let mut dex = seeded();
        let before = dex.pool_state();
        let err = dex
            .init(CallContext::with_value(ALICE, ether(1)), ether(1))
            .unwrap_err();
        assert_eq!(err, DexError::AlreadyHasLiquidity);
        assert_eq!(dex.pool_state(), before);
        assert_eq!(dex.native_ledger().balance_of(&ALICE), ether(100));
        assert_consistent(&dex);
    }

    #[test]
    fn test_init_requires_value() {
        let mut dex = fresh();
        let err = dex.init(CallContext::new(DEPLOYER), ether(5)).unwrap_err();
        assert_eq!(err, DexError::MustDepositValue);
        assert!(!dex.pool_state().initialized);
    }

    #[test]
    fn test_init_without_allowance_refunds_value() {
        let (mut token, bank) = ledgers();
        token.approve(DEPLOYER, POOL, U256::ZERO).unwrap();
        let mut dex = Dex::new(POOL, token, bank, FeeConfig::default()).unwrap();

        let err = dex
            .init(CallContext::with_value(DEPLOYER, ether(5)), ether(5))
            .unwrap_err();
        assert_eq!(err, DexError::FailedToTransferTokens);
        assert_eq!(dex.native_ledger().balance_of(&DEPLOYER), ether(100));
        assert_eq!(dex.pool_state(), PoolState::default());
        assert_consistent(&dex);
    }

    #[test]
    fn test_init_without_funds_fails() {
        let mut dex = fresh();
        let err = dex
            .init(CallContext::with_value(DEPLOYER, ether(101)), ether(5))
            .unwrap_err();
        assert_eq!(err, DexError::FailedToTransferEth);
        assert_eq!(dex.token_ledger().balance_of(&POOL), U256::ZERO);
    }

    #[test]
    fn test_eth_to_token_scenario() {
        let mut dex = seeded();
        let out = dex
            .eth_to_token(CallContext::with_value(ALICE, ether(1)))
            .unwrap();

        let expected = ether(1) * U256::from(997) * ether(5)
            / (ether(5) * U256::from(1000) + ether(1) * U256::from(997));
        assert_eq!(out, expected);
        assert_eq!(dex.pool_state().eth_reserve, ether(6));
        assert_eq!(dex.pool_state().token_reserve, ether(5) - out);
        assert_eq!(dex.token_ledger().balance_of(&ALICE), ether(100) + out);
        assert_eq!(
            dex.events().last(),
            Some(&DexEvent::EthToTokenSwap {
                swapper: ALICE,
                token_output: out,
                eth_input: ether(1),
            })
        );
        assert_consistent(&dex);
    }

    #[test]
    fn test_eth_to_token_requires_value() {
        let mut dex = seeded();
        assert_eq!(
            dex.eth_to_token(CallContext::new(ALICE)),
            Err(DexError::MustDepositValue)
        );
    }

    #[test]
    fn test_swap_before_init_fails() {
        let mut dex = fresh();
        assert_eq!(
            dex.eth_to_token(CallContext::with_value(ALICE, ether(1))),
            Err(DexError::NotEnoughLiquidity)
        );
        assert_eq!(
            dex.token_to_eth(ALICE, ether(1)),
            Err(DexError::NotEnoughLiquidity)
        );
        assert_eq!(dex.native_ledger().balance_of(&ALICE), ether(100));
    }

    #[test]
    fn test_eth_to_token_payout_failure_refunds_value() {
        let (token, bank) = ledgers();
        let mut dex = Dex::new(
            POOL,
            FlakyToken {
                inner: token,
                fail_transfers: false,
            },
            bank,
            FeeConfig::default(),
        )
        .unwrap();
        dex.init(CallContext::with_value(DEPLOYER, ether(5)), ether(5))
            .unwrap();
        dex.token_ledger_mut().fail_transfers = true;

        let before = dex.pool_state();
        let err = dex
            .eth_to_token(CallContext::with_value(ALICE, ether(1)))
            .unwrap_err();
        assert_eq!(err, DexError::FailedToTransferTokens);
        assert_eq!(dex.pool_state(), before);
        assert_eq!(dex.native_ledger().balance_of(&ALICE), ether(100));
        assert!(dex.events().is_empty());
        assert_consistent(&dex);
    }

    #[test]
    fn test_token_to_eth() {
        let mut dex = seeded();
        let out = dex.token_to_eth(ALICE, ether(1)).unwrap();

        assert_eq!(out, dex.price(ether(1), ether(5), ether(5)).unwrap());
        assert_eq!(dex.pool_state().token_reserve, ether(6));
        assert_eq!(dex.pool_state().eth_reserve, ether(5) - out);
        assert_eq!(dex.native_ledger().balance_of(&ALICE), ether(100) + out);
        assert_eq!(
            dex.events().last(),
            Some(&DexEvent::TokenToEthSwap {
                swapper: ALICE,
                tokens_input: ether(1),
                eth_output: out,
            })
        );
        assert_consistent(&dex);
    }

    #[test]
    fn test_token_to_eth_requires_amount() {
        let mut dex = seeded();
        assert_eq!(
            dex.token_to_eth(ALICE, U256::ZERO),
            Err(DexError::MustDepositValue)
        );
    }

    #[test]
    fn test_token_to_eth_without_allowance() {
        let mut dex = seeded();
        dex.token_ledger_mut()
            .approve(ALICE, POOL, U256::ZERO)
            .unwrap();
        let before = dex.pool_state();
        assert_eq!(
            dex.token_to_eth(ALICE, ether(1)),
            Err(DexError::FailedToTransferTokens)
        );
        assert_eq!(dex.pool_state(), before);
        assert_eq!(dex.token_ledger().balance_of(&ALICE), ether(100));
    }

    #[test]
    fn test_token_to_eth_payout_failure_returns_tokens() {
        let (token, bank) = ledgers();
        let mut dex = Dex::new(
            POOL,
            token,
            FlakyBank {
                inner: bank,
                fail_payouts: false,
            },
            FeeConfig::default(),
        )
        .unwrap();
        dex.init(CallContext::with_value(DEPLOYER, ether(5)), ether(5))
            .unwrap();
        dex.native_ledger_mut().fail_payouts = true;

        let before = dex.pool_state();
        let err = dex.token_to_eth(ALICE, ether(1)).unwrap_err();
        assert_eq!(err, DexError::FailedToTransferEth);
        assert_eq!(dex.pool_state(), before);
        assert_eq!(dex.token_ledger().balance_of(&ALICE), ether(100));
        assert_consistent(&dex);
    }

    #[test]
    fn test_deposit_mints_proportional_shares() {
        let mut dex = seeded();
        let tokens = dex
            .deposit(CallContext::with_value(ALICE, ether(1)))
            .unwrap();

        assert_eq!(tokens, ether(1));
        assert_eq!(dex.get_liquidity(&ALICE), ether(1));
        assert_eq!(dex.total_liquidity(), ether(6));
        assert_eq!(dex.pool_state().eth_reserve, ether(6));
        assert_eq!(dex.pool_state().token_reserve, ether(6));
        assert_eq!(
            dex.events().last(),
            Some(&DexEvent::LiquidityProvided {
                liquidity_provider: ALICE,
                liquidity_minted: ether(1),
                eth_input: ether(1),
                tokens_input: ether(1),
            })
        );
        assert_consistent(&dex);
    }

    #[test]
    fn test_deposit_after_swap_keeps_ratio() {
        let mut dex = seeded();
        dex.eth_to_token(CallContext::with_value(ALICE, ether(1)))
            .unwrap();
        let state = dex.pool_state();

        let tokens = dex
            .deposit(CallContext::with_value(ALICE, ether(2)))
            .unwrap();
        assert_eq!(tokens, ether(2) * state.token_reserve / state.eth_reserve);
        assert_eq!(
            dex.get_liquidity(&ALICE),
            ether(2) * state.total_liquidity / state.eth_reserve
        );
        assert_consistent(&dex);
    }

    #[test]
    fn test_deposit_without_allowance_refunds_value() {
        let mut dex = seeded();
        dex.token_ledger_mut()
            .approve(ALICE, POOL, U256::ZERO)
            .unwrap();
        let before = dex.pool_state();
        assert_eq!(
            dex.deposit(CallContext::with_value(ALICE, ether(1))),
            Err(DexError::FailedToTransferTokens)
        );
        assert_eq!(dex.pool_state(), before);
        assert_eq!(dex.native_ledger().balance_of(&ALICE), ether(100));
        assert_eq!(dex.get_liquidity(&ALICE), U256::ZERO);
        assert_consistent(&dex);
    }

    #[test]
    fn test_deposit_before_init_fails() {
        let mut dex = fresh();
        assert_eq!(
            dex.deposit(CallContext::with_value(ALICE, ether(1))),
            Err(DexError::NotEnoughLiquidity)
        );
    }

    #[test]
    fn test_withdraw_more_than_shares_rejected() {
        let mut dex = seeded();
        let before = dex.pool_state();
        assert_eq!(
            dex.withdraw(DEPLOYER, ether(6)),
            Err(DexError::NotEnoughLiquidity)
        );
        assert_eq!(
            dex.withdraw(ALICE, U256::from(1)),
            Err(DexError::NotEnoughLiquidity)
        );
        assert_eq!(dex.pool_state(), before);
        assert_eq!(dex.get_liquidity(&DEPLOYER), ether(5));
    }

    #[test]
    fn test_withdraw_zero_rejected() {
        let mut dex = seeded();
        assert_eq!(
            dex.withdraw(DEPLOYER, U256::ZERO),
            Err(DexError::MustDepositValue)
        );
    }

    #[test]
    fn test_withdraw_pays_proportional_reserves() {
        let mut dex = seeded();
        dex.eth_to_token(CallContext::with_value(ALICE, ether(1)))
            .unwrap();
        let state = dex.pool_state();

        let (eth, tokens) = dex.withdraw(DEPLOYER, ether(2)).unwrap();
        assert_eq!(eth, ether(2) * state.eth_reserve / state.total_liquidity);
        assert_eq!(tokens, ether(2) * state.token_reserve / state.total_liquidity);
        assert_eq!(dex.get_liquidity(&DEPLOYER), ether(3));
        assert_eq!(dex.total_liquidity(), ether(3));
        assert_eq!(
            dex.events().last(),
            Some(&DexEvent::LiquidityRemoved {
                liquidity_remover: DEPLOYER,
                liquidity_withdrawn: ether(2),
                tokens_output: tokens,
                eth_output: eth,
            })
        );
        assert_consistent(&dex);
    }

    #[test]
    fn test_withdraw_token_failure_reclaims_eth() {
        let (token, bank) = ledgers();
        let mut dex = Dex::new(
            POOL,
            FlakyToken {
                inner: token,
                fail_transfers: false,
            },
            bank,
            FeeConfig::default(),
        )
        .unwrap();
        dex.init(CallContext::with_value(DEPLOYER, ether(5)), ether(5))
            .unwrap();
        dex.token_ledger_mut().fail_transfers = true;

        let before = dex.pool_state();
        assert_eq!(
            dex.withdraw(DEPLOYER, ether(1)),
            Err(DexError::FailedToTransferTokens)
        );
        assert_eq!(dex.pool_state(), before);
        assert_eq!(dex.get_liquidity(&DEPLOYER), ether(5));
        assert_eq!(dex.native_ledger().balance_of(&DEPLOYER), ether(95));
        assert_consistent(&dex);
    }

    #[test]
    fn test_full_withdraw_then_init_rejected() {
        let mut dex = seeded();
        let (eth, tokens) = dex.withdraw(DEPLOYER, ether(5)).unwrap();
        assert_eq!((eth, tokens), (ether(5), ether(5)));
        assert_eq!(dex.total_liquidity(), U256::ZERO);
        assert_eq!(dex.liquidity_providers().count(), 0);

        assert_eq!(
            dex.init(CallContext::with_value(DEPLOYER, ether(1)), ether(1)),
            Err(DexError::AlreadyHasLiquidity)
        );
        assert_consistent(&dex);
    }

    #[test]
    fn test_deposit_withdraw_round_trip() {
        let mut dex = seeded();
        dex.token_to_eth(ALICE, ether(2)).unwrap();

        let eth_before = dex.native_ledger().balance_of(&ALICE);
        let tokens_before = dex.token_ledger().balance_of(&ALICE);

        let deposited = dex
            .deposit(CallContext::with_value(ALICE, ether(3)))
            .unwrap();
        let minted = dex.get_liquidity(&ALICE);
        let (eth_back, tokens_back) = dex.withdraw(ALICE, minted).unwrap();

        assert!(eth_back <= ether(3));
        assert!(ether(3) - eth_back <= U256::from(2));
        assert!(tokens_back <= deposited + U256::from(2));
        let eth_after = dex.native_ledger().balance_of(&ALICE);
        let tokens_after = dex.token_ledger().balance_of(&ALICE);
        assert!(eth_before - eth_after <= U256::from(2));
        assert!(tokens_before.abs_diff(tokens_after) <= U256::from(2));
        assert_consistent(&dex);
    }

    #[test]
    fn test_swaps_never_decrease_product() {
        let mut dex = seeded();
        let product = |d: &Dex<Balloons, EtherBank>| {
            let s = d.pool_state();
            s.eth_reserve * s.token_reserve
        };

        let mut k = product(&dex);
        for i in 1..=5u64 {
            dex.eth_to_token(CallContext::with_value(ALICE, ether(i)))
                .unwrap();
            assert!(product(&dex) >= k);
            k = product(&dex);

            dex.token_to_eth(ALICE, ether(i)).unwrap();
            assert!(product(&dex) >= k);
            k = product(&dex);
        }
        assert_consistent(&dex);
    }

    #[test]
    fn test_views_default_to_zero() {
        let dex = fresh();
        assert_eq!(dex.get_liquidity(&ALICE), U256::ZERO);
        assert_eq!(dex.liquidity(&ALICE), U256::ZERO);
        assert_eq!(dex.total_liquidity(), U256::ZERO);
        assert_eq!(dex.address(), POOL);
        assert_eq!(dex.fee(), FeeConfig::default());
    }

    #[test]
    fn test_pool_account_cannot_call_itself() {
        let mut dex = seeded();
        let before = dex.pool_state();

        assert_eq!(
            dex.eth_to_token(CallContext::with_value(POOL, ether(1))),
            Err(DexError::FailedToTransferEth)
        );
        assert_eq!(
            dex.deposit(CallContext::with_value(POOL, ether(1))),
            Err(DexError::FailedToTransferEth)
        );
        assert_eq!(
            dex.token_to_eth(POOL, ether(1)),
            Err(DexError::FailedToTransferTokens)
        );
        assert_eq!(
            dex.withdraw(POOL, ether(1)),
            Err(DexError::FailedToTransferEth)
        );

        assert_eq!(dex.pool_state(), before);
        assert!(dex.events().is_empty());
        assert_consistent(&dex);
    }

    #[test]
    fn test_pool_account_cannot_init() {
        let mut dex = fresh();
        assert_eq!(
            dex.init(CallContext::with_value(POOL, ether(1)), ether(1)),
            Err(DexError::FailedToTransferEth)
        );
        assert_eq!(dex.pool_state(), PoolState::default());
        assert_consistent(&dex);
    }

    #[test]
    fn test_new_rejects_invalid_fee() {
        let (token, bank) = ledgers();
        let fee = FeeConfig {
            numerator: 1,
            denominator: 0,
        };
        assert!(matches!(
            Dex::new(POOL, token, bank, fee),
            Err(dex_core::Error::Config(_))
        ));
    }
}
